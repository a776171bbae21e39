use anyhow::Result;

use crate::adapter::PackedImage;

/// Tuning knobs of the hierarchical feature selection segmenter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HfsParams {
    /// Merge threshold of the first graph-based pass
    pub seg_egb_threshold_i: f32,
    /// Minimum region size of the first pass
    pub min_region_size_i: i32,
    /// Merge threshold of the second graph-based pass
    pub seg_egb_threshold_ii: f32,
    /// Minimum region size of the second pass
    pub min_region_size_ii: i32,
    /// Weight of spatial distance against color distance in SLIC
    pub spatial_weight: f32,
    /// Initial SLIC superpixel cell size
    pub slic_spixel_size: i32,
    /// SLIC refinement iterations
    pub num_slic_iter: i32,
}

impl HfsParams {
    pub const DEFAULT_SEG_EGB_THRESHOLD_I: f32 = 0.08;
    pub const DEFAULT_MIN_REGION_SIZE_I: i32 = 100;
    pub const DEFAULT_SEG_EGB_THRESHOLD_II: f32 = 0.28;
    pub const DEFAULT_MIN_REGION_SIZE_II: i32 = 200;
    pub const DEFAULT_SPATIAL_WEIGHT: f32 = 0.6;
    pub const DEFAULT_SLIC_SPIXEL_SIZE: i32 = 8;
    pub const DEFAULT_NUM_SLIC_ITER: i32 = 5;
}

impl Default for HfsParams {
    fn default() -> Self {
        Self {
            seg_egb_threshold_i: Self::DEFAULT_SEG_EGB_THRESHOLD_I,
            min_region_size_i: Self::DEFAULT_MIN_REGION_SIZE_I,
            seg_egb_threshold_ii: Self::DEFAULT_SEG_EGB_THRESHOLD_II,
            min_region_size_ii: Self::DEFAULT_MIN_REGION_SIZE_II,
            spatial_weight: Self::DEFAULT_SPATIAL_WEIGHT,
            slic_spixel_size: Self::DEFAULT_SLIC_SPIXEL_SIZE,
            num_slic_iter: Self::DEFAULT_NUM_SLIC_ITER,
        }
    }
}

/// Trait for segmentation backends
/// Allows plugging in any library that maps an interleaved image to a region image
///
/// Implementations are shared by every in-flight frame request, so they take
/// `&self` and must not keep per-frame state.
pub trait Segmenter: Send + Sync {
    /// Segment one frame
    ///
    /// # Arguments
    /// * `image` - Interleaved input in the channel order recorded on the image
    /// * `params` - Tuning parameters of the filter instance
    ///
    /// # Returns
    /// * An image of the same dimensions and channel order
    fn segment(&self, image: &PackedImage, params: &HfsParams) -> Result<PackedImage>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
