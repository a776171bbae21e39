use anyhow::{bail, Context, Result};
use opencv::{
    core::{Mat, Scalar, CV_8UC3},
    hfs::HfsSegment,
    prelude::*,
};

use super::types::{HfsParams, Segmenter};
use crate::adapter::{ChannelOrder, PackedImage};

/// OpenCV contrib hierarchical feature selection segmenter
///
/// A fresh `HfsSegment` is created for every frame, sized to that frame, so
/// concurrent requests never share OpenCV state.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCvHfs;

impl OpenCvHfs {
    pub fn new() -> Self {
        Self
    }
}

impl Segmenter for OpenCvHfs {
    fn segment(&self, image: &PackedImage, params: &HfsParams) -> Result<PackedImage> {
        let (width, height) = (image.width(), image.height());
        let rows = i32::try_from(height).context("frame height does not fit OpenCV")?;
        let cols = i32::try_from(width).context("frame width does not fit OpenCV")?;

        // OpenCV works on BGR
        let bgr = image.clone().reorder(ChannelOrder::Bgr);
        let mut mat = Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0))
            .context("Failed to allocate input Mat")?;
        mat.data_bytes_mut()?.copy_from_slice(bgr.as_raw());

        let mut hfs = HfsSegment::create(
            rows,
            cols,
            params.seg_egb_threshold_i,
            params.min_region_size_i,
            params.seg_egb_threshold_ii,
            params.min_region_size_ii,
            params.spatial_weight,
            params.slic_spixel_size,
            params.num_slic_iter,
        )
        .context("Failed to create HfsSegment")?;
        let out = hfs
            .perform_segment_cpu(&mat, true)
            .context("HFS segmentation failed")?;

        if out.typ() != CV_8UC3 || out.rows() != rows || out.cols() != cols {
            bail!(
                "HFS returned a {}x{} Mat of type {}, expected {}x{} CV_8UC3",
                out.cols(),
                out.rows(),
                out.typ(),
                cols,
                rows
            );
        }

        let data = out.data_bytes()?.to_vec();
        let segmented = PackedImage::from_raw(width, height, ChannelOrder::Bgr, data)?;
        Ok(segmented.reorder(image.order()))
    }

    fn name(&self) -> &str {
        "opencv-hfs"
    }
}
