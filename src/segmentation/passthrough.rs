use super::types::{HfsParams, Segmenter};
use crate::adapter::PackedImage;
use anyhow::Result;

/// Backend that returns every frame unchanged
///
/// Lets the whole pipeline run without a segmentation library linked in.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Segmenter for Passthrough {
    fn segment(&self, image: &PackedImage, params: &HfsParams) -> Result<PackedImage> {
        tracing::trace!(?params, "passthrough segmentation");
        Ok(image.clone())
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}
