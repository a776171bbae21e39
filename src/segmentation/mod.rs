#[cfg(feature = "opencv")]
mod hfs;
mod passthrough;
pub mod types;

#[cfg(feature = "opencv")]
pub use hfs::OpenCvHfs;
pub use passthrough::Passthrough;
pub use types::{HfsParams, Segmenter};

use std::sync::Arc;

/// Create the default segmentation backend
///
/// OpenCV's HFS when built with the `opencv` feature, otherwise frames pass
/// through unchanged.
#[cfg(feature = "opencv")]
pub fn create_default_segmenter() -> Arc<dyn Segmenter> {
    tracing::info!("Using OpenCV HFS segmentation");
    Arc::new(OpenCvHfs::new())
}

#[cfg(not(feature = "opencv"))]
pub fn create_default_segmenter() -> Arc<dyn Segmenter> {
    tracing::warn!("Built without the opencv feature, frames pass through unsegmented");
    Arc::new(Passthrough)
}
