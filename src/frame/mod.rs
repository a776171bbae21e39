mod format;
mod plane;

pub use format::{ColorFamily, SampleType, VideoFormat, VideoInfo};
pub use plane::Plane;

use crate::error::FrameError;

/// Row alignment used when the host allocates a frame
pub const STRIDE_ALIGNMENT: usize = 32;

/// A planar video frame
///
/// Frames handed to a filter are shared read-only; a frame being built by a
/// filter is exclusively owned until it is returned to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    format: VideoFormat,
    width: usize,
    height: usize,
    planes: Vec<Plane>,
}

impl Frame {
    /// Allocate a zeroed frame with row strides aligned to [`STRIDE_ALIGNMENT`]
    pub fn new(format: VideoFormat, width: usize, height: usize) -> Result<Self, FrameError> {
        let bytes_per_sample = usize::from(format.bytes_per_sample);
        let planes = (0..usize::from(format.num_planes))
            .map(|plane| {
                let (plane_width, plane_height) = format.plane_dimensions(plane, width, height);
                let row_bytes = plane_width * bytes_per_sample;
                let stride = row_bytes.next_multiple_of(STRIDE_ALIGNMENT);
                Plane::new(row_bytes, plane_height, stride)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            format,
            width,
            height,
            planes,
        })
    }

    /// Allocate a blank frame with the format and dimensions of `src`
    pub fn new_like(src: &Frame) -> Result<Self, FrameError> {
        Self::new(src.format, src.width, src.height)
    }

    /// Assemble a frame from caller-built planes, checking them against the format
    pub fn from_planes(
        format: VideoFormat,
        width: usize,
        height: usize,
        planes: Vec<Plane>,
    ) -> Result<Self, FrameError> {
        let expected = usize::from(format.num_planes);
        if planes.len() != expected {
            return Err(FrameError::PlaneCount {
                format,
                expected,
                actual: planes.len(),
            });
        }

        let bytes_per_sample = usize::from(format.bytes_per_sample);
        for (index, plane) in planes.iter().enumerate() {
            let (plane_width, plane_height) = format.plane_dimensions(index, width, height);
            let plane_width = plane_width * bytes_per_sample;
            if plane.width() != plane_width || plane.height() != plane_height {
                return Err(FrameError::PlaneGeometry {
                    plane: index,
                    width: plane_width,
                    height: plane_height,
                    actual_width: plane.width(),
                    actual_height: plane.height(),
                });
            }
        }

        Ok(Self {
            format,
            width,
            height,
            planes,
        })
    }

    pub fn format(&self) -> VideoFormat {
        self.format
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.planes.get(index)
    }

    pub fn plane_mut(&mut self, index: usize) -> Option<&mut Plane> {
        self.planes.get_mut(index)
    }

    /// True when both frames would be interchangeable for a consumer
    pub fn same_layout(&self, other: &Frame) -> bool {
        self.format == other.format
            && self.width == other.width
            && self.height == other.height
            && self
                .planes
                .iter()
                .zip(&other.planes)
                .all(|(a, b)| a.width() == b.width() && a.height() == b.height())
    }
}
