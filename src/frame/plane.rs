use ndarray::{ArrayView2, ArrayViewMut2, Ix2, ShapeBuilder, StrideShape};

use crate::error::FrameError;

/// One channel of a frame: `height` rows of `width` visible bytes, each row
/// starting `stride` bytes after the previous one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl Plane {
    /// Allocate a zeroed plane
    pub fn new(width: usize, height: usize, stride: usize) -> Result<Self, FrameError> {
        Self::from_vec(width, height, stride, vec![0; stride * height])
    }

    /// Wrap an existing buffer; padding bytes past `width` in each row are kept as-is
    pub fn from_vec(
        width: usize,
        height: usize,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if stride < width {
            return Err(FrameError::StrideTooSmall { width, stride });
        }
        let required = stride * height;
        if data.len() < required {
            return Err(FrameError::BufferTooSmall {
                len: data.len(),
                required,
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whole buffer, padding included
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Visible part of row `y`
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }

    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get_mut(start..start + self.width)
    }

    /// `height x width` view that steps over the row padding
    pub fn view(&self) -> Result<ArrayView2<'_, u8>, FrameError> {
        Ok(ArrayView2::from_shape(self.shape(), self.data.as_slice())?)
    }

    pub fn view_mut(&mut self) -> Result<ArrayViewMut2<'_, u8>, FrameError> {
        let shape = self.shape();
        Ok(ArrayViewMut2::from_shape(shape, self.data.as_mut_slice())?)
    }

    fn shape(&self) -> StrideShape<Ix2> {
        // ndarray bounds-checks custom strides even when an axis is empty
        if self.width == 0 || self.height == 0 {
            (self.height, self.width).into()
        } else {
            (self.height, self.width).strides((self.stride, 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_stride_below_width() {
        let err = Plane::new(8, 2, 4).unwrap_err();
        assert!(matches!(err, FrameError::StrideTooSmall { width: 8, stride: 4 }));
    }

    #[test]
    fn rejects_short_buffer() {
        let err = Plane::from_vec(4, 3, 6, vec![0; 12]).unwrap_err();
        assert!(matches!(err, FrameError::BufferTooSmall { len: 12, required: 18 }));
    }

    #[test]
    fn rows_skip_padding() {
        let data = vec![1, 2, 3, 99, 4, 5, 6, 99];
        let plane = Plane::from_vec(3, 2, 4, data).unwrap();
        assert_eq!(plane.row(0), Some(&[1, 2, 3][..]));
        assert_eq!(plane.row(1), Some(&[4, 5, 6][..]));
        assert_eq!(plane.row(2), None);
    }

    #[test]
    fn view_matches_rows() {
        let data = vec![1, 2, 3, 99, 4, 5, 6, 99];
        let plane = Plane::from_vec(3, 2, 4, data).unwrap();
        let view = plane.view().unwrap();
        assert_eq!(view.dim(), (2, 3));
        assert_eq!(view[[1, 2]], 6);
        assert!(view.iter().all(|&v| v != 99));
    }

    #[test]
    fn view_mut_leaves_padding_untouched() {
        let mut plane = Plane::from_vec(2, 2, 3, vec![7; 6]).unwrap();
        plane.view_mut().unwrap().fill(0);
        assert_eq!(plane.as_bytes(), &[0, 0, 7, 0, 0, 7]);
    }

    #[test]
    fn empty_plane_has_empty_view() {
        let plane = Plane::new(0, 0, 0).unwrap();
        assert_eq!(plane.view().unwrap().len(), 0);
    }
}
