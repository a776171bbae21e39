use image::{Rgb, RgbImage};
use ndarray::{ArrayView3, ArrayViewMut3};

use crate::error::FrameError;

/// Which frame plane feeds each interleaved channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Channel 0 = plane 0 (R), channel 2 = plane 2 (B)
    Rgb,
    /// Channel 0 = plane 2 (B), channel 2 = plane 0 (R); the OpenCV layout
    #[default]
    Bgr,
}

impl ChannelOrder {
    /// `table[channel]` is the plane index for that channel; the table is its own inverse
    pub const fn plane_for_channel(self) -> [usize; 3] {
        match self {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        }
    }
}

/// Interleaved 3-channel 8-bit image, row-major with no row padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    width: usize,
    height: usize,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl PackedImage {
    pub const CHANNELS: usize = 3;

    pub fn new(width: usize, height: usize, order: ChannelOrder) -> Self {
        Self {
            width,
            height,
            order,
            data: vec![0; width * height * Self::CHANNELS],
        }
    }

    pub fn from_raw(
        width: usize,
        height: usize,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        let expected = width * height * Self::CHANNELS;
        if data.len() != expected {
            return Err(FrameError::PackedLength {
                len: data.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    /// Take the pixels of an RGB image, reordering them into `order`
    pub fn from_rgb_image(image: &RgbImage, order: ChannelOrder) -> Self {
        let (width, height) = image.dimensions();
        let mut packed = Self::new(width as usize, height as usize, ChannelOrder::Rgb);
        // the image container may hold more bytes than its pixels use
        let len = packed.data.len();
        packed.data.copy_from_slice(&image.as_raw()[..len]);
        packed.reorder(order)
    }

    /// Produce an RGB image regardless of the buffer's own channel order
    pub fn to_rgb_image(&self) -> Result<RgbImage, FrameError> {
        let too_large = || FrameError::TooLarge {
            width: self.width,
            height: self.height,
        };
        let width = u32::try_from(self.width).map_err(|_| too_large())?;
        let height = u32::try_from(self.height).map_err(|_| too_large())?;
        let rgb = self.clone().reorder(ChannelOrder::Rgb);

        RgbImage::from_raw(width, height, rgb.data).ok_or_else(too_large)
    }

    /// Same pixels, channels swapped into `order`
    pub fn reorder(mut self, order: ChannelOrder) -> Self {
        if order != self.order {
            // Rgb and Bgr differ only by swapping channels 0 and 2
            for pixel in self.data.chunks_exact_mut(Self::CHANNELS) {
                pixel.swap(0, 2);
            }
            self.order = order;
        }
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Channels of pixel (x, y) in buffer order
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb<u8>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * Self::CHANNELS;
        let p = self.data.get(offset..offset + Self::CHANNELS)?;
        Some(Rgb([p[0], p[1], p[2]]))
    }

    /// `height x width x channel` view
    pub fn view(&self) -> Result<ArrayView3<'_, u8>, FrameError> {
        Ok(ArrayView3::from_shape(
            (self.height, self.width, Self::CHANNELS),
            self.data.as_slice(),
        )?)
    }

    pub fn view_mut(&mut self) -> Result<ArrayViewMut3<'_, u8>, FrameError> {
        Ok(ArrayViewMut3::from_shape(
            (self.height, self.width, Self::CHANNELS),
            self.data.as_mut_slice(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_tables_are_involutions() {
        for order in [ChannelOrder::Rgb, ChannelOrder::Bgr] {
            let table = order.plane_for_channel();
            for channel in 0..3 {
                assert_eq!(table[table[channel]], channel);
            }
        }
    }

    #[test]
    fn rgb_image_conversion_honours_order() {
        let image = RgbImage::from_fn(2, 1, |x, _| Rgb([10 + x as u8, 20, 30]));
        let packed = PackedImage::from_rgb_image(&image, ChannelOrder::Bgr);
        assert_eq!(packed.pixel(0, 0), Some(Rgb([30, 20, 10])));
        assert_eq!(packed.pixel(1, 0), Some(Rgb([30, 20, 11])));
        assert_eq!(packed.to_rgb_image().unwrap(), image);
    }

    #[test]
    fn oversized_image_container_is_trimmed() {
        let mut raw: Vec<u8> = (1..=12).collect();
        raw.push(0xFF);
        let image = RgbImage::from_raw(2, 2, raw).unwrap();

        let packed = PackedImage::from_rgb_image(&image, ChannelOrder::Bgr);
        assert_eq!(packed.as_raw().len(), 12);
        assert_eq!(packed.pixel(0, 0), Some(Rgb([3, 2, 1])));
        assert_eq!(packed.pixel(1, 1), Some(Rgb([12, 11, 10])));
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(PackedImage::from_raw(2, 2, ChannelOrder::Rgb, vec![0; 11]).is_err());
        assert!(PackedImage::from_raw(2, 2, ChannelOrder::Rgb, vec![0; 12]).is_ok());
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let packed = PackedImage::new(3, 2, ChannelOrder::Rgb);
        assert_eq!(packed.pixel(3, 0), None);
        assert_eq!(packed.pixel(0, 2), None);
    }
}
