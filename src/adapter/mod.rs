//! Conversion between planar host frames and the interleaved buffer the
//! segmentation backends consume.

mod packed;

pub use packed::{ChannelOrder, PackedImage};

use image::RgbImage;
use ndarray::s;

use crate::error::FrameError;
use crate::frame::{Frame, Plane, VideoFormat};

/// Interleave the three planes of `frame` into a packed buffer
///
/// Channel `c` of the result holds plane `order.plane_for_channel()[c]`.
/// Only the first `width` bytes of each plane row are read.
pub fn unpack(frame: &Frame, order: ChannelOrder) -> Result<PackedImage, FrameError> {
    let _span = tracing::debug_span!("unpack", width = frame.width(), height = frame.height())
        .entered();

    let mut packed = PackedImage::new(frame.width(), frame.height(), order);
    let mut dst = packed.view_mut()?;

    for (channel, &plane_index) in order.plane_for_channel().iter().enumerate() {
        let plane = frame
            .plane(plane_index)
            .ok_or(FrameError::MissingPlane(plane_index))?;
        check_plane(plane_index, plane, frame.width(), frame.height())?;
        dst.slice_mut(s![.., .., channel]).assign(&plane.view()?);
    }

    Ok(packed)
}

/// Scatter a packed buffer back into the planes of `frame`
///
/// Uses the channel order recorded in `packed`, so it always mirrors the
/// [`unpack`] that produced a buffer of that order. Row padding in the
/// destination planes is left untouched.
pub fn pack(packed: &PackedImage, frame: &mut Frame) -> Result<(), FrameError> {
    let _span = tracing::debug_span!("pack", width = frame.width(), height = frame.height())
        .entered();

    let (width, height) = (frame.width(), frame.height());
    if packed.width() != width || packed.height() != height {
        return Err(FrameError::DimensionMismatch {
            width,
            height,
            packed_width: packed.width(),
            packed_height: packed.height(),
        });
    }

    let src = packed.view()?;
    for (channel, &plane_index) in packed.order().plane_for_channel().iter().enumerate() {
        let plane = frame
            .plane_mut(plane_index)
            .ok_or(FrameError::MissingPlane(plane_index))?;
        check_plane(plane_index, plane, width, height)?;
        plane.view_mut()?.assign(&src.slice(s![.., .., channel]));
    }

    Ok(())
}

/// Build an RGB24 frame from a decoded image
pub fn frame_from_rgb_image(image: &RgbImage) -> Result<Frame, FrameError> {
    let packed = PackedImage::from_rgb_image(image, ChannelOrder::Rgb);
    let mut frame = Frame::new(VideoFormat::RGB24, packed.width(), packed.height())?;
    pack(&packed, &mut frame)?;
    Ok(frame)
}

/// Flatten an RGB24 frame into an image for encoding
pub fn frame_to_rgb_image(frame: &Frame) -> Result<RgbImage, FrameError> {
    unpack(frame, ChannelOrder::Rgb)?.to_rgb_image()
}

fn check_plane(index: usize, plane: &Plane, width: usize, height: usize) -> Result<(), FrameError> {
    if plane.width() != width || plane.height() != height {
        return Err(FrameError::PlaneGeometry {
            plane: index,
            width,
            height,
            actual_width: plane.width(),
            actual_height: plane.height(),
        });
    }
    Ok(())
}
