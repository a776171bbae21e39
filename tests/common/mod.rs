#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use cv_hfs::adapter::PackedImage;
use cv_hfs::frame::{Frame, Plane, VideoFormat};
use cv_hfs::graph::{ClipSource, NodeRef};
use cv_hfs::segmentation::{HfsParams, Segmenter};

/// RGB24 frame whose samples encode (x, y, plane, seed), rows padded to `stride`
pub fn test_frame(width: usize, height: usize, stride: usize, seed: u8) -> Frame {
    let planes = (0..3u8)
        .map(|p| {
            let mut data = vec![0xEE; stride * height];
            for y in 0..height {
                for x in 0..width {
                    data[y * stride + x] = sample(x, y, p, seed);
                }
            }
            Plane::from_vec(width, height, stride, data).unwrap()
        })
        .collect();
    Frame::from_planes(VideoFormat::RGB24, width, height, planes).unwrap()
}

pub fn sample(x: usize, y: usize, plane: u8, seed: u8) -> u8 {
    (x as u8)
        .wrapping_mul(7)
        .wrapping_add((y as u8).wrapping_mul(13))
        .wrapping_add(plane.wrapping_mul(71))
        .wrapping_add(seed.wrapping_mul(29))
}

pub fn clip(num_frames: usize, width: usize, height: usize) -> NodeRef {
    let frames = (0..num_frames)
        .map(|n| test_frame(width, height, width + 3, n as u8))
        .collect();
    Arc::new(ClipSource::new("clip", frames).unwrap())
}

/// Visible samples of every plane, row by row
pub fn logical_planes(frame: &Frame) -> Vec<Vec<u8>> {
    frame
        .planes()
        .iter()
        .map(|plane| {
            (0..plane.height())
                .flat_map(|y| plane.row(y).unwrap().to_vec())
                .collect()
        })
        .collect()
}

/// Replaces every sample with its complement
pub struct Invert;

impl Segmenter for Invert {
    fn segment(&self, image: &PackedImage, _params: &HfsParams) -> Result<PackedImage> {
        let data = image.as_raw().iter().map(|v| 255 - v).collect();
        Ok(PackedImage::from_raw(image.width(), image.height(), image.order(), data)?)
    }

    fn name(&self) -> &str {
        "invert"
    }
}

/// Keeps only packed channel 0, zeroing the other two
pub struct FirstChannelOnly;

impl Segmenter for FirstChannelOnly {
    fn segment(&self, image: &PackedImage, _params: &HfsParams) -> Result<PackedImage> {
        let mut data = image.as_raw().to_vec();
        for pixel in data.chunks_exact_mut(3) {
            pixel[1] = 0;
            pixel[2] = 0;
        }
        Ok(PackedImage::from_raw(image.width(), image.height(), image.order(), data)?)
    }

    fn name(&self) -> &str {
        "first-channel"
    }
}

/// Passes frames through and remembers the parameters of every call
#[derive(Default)]
pub struct Recording {
    pub calls: Mutex<Vec<HfsParams>>,
}

impl Segmenter for Recording {
    fn segment(&self, image: &PackedImage, params: &HfsParams) -> Result<PackedImage> {
        self.calls.lock().unwrap().push(*params);
        Ok(image.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub struct Failing;

impl Segmenter for Failing {
    fn segment(&self, _image: &PackedImage, _params: &HfsParams) -> Result<PackedImage> {
        bail!("backend exploded")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Returns a transposed-size image
pub struct WrongSize;

impl Segmenter for WrongSize {
    fn segment(&self, image: &PackedImage, _params: &HfsParams) -> Result<PackedImage> {
        Ok(PackedImage::new(image.height(), image.width() + 1, image.order()))
    }

    fn name(&self) -> &str {
        "wrong-size"
    }
}
