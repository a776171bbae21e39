use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    Gray,
    Rgb,
    Yuv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    Integer,
    Float,
}

/// Sample layout of every frame a node produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoFormat {
    pub color_family: ColorFamily,
    pub sample_type: SampleType,
    pub bits_per_sample: u8,
    pub bytes_per_sample: u8,
    /// log2 horizontal chroma subsampling, only meaningful for YUV
    pub sub_sampling_w: u8,
    /// log2 vertical chroma subsampling, only meaningful for YUV
    pub sub_sampling_h: u8,
    pub num_planes: u8,
}

impl VideoFormat {
    pub const GRAY8: Self = Self::new(ColorFamily::Gray, SampleType::Integer, 8, 0, 0);
    pub const RGB24: Self = Self::new(ColorFamily::Rgb, SampleType::Integer, 8, 0, 0);
    pub const RGB48: Self = Self::new(ColorFamily::Rgb, SampleType::Integer, 16, 0, 0);
    pub const RGBS: Self = Self::new(ColorFamily::Rgb, SampleType::Float, 32, 0, 0);
    pub const YUV420P8: Self = Self::new(ColorFamily::Yuv, SampleType::Integer, 8, 1, 1);
    pub const YUV444P8: Self = Self::new(ColorFamily::Yuv, SampleType::Integer, 8, 0, 0);

    pub const fn new(
        color_family: ColorFamily,
        sample_type: SampleType,
        bits_per_sample: u8,
        sub_sampling_w: u8,
        sub_sampling_h: u8,
    ) -> Self {
        let num_planes = match color_family {
            ColorFamily::Gray => 1,
            ColorFamily::Rgb | ColorFamily::Yuv => 3,
        };
        Self {
            color_family,
            sample_type,
            bits_per_sample,
            bytes_per_sample: bits_per_sample.div_ceil(8),
            sub_sampling_w,
            sub_sampling_h,
            num_planes,
        }
    }

    /// Width in samples and height in rows of `plane` for a frame of the given size
    pub fn plane_dimensions(&self, plane: usize, width: usize, height: usize) -> (usize, usize) {
        if plane > 0 && self.color_family == ColorFamily::Yuv {
            (width >> self.sub_sampling_w, height >> self.sub_sampling_h)
        } else {
            (width, height)
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let float_suffix = match self.bits_per_sample {
            16 => "H",
            _ => "S",
        };
        match (self.color_family, self.sample_type) {
            (ColorFamily::Gray, SampleType::Integer) => write!(f, "Gray{}", self.bits_per_sample),
            (ColorFamily::Gray, SampleType::Float) => write!(f, "Gray{float_suffix}"),
            (ColorFamily::Rgb, SampleType::Integer) => {
                write!(f, "RGB{}", u32::from(self.bits_per_sample) * 3)
            }
            (ColorFamily::Rgb, SampleType::Float) => write!(f, "RGB{float_suffix}"),
            (ColorFamily::Yuv, sample_type) => {
                let layout = match (self.sub_sampling_w, self.sub_sampling_h) {
                    (1, 1) => "420",
                    (1, 0) => "422",
                    (0, 0) => "444",
                    (2, 0) => "411",
                    (2, 2) => "410",
                    (0, 1) => "440",
                    _ => "",
                };
                match sample_type {
                    SampleType::Integer => write!(f, "YUV{layout}P{}", self.bits_per_sample),
                    SampleType::Float => write!(f, "YUV{layout}P{float_suffix}"),
                }
            }
        }
    }
}

/// Stream-level description of a node's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    pub format: VideoFormat,
    pub width: usize,
    pub height: usize,
    pub num_frames: usize,
}
