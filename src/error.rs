use thiserror::Error;

use crate::frame::VideoFormat;

/// Geometry errors raised while building or converting frames
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("plane stride {stride} is smaller than its width {width}")]
    StrideTooSmall { width: usize, stride: usize },

    #[error("plane buffer holds {len} bytes but {required} are needed")]
    BufferTooSmall { len: usize, required: usize },

    #[error("packed buffer holds {len} bytes, expected {expected}")]
    PackedLength { len: usize, expected: usize },

    #[error("format {format} needs {expected} planes, got {actual}")]
    PlaneCount {
        format: VideoFormat,
        expected: usize,
        actual: usize,
    },

    #[error("plane {plane} is {actual_width}x{actual_height}, expected {width}x{height}")]
    PlaneGeometry {
        plane: usize,
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("a clip needs at least one frame")]
    EmptyClip,

    #[error("frame {index} does not match the layout of the first frame")]
    MixedLayout { index: usize },

    #[error("frame plane {0} does not exist")]
    MissingPlane(usize),

    #[error("packed image is {packed_width}x{packed_height} but frame is {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        packed_width: usize,
        packed_height: usize,
    },

    #[error("{width}x{height} does not fit an image buffer")]
    TooLarge { width: usize, height: usize },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Construction-time failures; nothing is left alive when one is returned
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{filter}: only RGB24 format is supported.")]
    UnsupportedFormat {
        filter: &'static str,
        format: VideoFormat,
    },

    #[error("no function named {0}")]
    UnknownFunction(String),

    #[error("{function}: argument {name} is required")]
    MissingArgument {
        function: &'static str,
        name: &'static str,
    },

    #[error("{function}: argument {name} is not used")]
    UnknownArgument { function: &'static str, name: String },

    #[error("{function}: argument {name} must be of type {expected}")]
    WrongType {
        function: &'static str,
        name: String,
        expected: &'static str,
    },
}

/// Per-frame failures; the frame request fails with no partial output
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("{node}: frame {n} was not delivered before the producing phase")]
    DependencyNotReady { node: String, n: usize },

    #[error("{node}: frame {n} is out of range (clip has {num_frames} frames)")]
    OutOfRange {
        node: String,
        n: usize,
        num_frames: usize,
    },

    #[error("{node}: frame {n} was neither produced nor requested")]
    NoProgress { node: String, n: usize },

    #[error("segmentation failed on frame {n}: {source:#}")]
    Segmentation { n: usize, source: anyhow::Error },

    #[error("segmenter returned {actual_width}x{actual_height} for a {width}x{height} frame")]
    SegmentDimensions {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
