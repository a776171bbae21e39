//! Hierarchical feature selection (HFS) segmentation as a frame graph filter.
//!
//! Planar RGB24 frames are interleaved by the [`adapter`], handed to a
//! [`segmentation::Segmenter`] backend and scattered back into a new planar
//! frame. [`filter::HfsFilter`] wires that into the two-phase activation
//! protocol of the [`graph`], and [`plugin`] exposes it as the `HFS` function.

pub mod adapter;
pub mod error;
pub mod filter;
pub mod frame;
pub mod graph;
pub mod io;
pub mod plugin;
pub mod segmentation;

pub use error::{ConfigError, FilterError, FrameError};
