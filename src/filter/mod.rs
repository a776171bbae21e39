//! The HFS filter node: two-phase activation around the frame adapter and
//! the segmentation backend.

use std::sync::Arc;
use std::time::Instant;

use crate::adapter::{self, ChannelOrder};
use crate::error::{ConfigError, FilterError};
use crate::frame::{ColorFamily, Frame, VideoInfo};
use crate::graph::{
    ActivationReason, FilterDependency, FilterMode, FrameContext, Node, NodeRef, RequestPattern,
};
use crate::segmentation::{HfsParams, Segmenter};

/// Segments every frame of an RGB24 clip
///
/// Immutable once built; concurrent requests for different frames share it
/// without locking.
pub struct HfsFilter {
    node: NodeRef,
    vi: VideoInfo,
    params: HfsParams,
    order: ChannelOrder,
    segmenter: Arc<dyn Segmenter>,
}

impl std::fmt::Debug for HfsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfsFilter")
            .field("source", &self.node.name())
            .field("vi", &self.vi)
            .field("params", &self.params)
            .field("order", &self.order)
            .field("segmenter", &self.segmenter.name())
            .finish()
    }
}

impl HfsFilter {
    pub const NAME: &'static str = "HFS";

    /// Build the filter over `node`
    ///
    /// Only 8-bit RGB input is accepted. On rejection `node` is dropped
    /// before the error is returned, so no reference to it survives.
    pub fn new(
        node: NodeRef,
        params: HfsParams,
        segmenter: Arc<dyn Segmenter>,
    ) -> Result<Self, ConfigError> {
        let vi = *node.video_info();
        if vi.format.bytes_per_sample != 1 || vi.format.color_family != ColorFamily::Rgb {
            tracing::warn!(
                source = node.name(),
                format = %vi.format,
                "{} rejected unsupported input",
                Self::NAME
            );
            drop(node);
            return Err(ConfigError::UnsupportedFormat {
                filter: Self::NAME,
                format: vi.format,
            });
        }

        tracing::info!(
            "{} on {}x{} {} clip ({} frames) using {} backend",
            Self::NAME,
            vi.width,
            vi.height,
            vi.format,
            vi.num_frames,
            segmenter.name()
        );
        tracing::debug!(?params, "segmentation parameters");

        Ok(Self {
            node,
            vi,
            params,
            order: ChannelOrder::default(),
            segmenter,
        })
    }

    /// Channel order handed to the backend; defaults to BGR
    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    pub fn params(&self) -> &HfsParams {
        &self.params
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    /// Segment `src` into the freshly allocated `dst`
    fn process_rgb(&self, n: usize, src: &Frame, dst: &mut Frame) -> Result<(), FilterError> {
        let packed = adapter::unpack(src, self.order)?;

        let segment_start = Instant::now();
        let segmented = {
            let _span = tracing::debug_span!("segment", n, backend = self.segmenter.name()).entered();
            self.segmenter
                .segment(&packed, &self.params)
                .map_err(|source| FilterError::Segmentation { n, source })?
        };
        tracing::debug!(
            n,
            "segment={:.1}ms",
            segment_start.elapsed().as_secs_f64() * 1000.0
        );

        if segmented.width() != packed.width() || segmented.height() != packed.height() {
            return Err(FilterError::SegmentDimensions {
                width: packed.width(),
                height: packed.height(),
                actual_width: segmented.width(),
                actual_height: segmented.height(),
            });
        }

        adapter::pack(&segmented, dst)?;
        Ok(())
    }
}

impl Node for HfsFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn video_info(&self) -> &VideoInfo {
        &self.vi
    }

    fn filter_mode(&self) -> FilterMode {
        FilterMode::Parallel
    }

    fn dependencies(&self) -> Vec<FilterDependency> {
        vec![FilterDependency {
            source: Arc::clone(&self.node),
            pattern: RequestPattern::StrictSpatial,
        }]
    }

    fn get_frame(
        &self,
        n: usize,
        reason: ActivationReason,
        ctx: &mut FrameContext,
    ) -> Result<Option<Frame>, FilterError> {
        match reason {
            ActivationReason::Initial => {
                ctx.request_frame(n, &self.node);
                Ok(None)
            }
            ActivationReason::AllFramesReady => {
                let _span = tracing::debug_span!("hfs_frame", n).entered();
                let src = ctx
                    .get_frame(n, &self.node)
                    .ok_or_else(|| FilterError::DependencyNotReady {
                        node: self.node.name().to_string(),
                        n,
                    })?;

                let mut dst = Frame::new_like(&src)?;
                self.process_rgb(n, &src, &mut dst)?;

                drop(src);
                Ok(Some(dst))
            }
            ActivationReason::Error => Ok(None),
        }
    }
}

impl Drop for HfsFilter {
    fn drop(&mut self) {
        tracing::debug!(source = self.node.name(), "{} releasing upstream node", Self::NAME);
    }
}
