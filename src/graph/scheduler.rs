use std::ops::Range;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{ActivationReason, FilterMode, FrameContext, NodeRef};
use crate::error::FilterError;
use crate::frame::Frame;

/// Drives nodes through the two-phase activation protocol
///
/// Every request starts from a fresh [`FrameContext`]; nothing is cached
/// between requests.
pub struct Core {
    pool: ThreadPool,
}

impl Core {
    /// `threads == 0` lets rayon pick one worker per logical CPU
    pub fn new(threads: usize) -> Result<Self, FilterError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("cv-hfs-worker-{index}"))
            .build()?;
        tracing::debug!(threads = pool.current_num_threads(), "frame core started");
        Ok(Self { pool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Produce output frame `n` of `node`, resolving its dependencies first
    pub fn get_frame(&self, node: &NodeRef, n: usize) -> Result<Arc<Frame>, FilterError> {
        let num_frames = node.video_info().num_frames;
        if n >= num_frames {
            return Err(FilterError::OutOfRange {
                node: node.name().to_string(),
                n,
                num_frames,
            });
        }

        let mut ctx = FrameContext::new();
        if let Some(frame) = node.get_frame(n, ActivationReason::Initial, &mut ctx)? {
            return Ok(Arc::new(frame));
        }

        let requests = ctx.take_requests();
        if requests.is_empty() {
            return Err(FilterError::NoProgress {
                node: node.name().to_string(),
                n,
            });
        }

        for (dependency, index) in requests {
            match self.get_frame(&dependency, index) {
                Ok(frame) => ctx.deliver(dependency, index, frame),
                Err(err) => {
                    // Give the node its cleanup activation, then fail the request
                    node.get_frame(n, ActivationReason::Error, &mut ctx)?;
                    return Err(err);
                }
            }
        }

        node.get_frame(n, ActivationReason::AllFramesReady, &mut ctx)?
            .map(Arc::new)
            .ok_or_else(|| FilterError::NoProgress {
                node: node.name().to_string(),
                n,
            })
    }

    /// Produce every frame in `range`, returned in index order
    ///
    /// Parallel nodes are evaluated on the worker pool; serial nodes one
    /// frame at a time on the calling thread.
    pub fn get_frames(
        &self,
        node: &NodeRef,
        range: Range<usize>,
    ) -> Result<Vec<Arc<Frame>>, FilterError> {
        let _span =
            tracing::debug_span!("get_frames", node = node.name(), start = range.start, end = range.end)
                .entered();

        match node.filter_mode() {
            FilterMode::Parallel => self.pool.install(|| {
                range
                    .into_par_iter()
                    .map(|n| self.get_frame(node, n))
                    .collect()
            }),
            FilterMode::Serial => range.map(|n| self.get_frame(node, n)).collect(),
        }
    }
}
