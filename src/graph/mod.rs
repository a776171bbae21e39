//! Minimal pull-based frame graph: nodes, activation reasons and the
//! per-request frame context.

mod scheduler;
mod source;

pub use scheduler::Core;
pub use source::ClipSource;

use std::fmt;
use std::sync::Arc;

use crate::error::FilterError;
use crate::frame::{Frame, VideoInfo};

/// Why a node's `get_frame` is being called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationReason {
    /// First call for a frame; declare dependencies or answer directly
    Initial,
    /// Every requested dependency has been delivered to the context
    AllFramesReady,
    /// A dependency failed; the node only gets a chance to clean up
    Error,
}

/// How the scheduler may run a node's frame requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Any number of frames may be produced at once
    Parallel,
    /// One frame at a time, in request order
    Serial,
}

/// Access pattern a node promises for one of its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPattern {
    /// Any input frame may be requested
    General,
    /// Output frame `n` only ever needs input frame `n`
    StrictSpatial,
}

pub struct FilterDependency {
    pub source: NodeRef,
    pub pattern: RequestPattern,
}

/// Trait for frame graph nodes
pub trait Node: Send + Sync {
    fn name(&self) -> &str;

    fn video_info(&self) -> &VideoInfo;

    fn filter_mode(&self) -> FilterMode {
        FilterMode::Parallel
    }

    fn dependencies(&self) -> Vec<FilterDependency> {
        Vec::new()
    }

    /// Activate the node for output frame `n`
    ///
    /// Returns `Ok(None)` when nothing is produced for this activation, which
    /// at [`ActivationReason::Initial`] means the node has declared its
    /// dependencies through `ctx` and expects to be called again.
    fn get_frame(
        &self,
        n: usize,
        reason: ActivationReason,
        ctx: &mut FrameContext,
    ) -> Result<Option<Frame>, FilterError>;
}

pub type NodeRef = Arc<dyn Node>;

fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Dependency bookkeeping for a single output frame request
#[derive(Default)]
pub struct FrameContext {
    requested: Vec<(NodeRef, usize)>,
    delivered: Vec<(NodeRef, usize, Arc<Frame>)>,
}

impl FrameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that frame `n` of `node` is needed before the next activation
    pub fn request_frame(&mut self, n: usize, node: &NodeRef) {
        tracing::debug!(node = node.name(), n, "frame requested");
        self.requested.push((Arc::clone(node), n));
    }

    /// Shared handle to a delivered frame; drop it to release the frame
    pub fn get_frame(&self, n: usize, node: &NodeRef) -> Option<Arc<Frame>> {
        self.delivered
            .iter()
            .find(|(source, index, _)| *index == n && same_node(source, node))
            .map(|(_, _, frame)| Arc::clone(frame))
    }

    pub fn requested(&self) -> &[(NodeRef, usize)] {
        &self.requested
    }

    pub fn take_requests(&mut self) -> Vec<(NodeRef, usize)> {
        std::mem::take(&mut self.requested)
    }

    /// Hand a resolved dependency to the node
    pub fn deliver(&mut self, node: NodeRef, n: usize, frame: Arc<Frame>) {
        self.delivered.push((node, n, frame));
    }
}

impl fmt::Debug for FrameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requested: Vec<_> = self
            .requested
            .iter()
            .map(|(node, n)| (node.name().to_string(), *n))
            .collect();
        let delivered: Vec<_> = self
            .delivered
            .iter()
            .map(|(node, n, _)| (node.name().to_string(), *n))
            .collect();
        f.debug_struct("FrameContext")
            .field("requested", &requested)
            .field("delivered", &delivered)
            .finish()
    }
}
