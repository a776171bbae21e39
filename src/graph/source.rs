use std::sync::Arc;

use super::{ActivationReason, FrameContext, Node};
use crate::error::{FilterError, FrameError};
use crate::frame::{Frame, VideoInfo};

/// Source node serving frames held in memory
pub struct ClipSource {
    name: String,
    info: VideoInfo,
    frames: Vec<Arc<Frame>>,
}

impl ClipSource {
    /// Wrap `frames`; every frame must share the first one's layout
    pub fn new(name: impl Into<String>, frames: Vec<Frame>) -> Result<Self, FrameError> {
        let Some(first) = frames.first() else {
            return Err(FrameError::EmptyClip);
        };
        let info = VideoInfo {
            format: first.format(),
            width: first.width(),
            height: first.height(),
            num_frames: frames.len(),
        };
        for (index, frame) in frames.iter().enumerate() {
            if !frame.same_layout(first) {
                return Err(FrameError::MixedLayout { index });
            }
        }

        Ok(Self {
            name: name.into(),
            info,
            frames: frames.into_iter().map(Arc::new).collect(),
        })
    }

    /// A clip of `info.num_frames` zeroed frames
    pub fn blank(name: impl Into<String>, info: VideoInfo) -> Result<Self, FrameError> {
        let frame = Arc::new(Frame::new(info.format, info.width, info.height)?);
        Ok(Self {
            name: name.into(),
            info,
            frames: vec![frame; info.num_frames],
        })
    }
}

impl Node for ClipSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn video_info(&self) -> &VideoInfo {
        &self.info
    }

    fn get_frame(
        &self,
        n: usize,
        reason: ActivationReason,
        _ctx: &mut FrameContext,
    ) -> Result<Option<Frame>, FilterError> {
        if reason != ActivationReason::Initial {
            return Ok(None);
        }
        let frame = self.frames.get(n).ok_or_else(|| FilterError::OutOfRange {
            node: self.name.clone(),
            n,
            num_frames: self.frames.len(),
        })?;
        Ok(Some(Frame::clone(frame)))
    }
}
