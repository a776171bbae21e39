use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::adapter;
use crate::frame::Frame;

/// Decode still images into RGB24 frames; all images must share dimensions
pub fn load_frames<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Frame>> {
    let mut frames = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("Failed to decode {}", path.display()))?
            .to_rgb8();
        let frame = adapter::frame_from_rgb_image(&image)
            .with_context(|| format!("Failed to convert {}", path.display()))?;

        if let Some(first) = frames.first() {
            if !frame.same_layout(first) {
                bail!(
                    "{} is {}x{}, expected {}x{} like the first input",
                    path.display(),
                    frame.width(),
                    frame.height(),
                    first.width(),
                    first.height()
                );
            }
        }

        tracing::debug!("Loaded {} ({}x{})", path.display(), frame.width(), frame.height());
        frames.push(frame);
    }

    Ok(frames)
}

/// Encode frames as `frame_00000.png`, `frame_00001.png`, ... under `dir`
pub fn save_frames<F: AsRef<Frame>>(frames: &[F], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    frames
        .iter()
        .enumerate()
        .map(|(n, frame)| {
            let path = dir.join(format!("frame_{n:05}.png"));
            let image = adapter::frame_to_rgb_image(frame.as_ref())
                .with_context(|| format!("Failed to convert frame {n}"))?;
            image
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}
