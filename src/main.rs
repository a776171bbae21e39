use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cv_hfs::adapter::ChannelOrder;
use cv_hfs::filter::HfsFilter;
use cv_hfs::graph::{ClipSource, Core, NodeRef};
use cv_hfs::plugin::{ArgMap, Backend, Plugin};
use cv_hfs::segmentation;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input images, one per frame, all with the same dimensions
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory receiving frame_NNNNN.png outputs
    #[arg(short, long, default_value = "hfs-out")]
    output_dir: PathBuf,

    /// First-pass merge threshold [default: 0.08]
    #[arg(long)]
    seg_egb_threshold_i: Option<f64>,

    /// First-pass minimum region size [default: 100]
    #[arg(long)]
    min_region_size_i: Option<i64>,

    /// Second-pass merge threshold [default: 0.28]
    #[arg(long)]
    seg_egb_threshold_ii: Option<f64>,

    /// Second-pass minimum region size [default: 200]
    #[arg(long)]
    min_region_size_ii: Option<i64>,

    /// Spatial against color weighting [default: 0.6]
    #[arg(long)]
    spatial_weight: Option<f64>,

    /// Initial superpixel cell size [default: 8]
    #[arg(long)]
    slic_spixel_size: Option<i64>,

    /// Superpixel refinement iterations [default: 5]
    #[arg(long)]
    num_slic_iter: Option<i64>,

    /// Channel order handed to the segmentation backend
    #[arg(long, value_enum, default_value_t = Order::Bgr)]
    channel_order: Order,

    /// Worker threads, 0 for one per CPU
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    Rgb,
    Bgr,
}

impl From<Order> for ChannelOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Rgb => ChannelOrder::Rgb,
            Order::Bgr => ChannelOrder::Bgr,
        }
    }
}

impl Args {
    /// Only the flags actually given become arguments, so the filter applies its own defaults
    fn to_arg_map(&self, clip: NodeRef) -> ArgMap {
        let mut map = ArgMap::new();
        map.set_node("clip", clip);
        let floats = [
            ("segEgbThresholdI", self.seg_egb_threshold_i),
            ("segEgbThresholdII", self.seg_egb_threshold_ii),
            ("spatialWeight", self.spatial_weight),
        ];
        for (name, value) in floats {
            if let Some(value) = value {
                map.set_float(name, value);
            }
        }
        let ints = [
            ("minRegionSizeI", self.min_region_size_i),
            ("minRegionSizeII", self.min_region_size_ii),
            ("slicSpixelSize", self.slic_spixel_size),
            ("numSlicIter", self.num_slic_iter),
        ];
        for (name, value) in ints {
            if let Some(value) = value {
                map.set_int(name, value);
            }
        }
        map
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("cv-hfs starting");
    tracing::info!("Inputs: {}", args.inputs.len());
    tracing::info!("Output: {}", args.output_dir.display());

    let frames = cv_hfs::io::load_frames(&args.inputs).context("Failed to load input frames")?;
    let source: NodeRef = Arc::new(ClipSource::new("images", frames).context("Failed to build clip")?);

    let backend = Backend::new(segmentation::create_default_segmenter())
        .with_channel_order(args.channel_order.into());
    let plugin = Plugin::new(backend);
    let node = plugin
        .invoke(HfsFilter::NAME, &args.to_arg_map(source))
        .context("Failed to create HFS filter")?;

    let core = Core::new(args.threads).context("Failed to start frame core")?;
    let num_frames = node.video_info().num_frames;
    tracing::info!("Processing {} frames on {} threads", num_frames, core.num_threads());

    let start = Instant::now();
    let output = core
        .get_frames(&node, 0..num_frames)
        .context("Failed to process frames")?;
    let elapsed = start.elapsed();

    let written = cv_hfs::io::save_frames(&output, &args.output_dir)?;
    tracing::info!(
        "Wrote {} frames in {:.1}ms ({:.1}ms/frame)",
        written.len(),
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1000.0 / num_frames.max(1) as f64
    );

    Ok(())
}

