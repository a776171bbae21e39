mod common;

use std::sync::Arc;

use common::{clip, logical_planes, FirstChannelOnly, Recording};
use cv_hfs::adapter::ChannelOrder;
use cv_hfs::frame::{VideoFormat, VideoInfo};
use cv_hfs::graph::{ClipSource, Core, NodeRef};
use cv_hfs::plugin::{hfs_params, ArgMap, Backend, Plugin, PLUGIN};
use cv_hfs::segmentation::{HfsParams, Passthrough};
use cv_hfs::ConfigError;

fn plugin() -> Plugin {
    Plugin::new(Backend::new(Arc::new(Passthrough)))
}

#[test]
fn descriptor_matches_registration() {
    assert_eq!(PLUGIN.identifier, "com.julek.cv_hfs");
    assert_eq!(PLUGIN.namespace, "cv_hfs");
    assert_eq!(PLUGIN.name, "Image Segmentation");
    assert_eq!(PLUGIN.version, (1, 0));

    let hfs = PLUGIN.function("HFS").expect("HFS registered");
    assert_eq!(
        hfs.signature(),
        "clip:vnode;\
         segEgbThresholdI:float:opt;\
         minRegionSizeI:int:opt;\
         segEgbThresholdII:float:opt;\
         minRegionSizeII:int:opt;\
         spatialWeight:float:opt;\
         slicSpixelSize:int:opt;\
         numSlicIter:int:opt;"
    );
    assert_eq!(hfs.return_signature(), "clip:vnode;");
    assert!(PLUGIN.function("Missing").is_none());
}

#[test]
fn omitted_arguments_use_defaults() {
    let mut args = ArgMap::new();
    args.set_node("clip", clip(1, 4, 4));

    let params = hfs_params(&args).unwrap();
    assert_eq!(params, HfsParams::default());
    assert_eq!(params.seg_egb_threshold_i, 0.08);
    assert_eq!(params.min_region_size_i, 100);
    assert_eq!(params.seg_egb_threshold_ii, 0.28);
    assert_eq!(params.min_region_size_ii, 200);
    assert_eq!(params.spatial_weight, 0.6);
    assert_eq!(params.slic_spixel_size, 8);
    assert_eq!(params.num_slic_iter, 5);
}

#[test]
fn invoked_filter_segments_with_defaults() {
    let recording = Arc::new(Recording::default());
    let plugin = Plugin::new(Backend::new(Arc::clone(&recording) as _));
    let mut args = ArgMap::new();
    args.set_node("clip", clip(2, 4, 4));

    let node = plugin.invoke("HFS", &args).unwrap();
    Core::new(1).unwrap().get_frames(&node, 0..2).unwrap();

    let calls = recording.calls.lock().unwrap();
    assert_eq!(*calls, vec![HfsParams::default(); 2]);
}

#[test]
fn given_arguments_override_defaults() {
    let mut args = ArgMap::new();
    args.set_node("clip", clip(1, 4, 4))
        .set_float("segEgbThresholdI", 0.5)
        .set_int("minRegionSizeII", 50)
        .set_int("numSlicIter", 1);

    let params = hfs_params(&args).unwrap();
    assert_eq!(params.seg_egb_threshold_i, 0.5);
    assert_eq!(params.min_region_size_ii, 50);
    assert_eq!(params.num_slic_iter, 1);
    assert_eq!(params.spatial_weight, HfsParams::DEFAULT_SPATIAL_WEIGHT);
}

#[test]
fn missing_clip_is_rejected() {
    let Err(err) = plugin().invoke("HFS", &ArgMap::new()) else {
        panic!("expected rejection");
    };
    assert!(matches!(err, ConfigError::MissingArgument { name: "clip", .. }));
}

#[test]
fn mistyped_argument_is_rejected() {
    let mut args = ArgMap::new();
    args.set_node("clip", clip(1, 4, 4)).set_float("numSlicIter", 2.0);
    let Err(err) = plugin().invoke("HFS", &args) else {
        panic!("expected rejection");
    };
    assert_eq!(err.to_string(), "HFS: argument numSlicIter must be of type int");
}

#[test]
fn unknown_argument_is_rejected() {
    let mut args = ArgMap::new();
    args.set_node("clip", clip(1, 4, 4)).set_int("radius", 3);
    let Err(err) = plugin().invoke("HFS", &args) else {
        panic!("expected rejection");
    };
    assert!(matches!(err, ConfigError::UnknownArgument { ref name, .. } if name == "radius"));
}

#[test]
fn unknown_function_is_rejected() {
    let Err(err) = plugin().invoke("Blur", &ArgMap::new()) else {
        panic!("expected rejection");
    };
    assert!(matches!(err, ConfigError::UnknownFunction(ref name) if name == "Blur"));
}

#[test]
fn unsupported_format_leaves_no_node_behind() {
    let info = VideoInfo {
        format: VideoFormat::YUV420P8,
        width: 16,
        height: 8,
        num_frames: 1,
    };
    let source: NodeRef = Arc::new(ClipSource::blank("yuv", info).unwrap());
    let mut args = ArgMap::new();
    args.set_node("clip", Arc::clone(&source));

    let Err(err) = plugin().invoke("HFS", &args) else {
        panic!("expected rejection");
    };
    assert_eq!(err.to_string(), "HFS: only RGB24 format is supported.");

    drop(args);
    assert_eq!(Arc::strong_count(&source), 1);
}

#[test]
fn backend_channel_order_reaches_the_filter() {
    let backend = Backend::new(Arc::new(FirstChannelOnly)).with_channel_order(ChannelOrder::Rgb);
    let source = clip(1, 4, 4);
    let mut args = ArgMap::new();
    args.set_node("clip", Arc::clone(&source));

    let node = Plugin::new(backend).invoke("HFS", &args).unwrap();
    assert_eq!(node.video_info(), source.video_info());

    let core = Core::new(1).unwrap();
    let src = logical_planes(&core.get_frame(&source, 0).unwrap());
    let out = logical_planes(&core.get_frame(&node, 0).unwrap());
    assert_eq!(out[0], src[0]);
    assert!(out[1].iter().all(|&v| v == 0));
    assert!(out[2].iter().all(|&v| v == 0));
}
