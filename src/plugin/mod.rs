//! Static plugin descriptor, argument schema and invocation.

mod args;

pub use args::{ArgMap, Value};

use std::sync::Arc;

use crate::adapter::ChannelOrder;
use crate::error::ConfigError;
use crate::filter::HfsFilter;
use crate::graph::NodeRef;
use crate::segmentation::{HfsParams, Segmenter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Float,
    VideoNode,
}

impl ArgKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ArgKind::Int => "int",
            ArgKind::Float => "float",
            ArgKind::VideoNode => "vnode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub optional: bool,
}

impl ArgSpec {
    const fn required(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
        }
    }

    const fn optional(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            optional: true,
        }
    }
}

/// What a plugin's filters are bound to when they are created
#[derive(Clone)]
pub struct Backend {
    pub segmenter: Arc<dyn Segmenter>,
    pub order: ChannelOrder,
}

impl Backend {
    pub fn new(segmenter: Arc<dyn Segmenter>) -> Self {
        Self {
            segmenter,
            order: ChannelOrder::default(),
        }
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }
}

pub type CreateFn = fn(&ArgMap, &Backend) -> Result<NodeRef, ConfigError>;

pub struct FunctionDescriptor {
    pub name: &'static str,
    pub args: &'static [ArgSpec],
    pub returns: &'static [ArgSpec],
    pub create: CreateFn,
}

impl FunctionDescriptor {
    /// Argument list in the host's `name:type[:opt];` notation
    pub fn signature(&self) -> String {
        render(self.args)
    }

    pub fn return_signature(&self) -> String {
        render(self.returns)
    }

    /// Reject missing, mistyped and unknown arguments
    pub fn validate(&self, args: &ArgMap) -> Result<(), ConfigError> {
        for spec in self.args {
            match args.get(spec.name) {
                None if !spec.optional => {
                    return Err(ConfigError::MissingArgument {
                        function: self.name,
                        name: spec.name,
                    })
                }
                Some(value) if value.kind() != spec.kind => {
                    return Err(ConfigError::WrongType {
                        function: self.name,
                        name: spec.name.to_string(),
                        expected: spec.kind.as_str(),
                    })
                }
                _ => {}
            }
        }

        if let Some(unknown) = args
            .names()
            .find(|name| !self.args.iter().any(|spec| spec.name == *name))
        {
            return Err(ConfigError::UnknownArgument {
                function: self.name,
                name: unknown.to_string(),
            });
        }

        Ok(())
    }
}

fn render(specs: &[ArgSpec]) -> String {
    let mut out = String::new();
    for spec in specs {
        out.push_str(spec.name);
        out.push(':');
        out.push_str(spec.kind.as_str());
        if spec.optional {
            out.push_str(":opt");
        }
        out.push(';');
    }
    out
}

pub struct PluginDescriptor {
    pub identifier: &'static str,
    pub namespace: &'static str,
    pub name: &'static str,
    pub version: (u16, u16),
    pub functions: &'static [FunctionDescriptor],
}

impl PluginDescriptor {
    pub fn function(&self, name: &str) -> Option<&'static FunctionDescriptor> {
        self.functions.iter().find(|function| function.name == name)
    }
}

const HFS_ARGS: &[ArgSpec] = &[
    ArgSpec::required("clip", ArgKind::VideoNode),
    ArgSpec::optional("segEgbThresholdI", ArgKind::Float),
    ArgSpec::optional("minRegionSizeI", ArgKind::Int),
    ArgSpec::optional("segEgbThresholdII", ArgKind::Float),
    ArgSpec::optional("minRegionSizeII", ArgKind::Int),
    ArgSpec::optional("spatialWeight", ArgKind::Float),
    ArgSpec::optional("slicSpixelSize", ArgKind::Int),
    ArgSpec::optional("numSlicIter", ArgKind::Int),
];

const HFS_RETURNS: &[ArgSpec] = &[ArgSpec::required("clip", ArgKind::VideoNode)];

/// The plugin as registered with the host
pub static PLUGIN: PluginDescriptor = PluginDescriptor {
    identifier: "com.julek.cv_hfs",
    namespace: "cv_hfs",
    name: "Image Segmentation",
    version: (1, 0),
    functions: &[FunctionDescriptor {
        name: HfsFilter::NAME,
        args: HFS_ARGS,
        returns: HFS_RETURNS,
        create: hfs_create,
    }],
};

/// Build the tuning parameters, falling back to the defaults for omitted arguments
pub fn hfs_params(args: &ArgMap) -> Result<HfsParams, ConfigError> {
    let defaults = HfsParams::default();
    let function = HfsFilter::NAME;
    Ok(HfsParams {
        seg_egb_threshold_i: args
            .get_float_saturated(function, "segEgbThresholdI")?
            .unwrap_or(defaults.seg_egb_threshold_i),
        min_region_size_i: args
            .get_int_saturated(function, "minRegionSizeI")?
            .unwrap_or(defaults.min_region_size_i),
        seg_egb_threshold_ii: args
            .get_float_saturated(function, "segEgbThresholdII")?
            .unwrap_or(defaults.seg_egb_threshold_ii),
        min_region_size_ii: args
            .get_int_saturated(function, "minRegionSizeII")?
            .unwrap_or(defaults.min_region_size_ii),
        spatial_weight: args
            .get_float_saturated(function, "spatialWeight")?
            .unwrap_or(defaults.spatial_weight),
        slic_spixel_size: args
            .get_int_saturated(function, "slicSpixelSize")?
            .unwrap_or(defaults.slic_spixel_size),
        num_slic_iter: args
            .get_int_saturated(function, "numSlicIter")?
            .unwrap_or(defaults.num_slic_iter),
    })
}

fn hfs_create(args: &ArgMap, backend: &Backend) -> Result<NodeRef, ConfigError> {
    let node = args
        .get_node(HfsFilter::NAME, "clip")?
        .ok_or(ConfigError::MissingArgument {
            function: HfsFilter::NAME,
            name: "clip",
        })?;
    let params = hfs_params(args)?;
    let filter = HfsFilter::new(node, params, Arc::clone(&backend.segmenter))?
        .with_channel_order(backend.order);
    Ok(Arc::new(filter))
}

/// A loaded plugin bound to the segmentation backend its filters will use
pub struct Plugin {
    descriptor: &'static PluginDescriptor,
    backend: Backend,
}

impl Plugin {
    pub fn new(backend: Backend) -> Self {
        Self {
            descriptor: &PLUGIN,
            backend,
        }
    }

    /// Call a registered function, returning the node it creates
    pub fn invoke(&self, function: &str, args: &ArgMap) -> Result<NodeRef, ConfigError> {
        let descriptor = self
            .descriptor
            .function(function)
            .ok_or_else(|| ConfigError::UnknownFunction(function.to_string()))?;
        descriptor.validate(args)?;

        tracing::info!(
            "Invoking {}.{}",
            self.descriptor.namespace,
            descriptor.name
        );
        (descriptor.create)(args, &self.backend)
    }
}
