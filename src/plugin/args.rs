use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::ArgKind;
use crate::error::ConfigError;
use crate::graph::NodeRef;

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Node(NodeRef),
}

impl Value {
    pub fn kind(&self) -> ArgKind {
        match self {
            Value::Int(_) => ArgKind::Int,
            Value::Float(_) => ArgKind::Float,
            Value::Node(_) => ArgKind::VideoNode,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Node(node) => f.debug_tuple("Node").field(&node.name()).finish(),
        }
    }
}

/// Named arguments of one function call
#[derive(Debug, Clone, Default)]
pub struct ArgMap {
    values: BTreeMap<String, Value>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int(&mut self, name: &str, value: i64) -> &mut Self {
        self.values.insert(name.to_string(), Value::Int(value));
        self
    }

    pub fn set_float(&mut self, name: &str, value: f64) -> &mut Self {
        self.values.insert(name.to_string(), Value::Float(value));
        self
    }

    pub fn set_node(&mut self, name: &str, node: NodeRef) -> &mut Self {
        self.values.insert(name.to_string(), Value::Node(node));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Integer argument clamped into `i32`; `None` when absent
    pub fn get_int_saturated(
        &self,
        function: &'static str,
        name: &str,
    ) -> Result<Option<i32>, ConfigError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Value::Int(v)) => {
                Ok(Some((*v).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32))
            }
            Some(_) => Err(wrong_type(function, name, ArgKind::Int)),
        }
    }

    /// Float argument clamped into the finite `f32` range; `None` when absent
    pub fn get_float_saturated(
        &self,
        function: &'static str,
        name: &str,
    ) -> Result<Option<f32>, ConfigError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Value::Float(v)) => Ok(Some(v.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32)),
            Some(_) => Err(wrong_type(function, name, ArgKind::Float)),
        }
    }

    pub fn get_node(&self, function: &'static str, name: &str) -> Result<Option<NodeRef>, ConfigError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Value::Node(node)) => Ok(Some(Arc::clone(node))),
            Some(_) => Err(wrong_type(function, name, ArgKind::VideoNode)),
        }
    }
}

fn wrong_type(function: &'static str, name: &str, expected: ArgKind) -> ConfigError {
    ConfigError::WrongType {
        function,
        name: name.to_string(),
        expected: expected.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_saturate_to_i32() {
        let mut args = ArgMap::new();
        args.set_int("big", i64::MAX).set_int("small", i64::MIN).set_int("ok", 42);
        assert_eq!(args.get_int_saturated("T", "big").unwrap(), Some(i32::MAX));
        assert_eq!(args.get_int_saturated("T", "small").unwrap(), Some(i32::MIN));
        assert_eq!(args.get_int_saturated("T", "ok").unwrap(), Some(42));
        assert_eq!(args.get_int_saturated("T", "missing").unwrap(), None);
    }

    #[test]
    fn floats_saturate_to_f32() {
        let mut args = ArgMap::new();
        args.set_float("huge", 1e300).set_float("w", 0.5);
        assert_eq!(args.get_float_saturated("T", "huge").unwrap(), Some(f32::MAX));
        assert_eq!(args.get_float_saturated("T", "w").unwrap(), Some(0.5));
    }

    #[test]
    fn mistyped_lookup_is_an_error() {
        let mut args = ArgMap::new();
        args.set_int("spatialWeight", 1);
        let err = args.get_float_saturated("HFS", "spatialWeight").unwrap_err();
        assert_eq!(err.to_string(), "HFS: argument spatialWeight must be of type float");
    }
}
