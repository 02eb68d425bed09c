//! Host scene-graph contract.
//!
//! The calculator never owns scene data. Every query and mutation goes through [`Scene`], which
//! a host binding implements on top of its own scene database. [`memory::MemoryScene`] is a
//! self-contained implementation used by the test-suite.

pub(crate) mod memory;
pub(crate) mod schema;

use crate::foundation::core::format_number;
use crate::provenance::value::Primitive;

/// Value type of a user attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrType {
    Float,
    Int,
    Bool,
    /// Enumeration with the given case labels.
    Enum(Vec<String>),
}

impl AttrType {
    /// Host type name (`float`, `long`, `bool`, `enum`).
    pub fn name(&self) -> &'static str {
        match self {
            AttrType::Float => "float",
            AttrType::Int => "long",
            AttrType::Bool => "bool",
            AttrType::Enum(_) => "enum",
        }
    }
}

/// Description of a user attribute to add to a node.
#[derive(Clone, Debug, PartialEq)]
pub struct AttrSpec {
    pub attr_type: AttrType,
    /// Label shown in the host UI instead of the long name.
    pub nice_name: Option<String>,
    pub keyable: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub default: f64,
    /// Written through set-or-connect once the attribute exists.
    pub value: Option<f64>,
}

impl Default for AttrSpec {
    fn default() -> Self {
        Self {
            attr_type: AttrType::Float,
            nice_name: None,
            keyable: true,
            min: None,
            max: None,
            default: 0.0,
            value: None,
        }
    }
}

impl AttrSpec {
    pub fn float() -> Self {
        Self::default()
    }

    pub fn int() -> Self {
        Self {
            attr_type: AttrType::Int,
            ..Self::default()
        }
    }

    pub fn bool() -> Self {
        Self {
            attr_type: AttrType::Bool,
            ..Self::default()
        }
    }

    pub fn enumeration<I, T>(cases: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            attr_type: AttrType::Enum(cases.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// `key=value` flags as they appear in trace logs, after the long name.
    pub(crate) fn trace_flags(&self) -> Vec<String> {
        let mut flags = vec![
            format!("attribute_type='{}'", self.attr_type.name()),
            format!("keyable={}", if self.keyable { "True" } else { "False" }),
        ];
        if let AttrType::Enum(cases) = &self.attr_type {
            flags.push(format!("enum_name='{}'", cases.join(":")));
        }
        if let Some(nice) = &self.nice_name {
            flags.push(format!("nice_name='{nice}'"));
        }
        if let Some(min) = self.min {
            flags.push(format!("min_value={}", format_number(min)));
        }
        if let Some(max) = self.max {
            flags.push(format!("max_value={}", format_number(max)));
        }
        if self.default != 0.0 {
            flags.push(format!("default_value={}", format_number(self.default)));
        }
        flags
    }
}

/// Synchronous calls the calculator issues against the host scene.
///
/// Plug paths are `node.attr` strings; attribute paths may carry multi indices
/// (`input3D[0].input3Dx`).
pub trait Scene {
    /// Whether a node or plug exists.
    fn object_exists(&self, path: &str) -> bool;

    /// Child channels of a compound attribute, in host-declared order (long names).
    ///
    /// `None` for scalar or unknown attributes. Index-qualified attributes are not resolved.
    fn attribute_children(&self, node: &str, attr: &str) -> Option<Vec<String>>;

    /// Compound parent of a child channel (long name), `None` for top-level, unknown or
    /// index-qualified attributes.
    fn attribute_parent(&self, node: &str, attr: &str) -> Option<String>;

    /// Long name of an attribute given either its long or short name.
    fn attribute_long_name(&self, node: &str, attr: &str) -> Option<String>;

    /// Current value of a plug.
    fn get_attribute_value(&self, plug: &str) -> anyhow::Result<Primitive>;

    fn set_attribute_value(&mut self, plug: &str, value: f64) -> anyhow::Result<()>;

    /// Add a scalar user attribute `name` to `node`.
    fn add_user_attribute(
        &mut self,
        node: &str,
        name: &str,
        spec: &AttrSpec,
    ) -> anyhow::Result<()>;

    /// Connect `source` into `dest`. With `force`, an existing input connection on `dest` is
    /// replaced.
    fn connect(&mut self, source: &str, dest: &str, force: bool) -> anyhow::Result<()>;

    /// Create a node and return the identifier the host actually assigned.
    fn create_node(&mut self, node_type: &str, name: &str) -> anyhow::Result<String>;

    fn node_type_of(&self, node: &str) -> Option<String>;

    /// Connections touching `node`, as `(plug on node, plug on the other end)` pairs.
    fn list_connections(&self, node: &str) -> Vec<(String, String)>;

    /// Create an empty container and return its identifier.
    fn create_container(&mut self, name: &str) -> anyhow::Result<String>;

    fn group_nodes_into_container(
        &mut self,
        container: &str,
        nodes: &[String],
    ) -> anyhow::Result<()>;

    fn expose_container_plug(
        &mut self,
        container: &str,
        plug: &str,
        exposed_name: &str,
    ) -> anyhow::Result<()>;

    fn set_container_metadata_note(&mut self, container: &str, text: &str) -> anyhow::Result<()>;
}
