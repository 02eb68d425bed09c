//! Traced creation of user attributes on host nodes.

use crate::foundation::core::join_plug;
use crate::foundation::error::{NocaError, NocaResult};
use crate::graph::engine::Calculator;
use crate::graph::node::Node;
use crate::host::{AttrSpec, Scene};

const SEPARATOR_PREFIX: &str = "channelBoxSeparator";
const SEPARATOR_LABEL: &str = "________";

impl<S: Scene> Calculator<S> {
    /// Add user attribute `name` to `node` and return a proxy for it.
    ///
    /// Spaces in `name` become underscores. An attribute that already exists is returned as
    /// is. `spec.value`, when given, is set-or-connected into the new plug.
    #[tracing::instrument(skip(self, spec), fields(attr_type = spec.attr_type.name()))]
    pub fn add_attr(&self, node: &str, name: &str, spec: &AttrSpec) -> NocaResult<Node<'_, S>> {
        let name = name.replace(' ', "_");
        let plug = join_plug(node, &name);
        if self.scene().object_exists(&plug) {
            tracing::warn!(plug = %plug, "attribute already exists, not adding it");
            return Ok(self.node(&plug));
        }

        self.scene_mut().add_user_attribute(node, &name, spec)?;
        self.recorder
            .borrow_mut()
            .record_add_attr(node, &name, &spec.trace_flags());
        tracing::debug!(plug = %plug, "added user attribute");

        let attr = self.node(&plug);
        if let Some(value) = spec.value {
            attr.set(value)?;
        }
        Ok(attr)
    }
}

impl<'c, S: Scene> Node<'c, S> {
    /// Add a user attribute to the node this proxy points at.
    pub fn add_attr(&self, name: &str, spec: &AttrSpec) -> NocaResult<Node<'c, S>> {
        let node = self.owner()?;
        self.calculator().add_attr(node, name, spec)
    }

    pub fn add_float(&self, name: &str) -> NocaResult<Node<'c, S>> {
        self.add_attr(name, &AttrSpec::float())
    }

    pub fn add_int(&self, name: &str) -> NocaResult<Node<'c, S>> {
        self.add_attr(name, &AttrSpec::int())
    }

    pub fn add_bool(&self, name: &str) -> NocaResult<Node<'c, S>> {
        self.add_attr(name, &AttrSpec::bool())
    }

    pub fn add_enum<I, T>(&self, name: &str, cases: I) -> NocaResult<Node<'c, S>>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.add_attr(name, &AttrSpec::enumeration(cases))
    }

    /// Add a non-keyable divider line to the host's channel list.
    ///
    /// Separators are named `channelBoxSeparator<N>` with the first free `N` from 1.
    pub fn add_separator(&self) -> NocaResult<Node<'c, S>> {
        let node = self.owner()?;
        let name = (1usize..)
            .map(|i| format!("{SEPARATOR_PREFIX}{i}"))
            .find(|name| !self.calculator().scene().object_exists(&join_plug(node, name)))
            .unwrap_or_else(|| SEPARATOR_PREFIX.to_owned());
        let spec = AttrSpec {
            nice_name: Some(SEPARATOR_LABEL.to_owned()),
            keyable: false,
            ..AttrSpec::enumeration([SEPARATOR_LABEL])
        };
        self.calculator().add_attr(node, &name, &spec)
    }

    /// Host node this proxy's attributes belong to.
    fn owner(&self) -> NocaResult<&str> {
        self.node().ok_or_else(|| {
            NocaError::unrecognized(format!("cannot add attributes to literal '{self}'"))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/attribute.rs"]
mod tests;
