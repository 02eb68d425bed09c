//! Named operation helpers and the condition combinator.

use crate::foundation::error::{NocaError, NocaResult};
use crate::graph::engine::Calculator;
use crate::graph::node::Node;
use crate::graph::reference::{Attrs, Operand, Reference};
use crate::host::Scene;

impl<S: Scene> Calculator<S> {
    /// Sum of any number of operands.
    pub fn add<I, T>(&self, operands: I) -> NocaResult<Node<'_, S>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        self.apply_many("add", operands)
    }

    /// First operand minus all following ones.
    pub fn sub<I, T>(&self, operands: I) -> NocaResult<Node<'_, S>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        self.apply_many("sub", operands)
    }

    pub fn sum<I, T>(&self, operands: I) -> NocaResult<Node<'_, S>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        self.apply_many("sum", operands)
    }

    pub fn average<I, T>(&self, operands: I) -> NocaResult<Node<'_, S>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        self.apply_many("average", operands)
    }

    /// Mix `a` into `b` by `weight` (0 gives `b`, 1 gives `a`).
    pub fn blend(
        &self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
        weight: impl Into<Operand>,
    ) -> NocaResult<Node<'_, S>> {
        self.apply("blend", &[a.into(), b.into(), weight.into()])
    }

    /// Distance between two points.
    pub fn length(&self, a: impl Into<Operand>, b: impl Into<Operand>) -> NocaResult<Node<'_, S>> {
        self.apply("length", &[a.into(), b.into()])
    }

    pub fn clamp(
        &self,
        value: impl Into<Operand>,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> NocaResult<Node<'_, S>> {
        self.apply("clamp", &[value.into(), min.into(), max.into()])
    }

    /// Map `value` from `[old_min, old_max]` onto `[min, max]`.
    pub fn remap(
        &self,
        value: impl Into<Operand>,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
        old_min: impl Into<Operand>,
        old_max: impl Into<Operand>,
    ) -> NocaResult<Node<'_, S>> {
        self.apply(
            "remap",
            &[
                value.into(),
                min.into(),
                max.into(),
                old_min.into(),
                old_max.into(),
            ],
        )
    }

    /// Dot product; `normalize` normalises the inputs first.
    pub fn dot(
        &self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
        normalize: impl Into<Operand>,
    ) -> NocaResult<Node<'_, S>> {
        self.apply("dot", &[a.into(), b.into(), normalize.into()])
    }

    pub fn cross(
        &self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
        normalize: impl Into<Operand>,
    ) -> NocaResult<Node<'_, S>> {
        self.apply("cross", &[a.into(), b.into(), normalize.into()])
    }

    /// `base ** exponent`.
    pub fn pow(
        &self,
        base: impl Into<Operand>,
        exponent: impl Into<Operand>,
    ) -> NocaResult<Node<'_, S>> {
        self.apply("pow", &[base.into(), exponent.into()])
    }

    /// Pick one of `inputs` by the integer `selector`.
    pub fn choice<I, T>(&self, inputs: I, selector: impl Into<Operand>) -> NocaResult<Node<'_, S>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        let mut operands: Vec<Operand> = inputs.into_iter().map(Into::into).collect();
        operands.push(selector.into());
        self.apply("choice", &operands)
    }

    /// Length of a vector, measured from the origin.
    pub fn magnitude(&self, a: impl Into<Operand>) -> NocaResult<Node<'_, S>> {
        self.length(a, 0)
    }

    /// Even blend of `a` and `b`.
    pub fn midpoint(&self, a: impl Into<Operand>, b: impl Into<Operand>) -> NocaResult<Node<'_, S>> {
        self.blend(a, b, 0.5)
    }

    /// Clamp to `[0, 1]`.
    pub fn saturate(&self, value: impl Into<Operand>) -> NocaResult<Node<'_, S>> {
        self.clamp(value, 0, 1)
    }

    /// `1 - value`, per channel.
    pub fn reverse(&self, value: impl Into<Operand>) -> NocaResult<Node<'_, S>> {
        self.apply("reverse", &[value.into()])
    }

    /// Angle between two vectors, in degrees.
    pub fn angle_between(
        &self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
    ) -> NocaResult<Node<'_, S>> {
        self.apply("angle_between", &[a.into(), b.into()])
    }

    /// Bind the branches of a staged comparison and return its output.
    ///
    /// `test` must be the proxy returned by a comparison (`a.greater(2)?`). The branch
    /// dimension is the larger of the two branches; both are wired onto that many true and
    /// false channels.
    #[tracing::instrument(skip_all, fields(test = %test))]
    pub fn condition<'c>(
        &'c self,
        test: &Node<'c, S>,
        if_true: impl Into<Operand>,
        if_false: impl Into<Operand>,
    ) -> NocaResult<Node<'c, S>> {
        let node = test
            .node()
            .ok_or_else(|| NocaError::not_a_branch_test(format!("'{test}' is a literal")))?
            .to_owned();
        let node_type = self
            .scene()
            .node_type_of(&node)
            .ok_or_else(|| NocaError::not_a_branch_test(format!("'{node}' does not exist")))?;
        let branch = self.registry().branch_for_node_type(&node_type).ok_or_else(|| {
            NocaError::not_a_branch_test(format!("'{node}' is a {node_type} node"))
        })?;

        let (if_true, if_false) = (if_true.into(), if_false.into());
        let dim = self
            .unravel(&if_true)?
            .len()
            .max(self.unravel(&if_false)?.len());
        if dim > branch.channels.len() {
            return Err(NocaError::dimension(format!(
                "branches of '{node}' hold {} channels, got {dim}",
                branch.channels.len()
            )));
        }

        let test_ref = Reference::node(node.clone());
        for (slots, source) in [(branch.if_true(), if_true), (branch.if_false(), if_false)] {
            self.set_or_connect(test_ref.access_many(&slots[..dim]), source)?;
        }

        Ok(self.wrap(Reference::Node {
            node,
            attrs: Attrs::Many(branch.channels[..dim].to_vec()),
        }))
    }

    /// [`Calculator::condition`] with the default branches: 0 when `test` holds, 1 otherwise.
    pub fn condition_flag<'c>(&'c self, test: &Node<'c, S>) -> NocaResult<Node<'c, S>> {
        self.condition(test, false, true)
    }

    fn apply_many<I, T>(&self, op: &str, operands: I) -> NocaResult<Node<'_, S>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        let operands: Vec<Operand> = operands.into_iter().map(Into::into).collect();
        self.apply(op, &operands)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/ops.rs"]
mod tests;
