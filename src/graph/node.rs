use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::foundation::core::join_plug;
use crate::foundation::error::{NocaError, NocaResult};
use crate::graph::engine::Calculator;
use crate::graph::reference::{Attrs, Operand, Reference};
use crate::graph::unravel::Channel;
use crate::host::Scene;
use crate::provenance::value::{Primitive, ProvenanceValue, value};

/// Proxy for a host node, one of its attributes, or a literal.
///
/// Arithmetic and comparisons on a proxy create host nodes and return a proxy to their output.
/// Operators return `NocaResult`, so formulas are written with `?`:
///
/// ```ignore
/// let offset = ((cube.attr("tx") + 2.0)? * cube.attr("ty"))?;
/// other.attr("tx").set(&offset)?;
/// ```
pub struct Node<'c, S: Scene> {
    calc: &'c Calculator<S>,
    reference: Reference,
}

impl<S: Scene> Clone for Node<'_, S> {
    fn clone(&self) -> Self {
        Self {
            calc: self.calc,
            reference: self.reference.clone(),
        }
    }
}

impl<S: Scene> fmt::Debug for Node<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(&self.reference).finish()
    }
}

impl<S: Scene> fmt::Display for Node<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reference.fmt(f)
    }
}

impl<S: Scene> PartialEq for Node<'_, S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.calc, other.calc) && self.reference == other.reference
    }
}

impl<'c, S: Scene> Node<'c, S> {
    pub(crate) fn new(calc: &'c Calculator<S>, reference: Reference) -> Self {
        Self { calc, reference }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn calculator(&self) -> &'c Calculator<S> {
        self.calc
    }

    /// Proxy for attribute `name` on the same node. The receiver is unchanged.
    pub fn attr(&self, name: &str) -> Node<'c, S> {
        Node::new(self.calc, self.reference.access(name))
    }

    /// Proxy for several attributes on the same node, in the given order.
    pub fn attrs<I, T>(&self, names: I) -> Node<'c, S>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Node::new(self.calc, self.reference.access_many(names))
    }

    /// Host node name; `None` for literals.
    pub fn node(&self) -> Option<&str> {
        self.reference.target()
    }

    /// Fully qualified plug path(s).
    pub fn plug(&self) -> Option<Vec<String>> {
        self.reference.plugs()
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    pub fn index(&self, i: usize) -> Option<Node<'c, S>> {
        self.reference
            .index(i)
            .map(|reference| Node::new(self.calc, reference))
    }

    /// Read the current value.
    ///
    /// Literal proxies return their payload. Plug reads are recorded while tracing and the
    /// result's expression is the trace variable, otherwise the plug path.
    pub fn get(&self) -> NocaResult<ProvenanceValue> {
        match &self.reference {
            Reference::Literal(inner) => match inner.as_ref() {
                Operand::Number(v) => Ok(value(*v)),
                Operand::Value(pv) => Ok(pv.clone()),
                other => self.read_channels(other),
            },
            Reference::Node { node, attrs } => match attrs {
                Attrs::None => Err(NocaError::unrecognized(format!(
                    "bare node '{node}' has no value to read"
                ))),
                Attrs::One(attr) => self.read_plug(&join_plug(node, attr)),
                Attrs::Many(attrs) => {
                    let reads = attrs
                        .iter()
                        .map(|attr| self.read_plug(&join_plug(node, attr)))
                        .collect::<NocaResult<Vec<_>>>()?;
                    Ok(join_reads(reads))
                }
            },
        }
    }

    /// Set-or-connect `source` into this proxy.
    pub fn set(&self, source: impl Into<Operand>) -> NocaResult<()> {
        self.calc
            .set_or_connect(Operand::Ref(self.reference.clone()), source)
    }

    pub fn pow(&self, rhs: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.binary("pow", rhs)
    }

    /// `base ** self`.
    pub fn rpow(&self, base: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.calc.apply("pow", &[base.into(), self.into()])
    }

    pub fn equal(&self, rhs: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.binary("eq", rhs)
    }

    pub fn not_equal(&self, rhs: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.binary("ne", rhs)
    }

    pub fn greater(&self, rhs: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.binary("gt", rhs)
    }

    pub fn greater_equal(&self, rhs: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.binary("ge", rhs)
    }

    pub fn less(&self, rhs: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.binary("lt", rhs)
    }

    pub fn less_equal(&self, rhs: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.binary("le", rhs)
    }

    fn binary(&self, op: &str, rhs: impl Into<Operand>) -> NocaResult<Node<'c, S>> {
        self.calc.apply(op, &[self.into(), rhs.into()])
    }

    fn read_plug(&self, plug: &str) -> NocaResult<ProvenanceValue> {
        let primitive = {
            let scene = self.calc.scene();
            if !scene.object_exists(plug) {
                return Err(NocaError::target_not_found(plug));
            }
            scene.get_attribute_value(plug)?
        };
        let label = self.calc.recorder.borrow_mut().record_get(plug);
        Ok(ProvenanceValue::new(
            primitive,
            label.unwrap_or_else(|| plug.to_owned()),
            false,
        ))
    }

    fn read_channels(&self, operand: &Operand) -> NocaResult<ProvenanceValue> {
        let reads = self
            .calc
            .unravel(operand)?
            .into_iter()
            .map(|channel| match channel {
                Channel::Literal {
                    value,
                    expression: Some(expr),
                } => Ok(ProvenanceValue::new(value, expr, false)),
                Channel::Literal { value: v, .. } => Ok(value(v)),
                Channel::Plug(plug) => self.read_plug(&plug),
            })
            .collect::<NocaResult<Vec<_>>>()?;
        Ok(join_reads(reads))
    }
}

/// One read per channel folded into a single value: a lone read stays as is, several become a
/// list.
fn join_reads(mut reads: Vec<ProvenanceValue>) -> ProvenanceValue {
    if reads.len() == 1 {
        return reads.remove(0);
    }
    let numbers: Vec<f64> = reads
        .iter()
        .flat_map(|r| r.primitive().to_numbers())
        .collect();
    let expressions: Vec<&str> = reads.iter().map(ProvenanceValue::expression).collect();
    ProvenanceValue::new(
        Primitive::List(numbers),
        format!("[{}]", expressions.join(", ")),
        false,
    )
}

impl<S: Scene> From<Node<'_, S>> for Operand {
    fn from(node: Node<'_, S>) -> Self {
        Operand::Ref(node.reference)
    }
}

impl<S: Scene> From<&Node<'_, S>> for Operand {
    fn from(node: &Node<'_, S>) -> Self {
        Operand::Ref(node.reference.clone())
    }
}

macro_rules! impl_node_binop {
    ($trait:ident, $method:ident, $op:literal) => {
        impl<'c, S: Scene, T: Into<Operand>> $trait<T> for Node<'c, S> {
            type Output = NocaResult<Node<'c, S>>;

            fn $method(self, rhs: T) -> Self::Output {
                self.binary($op, rhs)
            }
        }

        impl<'c, S: Scene, T: Into<Operand>> $trait<T> for &Node<'c, S> {
            type Output = NocaResult<Node<'c, S>>;

            fn $method(self, rhs: T) -> Self::Output {
                self.binary($op, rhs)
            }
        }

        impl<'c, S: Scene> $trait<Node<'c, S>> for f64 {
            type Output = NocaResult<Node<'c, S>>;

            fn $method(self, rhs: Node<'c, S>) -> Self::Output {
                let calc = rhs.calc;
                calc.apply($op, &[Operand::Number(self), rhs.into()])
            }
        }

        impl<'c, S: Scene> $trait<&Node<'c, S>> for f64 {
            type Output = NocaResult<Node<'c, S>>;

            fn $method(self, rhs: &Node<'c, S>) -> Self::Output {
                let calc = rhs.calc;
                calc.apply($op, &[Operand::Number(self), rhs.into()])
            }
        }
    };
}

/// Multiplies by -1.
impl<'c, S: Scene> Neg for &Node<'c, S> {
    type Output = NocaResult<Node<'c, S>>;

    fn neg(self) -> Self::Output {
        self.binary("mul", -1.0)
    }
}

impl<'c, S: Scene> Neg for Node<'c, S> {
    type Output = NocaResult<Node<'c, S>>;

    fn neg(self) -> Self::Output {
        -&self
    }
}

impl_node_binop!(Add, add, "add");
impl_node_binop!(Sub, sub, "sub");
impl_node_binop!(Mul, mul, "mul");
impl_node_binop!(Div, div, "div");

#[cfg(test)]
#[path = "../../tests/unit/graph/node.rs"]
mod tests;
