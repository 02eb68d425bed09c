use std::fmt;

use crate::foundation::core::{format_number, split_plug};
use crate::provenance::value::ProvenanceValue;

/// Anything accepted as an operand of an operation or as the source of a set-or-connect.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A literal number.
    Number(f64),
    /// A value read back from the host (or wrapped by the user), with its provenance.
    Value(ProvenanceValue),
    /// A raw `node.attr` path.
    Path(String),
    /// A node/attribute reference or a wrapped literal.
    Ref(Reference),
    /// An ordered collection; unravels to the concatenation of its elements.
    List(Vec<Operand>),
}

/// Attribute part of a node reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attrs {
    /// The bare node, no plug.
    None,
    One(String),
    Many(Vec<String>),
}

/// What a [`Node`](crate::Node) proxy points at: a host node with an optional attribute path,
/// or a bare literal payload.
///
/// References are values. Attribute access builds a new reference and never changes the
/// original.
#[derive(Clone, Debug, PartialEq)]
pub enum Reference {
    Literal(Box<Operand>),
    Node { node: String, attrs: Attrs },
}

impl Reference {
    /// Reference to a bare node.
    pub fn node(name: impl Into<String>) -> Self {
        Reference::Node {
            node: name.into(),
            attrs: Attrs::None,
        }
    }

    /// Parse `node` or `node.attr`. Everything after the first dot is the attribute path.
    pub fn parse(path: &str) -> Self {
        match split_plug(path) {
            Some((node, attr)) => Reference::Node {
                node: node.to_owned(),
                attrs: Attrs::One(attr.to_owned()),
            },
            None => Reference::node(path),
        }
    }

    pub fn literal(value: impl Into<Operand>) -> Self {
        Reference::Literal(Box::new(value.into()))
    }

    /// Host node this reference targets; `None` for literals.
    pub fn target(&self) -> Option<&str> {
        match self {
            Reference::Node { node, .. } => Some(node),
            Reference::Literal(_) => None,
        }
    }

    /// New reference sharing this reference's target with `name` as its channel.
    ///
    /// A literal has no target, so the accessed name becomes its payload.
    pub fn access(&self, name: &str) -> Reference {
        match self {
            Reference::Node { node, .. } => Reference::Node {
                node: node.clone(),
                attrs: Attrs::One(name.to_owned()),
            },
            Reference::Literal(_) => Reference::Literal(Box::new(Operand::Path(name.to_owned()))),
        }
    }

    /// New reference sharing this reference's target with several channels.
    pub fn access_many<I, T>(&self, names: I) -> Reference
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect();
        match self {
            Reference::Node { node, .. } => Reference::Node {
                node: node.clone(),
                attrs: Attrs::Many(names),
            },
            Reference::Literal(_) => Reference::Literal(Box::new(Operand::List(
                names.into_iter().map(Operand::Path).collect(),
            ))),
        }
    }

    /// Fully qualified plug path(s); `None` for bare nodes and literals.
    pub fn plugs(&self) -> Option<Vec<String>> {
        match self {
            Reference::Node { node, attrs } => match attrs {
                Attrs::None => None,
                Attrs::One(a) => Some(vec![format!("{node}.{a}")]),
                Attrs::Many(v) => Some(v.iter().map(|a| format!("{node}.{a}")).collect()),
            },
            Reference::Literal(_) => None,
        }
    }

    /// Number of channels this reference names before unravelling.
    pub fn len(&self) -> usize {
        match self {
            Reference::Node { attrs, .. } => match attrs {
                Attrs::None => 0,
                Attrs::One(_) => 1,
                Attrs::Many(v) => v.len(),
            },
            Reference::Literal(op) => match op.as_ref() {
                Operand::List(items) => items.len(),
                _ => 1,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `i` of a multi-channel or list-literal reference.
    pub fn index(&self, i: usize) -> Option<Reference> {
        match self {
            Reference::Node {
                node,
                attrs: Attrs::Many(v),
            } => v.get(i).map(|a| Reference::Node {
                node: node.clone(),
                attrs: Attrs::One(a.clone()),
            }),
            Reference::Node {
                attrs: Attrs::One(_),
                ..
            } if i == 0 => Some(self.clone()),
            Reference::Literal(op) => match op.as_ref() {
                Operand::List(items) => items.get(i).cloned().map(Reference::literal),
                _ if i == 0 => Some(self.clone()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Literal(op) => op.fmt(f),
            Reference::Node { node, attrs } => match attrs {
                Attrs::None => f.write_str(node),
                Attrs::One(a) => write!(f, "{node}.{a}"),
                Attrs::Many(v) => {
                    let parts: Vec<String> = v.iter().map(|a| format!("{node}.{a}")).collect();
                    write!(f, "[{}]", parts.join(", "))
                }
            },
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(v) => f.write_str(&format_number(*v)),
            Operand::Value(v) => f.write_str(v.expression()),
            Operand::Path(p) => f.write_str(p),
            Operand::Ref(r) => r.fmt(f),
            Operand::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Number(v)
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Number(f64::from(v))
    }
}

/// Host switches take 0 and 1.
impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Operand::Number(if v { 1.0 } else { 0.0 })
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand::Path(v.to_owned())
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand::Path(v)
    }
}

impl From<ProvenanceValue> for Operand {
    fn from(v: ProvenanceValue) -> Self {
        Operand::Value(v)
    }
}

impl From<&ProvenanceValue> for Operand {
    fn from(v: &ProvenanceValue) -> Self {
        Operand::Value(v.clone())
    }
}

impl From<Reference> for Operand {
    fn from(v: Reference) -> Self {
        Operand::Ref(v)
    }
}

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(v: Vec<T>) -> Self {
        Operand::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Operand>, const N: usize> From<[T; N]> for Operand {
    fn from(v: [T; N]) -> Self {
        Operand::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/reference.rs"]
mod tests;
