//! Normalisation of operands into flat lists of host plugs and literal numbers.

use std::fmt;

use smallvec::SmallVec;

use crate::foundation::core::{format_number, join_plug, split_plug};
use crate::foundation::error::{NocaError, NocaResult};
use crate::graph::reference::{Attrs, Operand, Reference};
use crate::host::Scene;
use crate::provenance::value::Primitive;

/// One channel of an unravelled operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Channel {
    /// A number to be set on a plug. `expression` carries the provenance of values read back
    /// from the host.
    Literal {
        value: f64,
        expression: Option<String>,
    },
    /// A fully qualified plug path.
    Plug(String),
}

impl Channel {
    pub(crate) fn number(value: f64) -> Self {
        Channel::Literal {
            value,
            expression: None,
        }
    }

    pub fn as_plug(&self) -> Option<&str> {
        match self {
            Channel::Plug(p) => Some(p),
            Channel::Literal { .. } => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Channel::Literal { .. })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Literal {
                expression: Some(expr),
                ..
            } => f.write_str(expr),
            Channel::Literal { value, .. } => f.write_str(&format_number(*value)),
            Channel::Plug(p) => f.write_str(p),
        }
    }
}

/// Flat channel list; three inline slots cover every host vector.
pub type Unravelled = SmallVec<[Channel; 3]>;

/// Flatten `operand` into plugs and literals.
///
/// Compound plugs expand to their children in host order. Plugs the host cannot introspect
/// (missing, index-qualified) pass through unchanged; whether they are usable is decided when
/// they are wired.
pub fn unravel<S: Scene + ?Sized>(scene: &S, operand: &Operand) -> NocaResult<Unravelled> {
    let mut out = Unravelled::new();
    unravel_into(scene, operand, &mut out)?;
    Ok(out)
}

fn unravel_into<S: Scene + ?Sized>(
    scene: &S,
    operand: &Operand,
    out: &mut Unravelled,
) -> NocaResult<()> {
    match operand {
        Operand::Number(v) => out.push(Channel::number(*v)),
        Operand::Value(pv) => match pv.primitive() {
            Primitive::List(items) => out.extend(items.iter().copied().map(Channel::number)),
            scalar => {
                let value = scalar.to_numbers().first().copied().unwrap_or_default();
                out.push(Channel::Literal {
                    value,
                    expression: Some(pv.expression().to_owned()),
                });
            }
        },
        Operand::Path(path) => {
            if split_plug(path).is_none() || !scene.object_exists(path) {
                return Err(NocaError::unrecognized(format!(
                    "'{path}' is not an existing plug"
                )));
            }
            split_plug_into(scene, path, out);
        }
        Operand::Ref(reference) => unravel_reference(scene, reference, out)?,
        Operand::List(items) => {
            for item in items {
                unravel_into(scene, item, out)?;
            }
        }
    }
    Ok(())
}

fn unravel_reference<S: Scene + ?Sized>(
    scene: &S,
    reference: &Reference,
    out: &mut Unravelled,
) -> NocaResult<()> {
    match reference {
        Reference::Literal(inner) => unravel_into(scene, inner, out),
        Reference::Node { node, attrs } => match attrs {
            Attrs::None => Err(NocaError::unrecognized(format!(
                "bare node '{node}' has no plug to wire"
            ))),
            Attrs::One(attr) => {
                split_plug_into(scene, &join_plug(node, attr), out);
                Ok(())
            }
            Attrs::Many(attrs) => {
                for attr in attrs {
                    split_plug_into(scene, &join_plug(node, attr), out);
                }
                Ok(())
            }
        },
    }
}

/// Push the children of a compound plug, or the plug itself when it has none.
fn split_plug_into<S: Scene + ?Sized>(scene: &S, plug: &str, out: &mut Unravelled) {
    let children = split_plug(plug).and_then(|(node, attr)| {
        scene
            .attribute_children(node, attr)
            .map(|children| (node, children))
    });
    match children {
        Some((node, children)) => {
            out.extend(children.iter().map(|c| Channel::Plug(join_plug(node, c))));
        }
        None => out.push(Channel::Plug(plug.to_owned())),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/unravel.rs"]
mod tests;
