//! Set-or-connect: the one primitive every write into the host goes through.

use smallvec::smallvec;

use crate::foundation::core::{format_number, join_plug, split_plug};
use crate::foundation::error::{NocaError, NocaResult};
use crate::graph::engine::Calculator;
use crate::graph::reference::{Operand, Reference};
use crate::graph::unravel::{Channel, Unravelled};
use crate::host::Scene;

impl<S: Scene> Calculator<S> {
    /// Drive `target` from `source`: numbers are set, plugs are connected.
    ///
    /// Both sides are unravelled. A one-channel source is broadcast to every target. When both
    /// sides name every child of a compound, in order, the parents are wired instead.
    pub fn set_or_connect(
        &self,
        target: impl Into<Operand>,
        source: impl Into<Operand>,
    ) -> NocaResult<()> {
        let target = match target.into() {
            // a missing target plug is reported by the wiring step, not as a bad operand
            Operand::Path(path) => Operand::Ref(Reference::parse(&path)),
            other => other,
        };
        let source = source.into();
        let targets = self.unravel(&target)?;
        let sources = self.unravel(&source)?;
        self.wire(targets, sources)
    }

    /// Set-or-connect on already unravelled channels.
    pub(crate) fn wire(&self, targets: Unravelled, sources: Unravelled) -> NocaResult<()> {
        let ceiling = self.opts().max_channels;
        if targets.len() > ceiling || sources.len() > ceiling {
            return Err(NocaError::dimension(format!(
                "cannot wire {} channel(s) from {} channel(s), at most {ceiling} allowed",
                targets.len(),
                sources.len()
            )));
        }
        let (targets, sources) = broadcast(targets, sources)?;

        let (targets, sources) = {
            let scene = self.scene();
            match (
                collapse_to_parent(&*scene, &targets),
                collapse_to_parent(&*scene, &sources),
            ) {
                (Some(t), Some(s)) => {
                    tracing::debug!(target = %t, source = %s, "wiring compound parents");
                    (smallvec![Channel::Plug(t)], smallvec![Channel::Plug(s)])
                }
                _ => (targets, sources),
            }
        };

        for (target, source) in targets.iter().zip(&sources) {
            self.wire_one(target, source)?;
        }
        Ok(())
    }

    fn wire_one(&self, target: &Channel, source: &Channel) -> NocaResult<()> {
        let target = match target {
            Channel::Plug(p) if self.scene().object_exists(p) => p,
            other => return Err(NocaError::target_not_found(other.to_string())),
        };
        match source {
            Channel::Literal { value, .. } => {
                self.scene_mut().set_attribute_value(target, *value)?;
                let text = match source {
                    Channel::Literal {
                        expression: Some(expr),
                        ..
                    } => expr.clone(),
                    _ => format_number(*value),
                };
                self.recorder.borrow_mut().record_set(target, &text);
                tracing::trace!(plug = %target, value = %text, "set");
            }
            Channel::Plug(source) if self.scene().object_exists(source) => {
                let force = self.opts().force_connections;
                self.scene_mut().connect(source, target, force)?;
                self.recorder.borrow_mut().record_connect(source, target);
                tracing::trace!(source = %source, target = %target, "connect");
            }
            Channel::Plug(source) => {
                return Err(NocaError::unsupported_source(format!(
                    "'{source}' is neither a number nor an existing plug"
                )));
            }
        }
        Ok(())
    }
}

/// Repeat a one-channel source across every target. A one-channel target fed from several
/// sources is ambiguous and rejected like any other length mismatch.
fn broadcast(targets: Unravelled, sources: Unravelled) -> NocaResult<(Unravelled, Unravelled)> {
    let (nt, ns) = (targets.len(), sources.len());
    if nt == ns && nt > 0 {
        return Ok((targets, sources));
    }
    if ns == 1 && nt > 1 {
        let s = sources[0].clone();
        return Ok((targets, std::iter::repeat_n(s, nt).collect()));
    }
    Err(NocaError::incompatible(format!(
        "cannot wire {nt} target channel(s) from {ns} source channel(s)"
    )))
}

/// Parent plug when `channels` are exactly the children of one compound attribute, in host
/// order.
fn collapse_to_parent<S: Scene + ?Sized>(scene: &S, channels: &Unravelled) -> Option<String> {
    let mut node = None;
    let mut parent = None;
    let mut long_names = Vec::with_capacity(channels.len());
    for channel in channels {
        let (n, attr) = split_plug(channel.as_plug()?)?;
        let p = scene.attribute_parent(n, attr)?;
        if node.is_some_and(|prev| prev != n) || parent.as_ref().is_some_and(|prev| *prev != p) {
            return None;
        }
        let long = scene.attribute_long_name(n, attr)?;
        if long_names.contains(&long) {
            return None;
        }
        long_names.push(long);
        node = Some(n);
        parent = Some(p);
    }
    let (node, parent) = (node?, parent?);
    let children = scene.attribute_children(node, &parent)?;
    (children == long_names).then(|| join_plug(node, &parent))
}

#[cfg(test)]
#[path = "../../tests/unit/graph/connect.rs"]
mod tests;
