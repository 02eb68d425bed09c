use std::cell::{Ref, RefCell, RefMut};

use serde::Deserialize;
use smallvec::smallvec;

use crate::foundation::core::{
    MAX_CHANNELS, join_plug, last_segment, number_token, sanitize_node_name,
};
use crate::foundation::error::{NocaError, NocaResult};
use crate::graph::node::Node;
use crate::graph::reference::{Attrs, Operand, Reference};
use crate::graph::unravel::{Channel, Unravelled, unravel};
use crate::host::Scene;
use crate::record::state::RecorderState;
use crate::registry::{OperationSpec, OutputSpec, Registry, registry};

/// Calculator configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalculatorOpts {
    /// First token of every generated node name.
    pub node_prefix: String,
    /// Replace existing input connections when wiring.
    pub force_connections: bool,
    /// Channel ceiling for either side of a set-or-connect.
    pub max_channels: usize,
}

impl Default for CalculatorOpts {
    fn default() -> Self {
        Self {
            node_prefix: "nc".to_owned(),
            force_connections: true,
            max_channels: MAX_CHANNELS,
        }
    }
}

impl CalculatorOpts {
    pub fn from_json(src: &str) -> NocaResult<Self> {
        let opts: Self = serde_json::from_str(src)
            .map_err(|e| NocaError::validation(format!("calculator opts json: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> NocaResult<()> {
        if !(1..=MAX_CHANNELS).contains(&self.max_channels) {
            return Err(NocaError::validation(format!(
                "max_channels must be in 1..={MAX_CHANNELS}, got {}",
                self.max_channels
            )));
        }
        let prefix_ok = self
            .node_prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && self
                .node_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !prefix_ok {
            return Err(NocaError::validation(format!(
                "node_prefix '{}' is not a valid node name prefix",
                self.node_prefix
            )));
        }
        Ok(())
    }
}

/// Compiles operations into host nodes and wires them.
///
/// The calculator owns the host scene for its lifetime. Proxies borrow the calculator, so
/// formulas read as plain expressions:
///
/// ```ignore
/// let calc = Calculator::new(MemoryScene::new())?;
/// let cube = calc.node("pCube1");
/// let moved = (cube.attr("t") + 5.0)?;
/// cube.attr("s").set(&moved)?;
/// ```
pub struct Calculator<S: Scene> {
    scene: RefCell<S>,
    pub(crate) recorder: RefCell<RecorderState>,
    registry: &'static Registry,
    opts: CalculatorOpts,
}

impl<S: Scene> Calculator<S> {
    pub fn new(scene: S) -> NocaResult<Self> {
        Self::with_opts(scene, CalculatorOpts::default())
    }

    pub fn with_opts(scene: S, opts: CalculatorOpts) -> NocaResult<Self> {
        opts.validate()?;
        Ok(Self {
            scene: RefCell::new(scene),
            recorder: RefCell::new(RecorderState::default()),
            registry: registry()?,
            opts,
        })
    }

    pub fn opts(&self) -> &CalculatorOpts {
        &self.opts
    }

    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Borrow the host scene.
    ///
    /// The borrow must be released before calling back into the calculator.
    pub fn scene(&self) -> Ref<'_, S> {
        self.scene.borrow()
    }

    pub fn scene_mut(&self) -> RefMut<'_, S> {
        self.scene.borrow_mut()
    }

    pub fn into_scene(self) -> S {
        self.scene.into_inner()
    }

    /// Proxy for `node` or `node.attr`.
    pub fn node(&self, path: &str) -> Node<'_, S> {
        Node::new(self, Reference::parse(path))
    }

    /// Proxy wrapping a literal, so literals can lead an expression.
    pub fn literal(&self, value: impl Into<Operand>) -> Node<'_, S> {
        Node::new(self, Reference::literal(value))
    }

    pub fn wrap(&self, reference: Reference) -> Node<'_, S> {
        Node::new(self, reference)
    }

    /// Flatten an operand against the current scene.
    pub fn unravel(&self, operand: &Operand) -> NocaResult<Unravelled> {
        unravel(&*self.scene.borrow(), operand)
    }

    /// Create and wire the node for registered operation `op_name`.
    ///
    /// Fails before touching the scene on an unknown operation, an arity mismatch or an
    /// operand that cannot be unravelled. Nodes created before a later failure stay in the
    /// scene.
    #[tracing::instrument(skip(self, operands), fields(operands = operands.len()))]
    pub fn apply(&self, op_name: &str, operands: &[Operand]) -> NocaResult<Node<'_, S>> {
        let spec = self.registry.lookup(op_name)?;
        if !spec.accepts(operands.len()) {
            return Err(NocaError::arity(format!(
                "'{op_name}' takes {} operand(s), got {}",
                spec.arity(),
                operands.len()
            )));
        }
        let groups = spec.slot_groups(operands.len());

        let unravelled = operands
            .iter()
            .map(|op| self.unravel(op))
            .collect::<NocaResult<Vec<_>>>()?;
        let max_dim = unravelled.iter().map(|u| u.len()).max().unwrap_or(0);

        let node = self.create_node(&spec.node_type, &self.node_name(spec, operands))?;
        if let Some(mode) = spec.mode {
            self.wire(
                smallvec![Channel::Plug(join_plug(&node, "operation"))],
                smallvec![Channel::number(mode as f64)],
            )?;
        }

        for ((operand, channels), group) in operands.iter().zip(&unravelled).zip(&groups) {
            let slots = if group.len() == 1 {
                if channels.len() > 1 {
                    return Err(NocaError::dimension(format!(
                        "'{op_name}' slot {} takes one channel, '{operand}' has {}",
                        group[0],
                        channels.len()
                    )));
                }
                group.as_slice()
            } else {
                if max_dim > group.len() {
                    return Err(NocaError::dimension(format!(
                        "'{op_name}' slot group holds {} channels, operands have {max_dim}",
                        group.len()
                    )));
                }
                &group[..max_dim]
            };
            let targets = slots
                .iter()
                .map(|slot| Channel::Plug(join_plug(&node, slot)))
                .collect();
            tracing::trace!(slots = ?slots, source = %operand, "wiring operand");
            self.wire(targets, channels.clone())?;
        }

        let attrs = match &spec.output {
            OutputSpec::Deferred(_) => Attrs::None,
            OutputSpec::Channels(chs) if chs.len() == 1 => Attrs::One(chs[0].clone()),
            OutputSpec::Channels(chs) => Attrs::Many(chs.iter().take(max_dim).cloned().collect()),
        };
        tracing::debug!(node = %node, max_dim, "operation node ready");
        Ok(Node::new(self, Reference::Node { node, attrs }))
    }

    /// Create a host node, record it and return the name the host assigned.
    pub(crate) fn create_node(&self, node_type: &str, name: &str) -> NocaResult<String> {
        let node = self.scene.borrow_mut().create_node(node_type, name)?;
        self.recorder.borrow_mut().record_create(&node, node_type);
        tracing::debug!(node = %node, node_type, "created node");
        Ok(node)
    }

    /// `<prefix>_<OP>_<operand tokens>_<node type>`, sanitised for the host.
    fn node_name(&self, spec: &OperationSpec, operands: &[Operand]) -> String {
        let mut parts = vec![self.opts.node_prefix.clone(), spec.name.to_uppercase()];
        parts.extend(operands.iter().map(name_token));
        parts.push(spec.node_type.clone());
        sanitize_node_name(&parts.join("_"))
    }
}

fn name_token(operand: &Operand) -> String {
    match operand {
        Operand::Number(v) => number_token(*v),
        Operand::Value(pv) => pv.as_f64().map_or_else(|| "list".to_owned(), number_token),
        Operand::Path(p) => last_segment(p).to_owned(),
        Operand::Ref(Reference::Node { attrs, .. }) => match attrs {
            Attrs::One(a) => last_segment(a).to_owned(),
            Attrs::Many(v) if v.len() == 1 => last_segment(&v[0]).to_owned(),
            _ => "Node".to_owned(),
        },
        Operand::Ref(Reference::Literal(inner)) => name_token(inner),
        Operand::List(items) if items.len() == 1 => name_token(&items[0]),
        Operand::List(_) => "list".to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/engine.rs"]
mod tests;
