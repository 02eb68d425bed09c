//! Operation registry: the static table mapping operator names to host node types and slots.
//!
//! The table ships as `operations.json` next to this file. It is parsed and validated once per
//! process; lookups afterwards are read-only.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::foundation::core::MAX_CHANNELS;
use crate::foundation::error::{NocaError, NocaResult};

/// Placeholder substituted with the replica index in multi-index channel templates.
pub const MULTI_INDEX_PLACEHOLDER: &str = "{multi_index}";

static BUILTIN: LazyLock<Result<Registry, String>> = LazyLock::new(|| {
    Registry::from_json(include_str!("operations.json")).map_err(|e| e.to_string())
});

/// Shared built-in registry.
pub fn registry() -> NocaResult<&'static Registry> {
    BUILTIN.as_ref().map_err(|e| NocaError::validation(e.clone()))
}

/// One registry entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Operator name (`add`, `gt`, `blend`, ...).
    pub name: String,
    /// Host node type created for this operation.
    pub node_type: String,
    /// Ordered input slot groups, each an ordered list of channel-name templates.
    pub inputs: Vec<Vec<String>>,
    /// Output channels, or a deferred output bound later by the condition combinator.
    pub output: OutputSpec,
    /// Value written to the node's `operation` channel, if any.
    #[serde(default)]
    pub mode: Option<i64>,
    /// The first input group is a template replicated once per leading operand. Any further
    /// groups are fixed and take the trailing operands.
    #[serde(default)]
    pub multi_index: bool,
}

/// Output side of an operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSpec {
    /// Output channels known at creation time.
    Channels(Vec<String>),
    /// Branch-test node: creation only wires the test inputs. The branches and the output
    /// channel count are bound when the node is consumed by the condition combinator.
    Deferred(BranchSpec),
}

/// Second-phase wiring for a deferred (branch-test) operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchSpec {
    /// Exactly two groups: true branch, then false branch.
    pub branches: Vec<Vec<String>>,
    /// Output channels, truncated to the branch dimension on consumption.
    pub channels: Vec<String>,
}

impl BranchSpec {
    /// True-branch channel names.
    pub fn if_true(&self) -> &[String] {
        self.branches.first().map_or(&[], Vec::as_slice)
    }

    /// False-branch channel names.
    pub fn if_false(&self) -> &[String] {
        self.branches.get(1).map_or(&[], Vec::as_slice)
    }
}

impl OperationSpec {
    /// Slot groups for a call with `operand_count` operands, with multi-index templates
    /// replicated and their placeholder substituted.
    pub fn slot_groups(&self, operand_count: usize) -> Vec<Vec<String>> {
        let Some((template, fixed)) = self.inputs.split_first().filter(|_| self.multi_index)
        else {
            return self.inputs.clone();
        };
        let replicas = operand_count.saturating_sub(fixed.len());
        (0..replicas)
            .map(|i| {
                template
                    .iter()
                    .map(|ch| ch.replace(MULTI_INDEX_PLACEHOLDER, &i.to_string()))
                    .collect::<Vec<_>>()
            })
            .chain(fixed.iter().cloned())
            .collect()
    }

    /// Whether a call with `operand_count` operands matches the input slot groups.
    pub fn accepts(&self, operand_count: usize) -> bool {
        if self.multi_index {
            operand_count >= self.inputs.len()
        } else {
            operand_count == self.inputs.len()
        }
    }

    /// Human-readable operand count, for arity errors.
    pub fn arity(&self) -> String {
        if self.multi_index {
            format!("{} or more", self.inputs.len())
        } else {
            self.inputs.len().to_string()
        }
    }

    /// Whether the output is bound by the condition combinator.
    pub fn is_deferred(&self) -> bool {
        matches!(self.output, OutputSpec::Deferred(_))
    }

    fn validate(&self) -> NocaResult<()> {
        let err = |msg: &str| NocaError::validation(format!("operation '{}': {msg}", self.name));

        if self.name.is_empty() || self.node_type.is_empty() {
            return Err(err("name and node_type must be non-empty"));
        }
        if self.inputs.is_empty() {
            return Err(err("at least one input slot group is required"));
        }
        for group in &self.inputs {
            if group.is_empty() || group.len() > MAX_CHANNELS {
                return Err(err("input slot groups must hold 1..=3 channels"));
            }
        }
        if self.multi_index {
            if !self.inputs.first().is_some_and(|g| is_template(g)) {
                return Err(err("multi-index templates must contain {multi_index}"));
            }
            if self.inputs.iter().skip(1).any(|g| mentions_placeholder(g)) {
                return Err(err("only the first group of a multi-index operation is a template"));
            }
        } else if self.inputs.iter().any(|g| mentions_placeholder(g)) {
            return Err(err("{multi_index} needs multi_index = true"));
        }
        match &self.output {
            OutputSpec::Channels(chs) => {
                if chs.is_empty() || chs.len() > MAX_CHANNELS {
                    return Err(err("output must hold 1..=3 channels"));
                }
            }
            OutputSpec::Deferred(branch) => {
                if branch.branches.len() != 2 {
                    return Err(err("deferred outputs need a true and a false branch"));
                }
                let n = branch.channels.len();
                if n == 0 || n > MAX_CHANNELS || branch.branches.iter().any(|b| b.len() != n) {
                    return Err(err("branch and output channel counts must match (1..=3)"));
                }
            }
        }
        Ok(())
    }
}

fn is_template(group: &[String]) -> bool {
    group.iter().all(|ch| ch.contains(MULTI_INDEX_PLACEHOLDER))
}

fn mentions_placeholder(group: &[String]) -> bool {
    group.iter().any(|ch| ch.contains(MULTI_INDEX_PLACEHOLDER))
}

#[derive(Deserialize)]
struct RegistryFile {
    operations: Vec<OperationSpec>,
}

/// Validated operation table.
#[derive(Clone, Debug)]
pub struct Registry {
    ops: BTreeMap<String, OperationSpec>,
}

impl Registry {
    /// Parse and validate a registry table.
    pub fn from_json(src: &str) -> NocaResult<Self> {
        let file: RegistryFile = serde_json::from_str(src)
            .map_err(|e| NocaError::validation(format!("registry json: {e}")))?;
        let mut ops = BTreeMap::new();
        for op in file.operations {
            op.validate()?;
            let name = op.name.clone();
            if ops.insert(name.clone(), op).is_some() {
                return Err(NocaError::validation(format!(
                    "duplicate operation '{name}'"
                )));
            }
        }
        tracing::debug!(operations = ops.len(), "registry loaded");
        Ok(Self { ops })
    }

    /// Look up an operation by name.
    pub fn lookup(&self, name: &str) -> NocaResult<&OperationSpec> {
        self.ops
            .get(name)
            .ok_or_else(|| NocaError::unknown_operation(name))
    }

    /// Registered operation names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ops.keys().map(String::as_str)
    }

    /// Branch wiring for a staged branch-test node of the given host type.
    pub fn branch_for_node_type(&self, node_type: &str) -> Option<&BranchSpec> {
        self.ops.values().find_map(|op| match &op.output {
            OutputSpec::Deferred(branch) if op.node_type == node_type => Some(branch),
            _ => None,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/registry.rs"]
mod tests;
