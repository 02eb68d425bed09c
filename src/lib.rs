//! nodecalc compiles arithmetic formulas into wired node networks inside a host scene graph.
//!
//! Instead of evaluating `a.tx + 5` numerically, the calculator creates a `plusMinusAverage`
//! node in the host scene, wires `a.tx` and `5` into it and hands back a proxy for the node's
//! output. The result can feed further operations or be connected to any host attribute.
//!
//! # Pipeline overview
//!
//! 1. **Unravel**: operands (numbers, plug paths, proxies, lists, read-back values) are
//!    flattened into host plugs and literal numbers; compound attributes expand to children.
//! 2. **Create**: the operation's node type comes from an embedded registry table; the node
//!    is named after the operation and its operands.
//! 3. **Wire**: every operand is set-or-connected into its input slots, broadcasting
//!    one-channel operands and collapsing full child runs back onto compound parents.
//!
//! The host is reached only through the [`Scene`] trait. [`MemoryScene`] is an in-memory
//! implementation used by the test-suite.
//!
//! # Recording
//!
//! [`Calculator::tracer`] records every host command as replayable text and
//! [`Calculator::container`] groups the nodes a formula creates into one host container.
#![forbid(unsafe_code)]

mod foundation;
mod graph;
mod host;
mod provenance;
mod record;
mod registry;

pub use foundation::core::{MAX_CHANNELS, format_number, join_plug, split_plug};
pub use foundation::error::{NocaError, NocaResult};
pub use graph::engine::{Calculator, CalculatorOpts};
pub use graph::node::Node;
pub use graph::reference::{Attrs, Operand, Reference};
pub use graph::unravel::{Channel, Unravelled, unravel};
pub use host::{AttrSpec, AttrType, Scene};
pub use host::memory::{ContainerRecord, MemoryScene};
pub use provenance::value::{Primitive, ProvenanceValue, ValueOp, value};
pub use record::container::{ContainerOpts, ContainerScope};
pub use record::tracer::{TracerOpts, TracerScope};
pub use registry::{
    BranchSpec, MULTI_INDEX_PLACEHOLDER, OperationSpec, OutputSpec, Registry, registry,
};
