//! Expression-to-node compilation: operands, unravelling, wiring and the proxy API.

pub(crate) mod attribute;
pub(crate) mod connect;
pub(crate) mod engine;
pub(crate) mod node;
pub(crate) mod ops;
pub(crate) mod reference;
pub(crate) mod unravel;
