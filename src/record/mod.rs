//! Recording scopes: command tracing and container grouping.
//!
//! Both scopes are guards borrowed from a [`Calculator`](crate::Calculator). They reset the
//! state they own when opened and clean up when dropped. Nested scopes of the same kind share
//! that state, so an inner scope resets the outer one.

pub(crate) mod container;
pub(crate) mod state;
pub(crate) mod tracer;
