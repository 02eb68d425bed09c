//! Values read back from the host, annotated with where they came from.

pub(crate) mod value;
