/// Convenience result type used across the calculator.
pub type NocaResult<T> = Result<T, NocaError>;

/// Error taxonomy raised while building node networks.
///
/// Every variant is raised at the point of detection. Nodes that were already created before
/// the failing step stay in the scene.
#[derive(thiserror::Error, Debug)]
pub enum NocaError {
    /// The operation name is not in the registry.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Operand count does not match the operation's input slot groups.
    #[error("arity mismatch: {0}")]
    ArityMismatch(String),

    /// An unravelled operand exceeds the channel ceiling of its slot.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Two sides of a set-or-connect have different lengths, neither of them 1.
    #[error("incompatible dimensions: {0}")]
    IncompatibleDimensions(String),

    /// A target plug does not exist in the host scene.
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// A source value is neither a number nor an existing plug.
    #[error("unsupported source type: {0}")]
    UnsupportedSourceType(String),

    /// Unravelling met an operand it cannot normalise.
    #[error("unrecognized operand type: {0}")]
    UnrecognizedOperandType(String),

    /// The condition combinator was given something other than a staged branch-test node.
    #[error("not a branch-test node: {0}")]
    NotABranchTest(String),

    /// Invalid registry data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reported by the host scene implementation.
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

impl NocaError {
    /// Build a [`NocaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NocaError::UnknownOperation`] value.
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation(name.into())
    }

    /// Build a [`NocaError::ArityMismatch`] value.
    pub fn arity(msg: impl Into<String>) -> Self {
        Self::ArityMismatch(msg.into())
    }

    /// Build a [`NocaError::DimensionMismatch`] value.
    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Build a [`NocaError::IncompatibleDimensions`] value.
    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::IncompatibleDimensions(msg.into())
    }

    /// Build a [`NocaError::TargetNotFound`] value.
    pub fn target_not_found(plug: impl Into<String>) -> Self {
        Self::TargetNotFound(plug.into())
    }

    /// Build a [`NocaError::UnsupportedSourceType`] value.
    pub fn unsupported_source(msg: impl Into<String>) -> Self {
        Self::UnsupportedSourceType(msg.into())
    }

    /// Build a [`NocaError::UnrecognizedOperandType`] value.
    pub fn unrecognized(msg: impl Into<String>) -> Self {
        Self::UnrecognizedOperandType(msg.into())
    }

    /// Build a [`NocaError::NotABranchTest`] value.
    pub fn not_a_branch_test(msg: impl Into<String>) -> Self {
        Self::NotABranchTest(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
