//! Fatal error taxonomy for the placement core.

use atoll_diagnostics::{Category, DiagnosticCode};

/// Errors that abort tree construction or a packing pass.
///
/// Fatal errors propagate out of the builder with `?`; `pack()` converts
/// them into a `false` return at its boundary after emitting an error
/// diagnostic. Recoverable conditions (dimension mismatches, tolerance
/// violations) are reported through the `DiagnosticSink` instead and never
/// appear here.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The symmetry group has no modules to build a tree from.
    #[error("symmetry group contains no modules")]
    EmptyGroup,

    /// A tree node or group entry references a name absent from the module map.
    #[error("unknown module `{name}`")]
    UnknownModule {
        /// The unresolved module name.
        name: String,
    },

    /// The tree is structurally broken: cycle, duplicate, missing or stale name.
    #[error("invalid tree topology: {reason}")]
    InvalidTopology {
        /// Description of the structural violation.
        reason: String,
    },

    /// The self-symmetric chain is not on the required boundary branch.
    #[error("symmetry-feasibility violation: {reason}")]
    SymmetryFeasibility {
        /// Description of the violated feasibility condition.
        reason: String,
    },
}

impl PlaceError {
    /// The diagnostic code used when this error is reported through a sink.
    pub fn diagnostic_code(&self) -> DiagnosticCode {
        let number = match self {
            PlaceError::EmptyGroup => 101,
            PlaceError::UnknownModule { .. } => 102,
            PlaceError::InvalidTopology { .. } => 103,
            PlaceError::SymmetryFeasibility { .. } => 104,
        };
        DiagnosticCode::new(Category::Error, number)
    }
}
