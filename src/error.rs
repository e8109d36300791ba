use thiserror::Error;

/// Everything that can go wrong while building or running a bombe.
///
/// All but `InvariantViolation` are raised while validating input, before any
/// engine starts. `InvariantViolation` means a fixed-capacity assumption of the
/// engine was broken and the run cannot continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BombeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid {kind} model {number}")]
    InvalidModel { kind: &'static str, number: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid menu: {0}")]
    InvalidMenu(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, BombeError>;
