use thiserror::Error;

/// Errors raised while configuring the differentiation engine.
///
/// A constructed engine always holds a valid method and precision, so
/// stencil evaluation never fails; the callable's own NaN/Inf outputs
/// propagate through the difference quotients untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DifferentiationError {
    #[error("Precision digits must be at least 1, got {0}.")]
    InvalidPrecisionDigits(u32),
    #[error("Unknown differentiation method \"{0}\".")]
    UnknownMethod(String),
}
