/// The `numdiff_core` crate provides the finite-difference differentiation
/// engine used by gradient-based training code. It is designed to be generic
/// over the scalar type (`f32`, `f64`, or any type satisfying the `Scalar`
/// bound) and treats the differentiated function as a black box.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `ScalarField` and
///   `VectorField` (the callable seams every stencil evaluates through).
/// - **Differentiation**: the `NumericalDifferentiation` engine — method and
///   precision configuration, step-size selection, and the stencil families
///   for first derivatives, second derivatives, gradients, Hessians,
///   Jacobians, and per-output-component Hessian forms.
/// - **Error**: typed configuration errors. Stencil evaluation itself is
///   pure and infallible.
pub mod differentiation;
pub mod error;
pub mod traits;
