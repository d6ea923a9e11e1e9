use nalgebra::DVector;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars by the stencils.
/// Must support floating-point arithmetic, debug printing, and conversion
/// from f64 (for stencil coefficients).
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A scalar-valued function of a vector argument.
///
/// This is the only seam the engine sees for gradient and Hessian
/// computation. Any auxiliary context the function needs (targets, instance
/// indices, regularization weights, ...) must be captured by the callable
/// before it is handed to the engine; the engine only ever varies `x`.
pub trait ScalarField<T: Scalar> {
    /// Evaluates the field at `x`. Must not retain or mutate `x`.
    fn evaluate(&self, x: &DVector<T>) -> T;
}

impl<T: Scalar, F> ScalarField<T> for F
where
    F: Fn(&DVector<T>) -> T,
{
    fn evaluate(&self, x: &DVector<T>) -> T {
        self(x)
    }
}

/// A vector-valued function of a vector argument, for Jacobians and Hessian
/// forms. The output dimension is whatever the callable returns; the engine
/// assumes it is the same on every evaluation.
pub trait VectorField<T: Scalar> {
    /// Evaluates the field at `x`. Must not retain or mutate `x`.
    fn evaluate(&self, x: &DVector<T>) -> DVector<T>;
}

impl<T: Scalar, F> VectorField<T> for F
where
    F: Fn(&DVector<T>) -> DVector<T>,
{
    fn evaluate(&self, x: &DVector<T>) -> DVector<T> {
        self(x)
    }
}
