//! Engine configuration and step-size selection.
//!
//! The stencil families live in submodules and attach themselves to
//! [`NumericalDifferentiation`] as `impl` blocks:
//! - `first_order`: first derivatives and gradients.
//! - `second_order`: second derivatives and Hessians.
//! - `vector_valued`: Jacobians and per-output-component Hessian forms.

mod first_order;
mod second_order;
mod vector_valued;

use crate::error::DifferentiationError;
use crate::traits::Scalar;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects the stencil family used by every dispatched operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Method {
    /// One-sided quotients. Cheaper (a gradient costs n + 1 evaluations)
    /// but only first-order accurate.
    ForwardDifferences,
    /// Symmetric quotients. Twice the evaluations of forward differences
    /// for an extra order of accuracy.
    #[default]
    CentralDifferences,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::ForwardDifferences => write!(f, "ForwardDifferences"),
            Method::CentralDifferences => write!(f, "CentralDifferences"),
        }
    }
}

impl FromStr for Method {
    type Err = DifferentiationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "ForwardDifferences" => Ok(Method::ForwardDifferences),
            "CentralDifferences" => Ok(Method::CentralDifferences),
            other => Err(DifferentiationError::UnknownMethod(other.to_string())),
        }
    }
}

/// Default number of precision digits, giving `eta = 1e-6`.
pub const DEFAULT_PRECISION_DIGITS: u32 = 6;

/// Finite-difference differentiation engine.
///
/// The engine holds only its configuration (method and precision digits);
/// every differentiation call is a pure function of that configuration, the
/// supplied callable, and the evaluation point. The point is never mutated:
/// each probed point is a perturbed copy. Because a call borrows the engine
/// immutably, configuration changes take effect on the next call, never on
/// one in flight.
///
/// # Examples
///
/// Auxiliary context is captured by the callable, not passed to the engine:
///
/// ```
/// use nalgebra::DVector;
/// use numdiff_core::differentiation::NumericalDifferentiation;
///
/// let engine = NumericalDifferentiation::default();
/// let targets = DVector::from_vec(vec![1.0, 2.0]);
/// let loss = |x: &DVector<f64>| -> f64 {
///     x.iter()
///         .zip(targets.iter())
///         .map(|(xi, ti)| (xi - ti) * (xi - ti))
///         .sum()
/// };
///
/// let weights = DVector::from_vec(vec![0.5, -0.25]);
/// let gradient = engine.gradient(&loss, &weights);
/// assert!((gradient[0] - 2.0 * (0.5 - 1.0)).abs() < 1e-3);
/// assert!((gradient[1] - 2.0 * (-0.25 - 2.0)).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericalDifferentiation {
    method: Method,
    precision_digits: u32,
}

impl Default for NumericalDifferentiation {
    fn default() -> Self {
        Self {
            method: Method::default(),
            precision_digits: DEFAULT_PRECISION_DIGITS,
        }
    }
}

impl NumericalDifferentiation {
    /// Creates an engine with the given method and precision digit count.
    /// `precision_digits` must be at least 1.
    pub fn new(method: Method, precision_digits: u32) -> Result<Self, DifferentiationError> {
        if precision_digits == 0 {
            return Err(DifferentiationError::InvalidPrecisionDigits(
                precision_digits,
            ));
        }
        Ok(Self {
            method,
            precision_digits,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub fn precision_digits(&self) -> u32 {
        self.precision_digits
    }

    /// Sets the precision digit count. More digits shrink the step, trading
    /// truncation error against floating-point cancellation.
    pub fn set_precision_digits(&mut self, digits: u32) -> Result<(), DifferentiationError> {
        if digits == 0 {
            return Err(DifferentiationError::InvalidPrecisionDigits(digits));
        }
        self.precision_digits = digits;
        Ok(())
    }

    /// `eta = 10^-precision_digits`, the target relative accuracy.
    fn eta<T: Scalar>(&self) -> T {
        T::from_f64(10.0_f64.powi(-(self.precision_digits as i32))).unwrap()
    }

    /// Step used when perturbing the scalar `x`:
    /// `sqrt(eta) * (1 + |x|)`.
    ///
    /// The `1 + |x|` factor keeps the relative step roughly constant across
    /// scales while bounding it away from zero near the origin. Always
    /// positive and finite for finite `x`.
    pub fn step<T: Scalar>(&self, x: T) -> T {
        self.eta::<T>().sqrt() * (T::one() + x.abs())
    }

    /// Per-coordinate steps for the point `x`. Coordinate `i` of the result
    /// is the step the stencils use when perturbing `x[i]`.
    pub fn steps<T: Scalar>(&self, x: &DVector<T>) -> DVector<T> {
        x.map(|xi| self.step(xi))
    }

    /// Routes a dispatched operation to the configured stencil family. This
    /// is the only place `Method` is matched during evaluation; the match is
    /// exhaustive over the closed enum, so an invalid method cannot reach a
    /// stencil.
    fn dispatch<R>(
        &self,
        forward: impl FnOnce(&Self) -> R,
        central: impl FnOnce(&Self) -> R,
    ) -> R {
        match self.method {
            Method::ForwardDifferences => forward(self),
            Method::CentralDifferences => central(self),
        }
    }
}
