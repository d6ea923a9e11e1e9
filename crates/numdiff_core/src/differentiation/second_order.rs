//! Second-derivative and Hessian stencils.
//!
//! Hessians compute the upper triangle only and mirror it into the lower
//! triangle, which halves the evaluation cost and makes the matrix symmetric
//! bit-for-bit.

use super::NumericalDifferentiation;
use crate::traits::{Scalar, ScalarField};
use nalgebra::{DMatrix, DVector};

impl NumericalDifferentiation {
    /// Second derivative of `f` at `x`, using the configured method.
    pub fn second_derivative<T, F>(&self, f: F, x: T) -> T
    where
        T: Scalar,
        F: Fn(T) -> T,
    {
        self.dispatch(
            |e| e.forward_second_derivative(&f, x),
            |e| e.central_second_derivative(&f, x),
        )
    }

    /// Three-point one-sided stencil
    /// `(f(x + 2h) - 2 f(x + h) + f(x)) / h^2`.
    pub fn forward_second_derivative<T, F>(&self, f: F, x: T) -> T
    where
        T: Scalar,
        F: Fn(T) -> T,
    {
        let h = self.step(x);
        let two = T::from_f64(2.0).unwrap();
        (f(x + two * h) - two * f(x + h) + f(x)) / (h * h)
    }

    /// Five-point symmetric stencil
    /// `(-f(x + 2h) + 16 f(x + h) - 30 f(x) + 16 f(x - h) - f(x - 2h)) / (12 h^2)`.
    pub fn central_second_derivative<T, F>(&self, f: F, x: T) -> T
    where
        T: Scalar,
        F: Fn(T) -> T,
    {
        let h = self.step(x);
        let two = T::from_f64(2.0).unwrap();
        let c16 = T::from_f64(16.0).unwrap();
        let c30 = T::from_f64(30.0).unwrap();
        let c12 = T::from_f64(12.0).unwrap();
        (-f(x + two * h) + c16 * f(x + h) - c30 * f(x) + c16 * f(x - h) - f(x - two * h))
            / (c12 * h * h)
    }

    /// Hessian of the scalar field `f` at `x`, using the configured method.
    pub fn hessian<T, F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        T: Scalar,
        F: ScalarField<T>,
    {
        self.dispatch(|e| e.forward_hessian(f, x), |e| e.central_hessian(f, x))
    }

    /// Hessian by forward differences. Diagonal entries use the one-sided
    /// three-point stencil per coordinate; off-diagonal entries use the
    /// four-point cross
    /// `(f(x + h_i + h_j) - f(x + h_i) - f(x + h_j) + f(x)) / (h_i h_j)`.
    pub fn forward_hessian<T, F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        T: Scalar,
        F: ScalarField<T>,
    {
        let n = x.len();
        let two = T::from_f64(2.0).unwrap();
        let y = f.evaluate(x);
        let mut hessian = DMatrix::from_element(n, n, T::zero());

        for i in 0..n {
            let h_i = self.step(x[i]);

            let mut x_f = x.clone();
            x_f[i] = x_f[i] + h_i;
            let y_f = f.evaluate(&x_f);

            let mut x_2f = x.clone();
            x_2f[i] = x_2f[i] + two * h_i;
            hessian[(i, i)] = (f.evaluate(&x_2f) - two * y_f + y) / (h_i * h_i);

            for j in (i + 1)..n {
                let h_j = self.step(x[j]);

                let mut x_fj = x.clone();
                x_fj[j] = x_fj[j] + h_j;

                let mut x_fij = x_f.clone();
                x_fij[j] = x_fij[j] + h_j;

                let entry =
                    (f.evaluate(&x_fij) - y_f - f.evaluate(&x_fj) + y) / (h_i * h_j);
                hessian[(i, j)] = entry;
                hessian[(j, i)] = entry;
            }
        }
        hessian
    }

    /// Hessian by central differences. Diagonal entries use the five-point
    /// stencil per coordinate; off-diagonal entries use the four-point
    /// mixed-partial stencil
    /// `(f(++) - f(+-) - f(-+) + f(--)) / (4 h_i h_j)`.
    pub fn central_hessian<T, F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        T: Scalar,
        F: ScalarField<T>,
    {
        let n = x.len();
        let two = T::from_f64(2.0).unwrap();
        let c4 = T::from_f64(4.0).unwrap();
        let c16 = T::from_f64(16.0).unwrap();
        let c30 = T::from_f64(30.0).unwrap();
        let c12 = T::from_f64(12.0).unwrap();
        let y = f.evaluate(x);
        let mut hessian = DMatrix::from_element(n, n, T::zero());

        for i in 0..n {
            let h_i = self.step(x[i]);

            let mut x_f = x.clone();
            x_f[i] = x_f[i] + h_i;
            let mut x_b = x.clone();
            x_b[i] = x_b[i] - h_i;
            let mut x_2f = x.clone();
            x_2f[i] = x_2f[i] + two * h_i;
            let mut x_2b = x.clone();
            x_2b[i] = x_2b[i] - two * h_i;

            hessian[(i, i)] = (-f.evaluate(&x_2f) + c16 * f.evaluate(&x_f) - c30 * y
                + c16 * f.evaluate(&x_b)
                - f.evaluate(&x_2b))
                / (c12 * h_i * h_i);

            for j in (i + 1)..n {
                let h_j = self.step(x[j]);

                let mut x_pp = x.clone();
                x_pp[i] = x_pp[i] + h_i;
                x_pp[j] = x_pp[j] + h_j;

                let mut x_pm = x.clone();
                x_pm[i] = x_pm[i] + h_i;
                x_pm[j] = x_pm[j] - h_j;

                let mut x_mp = x.clone();
                x_mp[i] = x_mp[i] - h_i;
                x_mp[j] = x_mp[j] + h_j;

                let mut x_mm = x.clone();
                x_mm[i] = x_mm[i] - h_i;
                x_mm[j] = x_mm[j] - h_j;

                let entry = (f.evaluate(&x_pp) - f.evaluate(&x_pm) - f.evaluate(&x_mp)
                    + f.evaluate(&x_mm))
                    / (c4 * h_i * h_j);
                hessian[(i, j)] = entry;
                hessian[(j, i)] = entry;
            }
        }
        hessian
    }
}
