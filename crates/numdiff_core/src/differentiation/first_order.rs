//! First-derivative and gradient stencils.

use super::NumericalDifferentiation;
use crate::traits::{Scalar, ScalarField};
use nalgebra::DVector;

impl NumericalDifferentiation {
    /// First derivative of `f` at `x`, using the configured method.
    pub fn derivative<T, F>(&self, f: F, x: T) -> T
    where
        T: Scalar,
        F: Fn(T) -> T,
    {
        self.dispatch(
            |e| e.forward_derivative(&f, x),
            |e| e.central_derivative(&f, x),
        )
    }

    /// Forward quotient `(f(x + h) - f(x)) / h`.
    pub fn forward_derivative<T, F>(&self, f: F, x: T) -> T
    where
        T: Scalar,
        F: Fn(T) -> T,
    {
        let h = self.step(x);
        (f(x + h) - f(x)) / h
    }

    /// Central quotient `(f(x + h) - f(x - h)) / (2h)`.
    pub fn central_derivative<T, F>(&self, f: F, x: T) -> T
    where
        T: Scalar,
        F: Fn(T) -> T,
    {
        let h = self.step(x);
        let two = T::from_f64(2.0).unwrap();
        (f(x + h) - f(x - h)) / (two * h)
    }

    /// Gradient of the scalar field `f` at `x`, using the configured method.
    pub fn gradient<T, F>(&self, f: &F, x: &DVector<T>) -> DVector<T>
    where
        T: Scalar,
        F: ScalarField<T>,
    {
        self.dispatch(|e| e.forward_gradient(f, x), |e| e.central_gradient(f, x))
    }

    /// Gradient by forward differences: one unperturbed evaluation plus one
    /// per coordinate.
    pub fn forward_gradient<T, F>(&self, f: &F, x: &DVector<T>) -> DVector<T>
    where
        T: Scalar,
        F: ScalarField<T>,
    {
        let y = f.evaluate(x);
        let mut gradient = DVector::from_element(x.len(), T::zero());
        for i in 0..x.len() {
            let h = self.step(x[i]);
            let mut forward = x.clone();
            forward[i] = forward[i] + h;
            gradient[i] = (f.evaluate(&forward) - y) / h;
        }
        gradient
    }

    /// Gradient by central differences: two evaluations per coordinate.
    pub fn central_gradient<T, F>(&self, f: &F, x: &DVector<T>) -> DVector<T>
    where
        T: Scalar,
        F: ScalarField<T>,
    {
        let two = T::from_f64(2.0).unwrap();
        let mut gradient = DVector::from_element(x.len(), T::zero());
        for i in 0..x.len() {
            let h = self.step(x[i]);
            let mut forward = x.clone();
            forward[i] = forward[i] + h;
            let mut backward = x.clone();
            backward[i] = backward[i] - h;
            gradient[i] = (f.evaluate(&forward) - f.evaluate(&backward)) / (two * h);
        }
        gradient
    }
}

#[cfg(test)]
mod tests {
    use crate::differentiation::{Method, NumericalDifferentiation};
    use nalgebra::DVector;

    #[test]
    fn both_stencils_recover_the_slope_of_a_line() {
        let engine = NumericalDifferentiation::default();
        let f = |x: f64| 3.0 + 2.5 * x;
        for x in [-10.0, -0.5, 0.0, 1.0, 250.0] {
            assert!((engine.forward_derivative(f, x) - 2.5).abs() < 1e-4);
            assert!((engine.central_derivative(f, x) - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn central_derivative_is_exact_on_quadratics() {
        let engine = NumericalDifferentiation::default();
        let f = |x: f64| 1.0 - 4.0 * x + 0.5 * x * x;
        // f'(x) = -4 + x; the central quotient has no truncation error on
        // quadratics, only rounding.
        for x in [-3.0, 0.0, 2.0] {
            assert!((engine.central_derivative(f, x) - (-4.0 + x)).abs() < 1e-7);
        }
    }

    #[test]
    fn derivative_dispatch_matches_selected_stencil_bit_for_bit() {
        let f = |x: f64| x.sin() * x;
        let x = 1.3;

        let central = NumericalDifferentiation::default();
        assert_eq!(
            central.derivative(f, x).to_bits(),
            central.central_derivative(f, x).to_bits()
        );

        let forward = NumericalDifferentiation::new(Method::ForwardDifferences, 6).unwrap();
        assert_eq!(
            forward.derivative(f, x).to_bits(),
            forward.forward_derivative(f, x).to_bits()
        );
    }

    #[test]
    fn gradient_of_sum_of_squares_is_twice_the_point() {
        let mut engine = NumericalDifferentiation::default();
        let f = |x: &DVector<f64>| x.iter().map(|xi| xi * xi).sum::<f64>();
        let x = DVector::from_vec(vec![1.0, -2.0, 0.25, 0.0]);

        for method in [Method::CentralDifferences, Method::ForwardDifferences] {
            engine.set_method(method);
            let gradient = engine.gradient(&f, &x);
            assert_eq!(gradient.len(), x.len());
            for i in 0..x.len() {
                assert!(
                    (gradient[i] - 2.0 * x[i]).abs() < 1e-2,
                    "{method}: component {i} was {} (expected {})",
                    gradient[i],
                    2.0 * x[i]
                );
            }
        }
    }

    #[test]
    fn gradient_does_not_mutate_the_point() {
        let engine = NumericalDifferentiation::default();
        let f = |x: &DVector<f64>| x[0] * x[1];
        let x = DVector::from_vec(vec![3.0, -7.0]);
        let original = x.clone();
        let _ = engine.gradient(&f, &x);
        assert_eq!(x, original);
    }

    #[test]
    fn gradient_of_empty_point_is_empty() {
        let engine = NumericalDifferentiation::default();
        let f = |_x: &DVector<f64>| 1.0;
        let gradient = engine.gradient(&f, &DVector::from_vec(vec![]));
        assert_eq!(gradient.len(), 0);
    }
}
