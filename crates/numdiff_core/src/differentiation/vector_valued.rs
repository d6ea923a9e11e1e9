//! Jacobian and Hessian-form stencils for vector-valued functions.
//!
//! For `f: R^n -> R^m` the Jacobian is the `m x n` matrix whose column `j`
//! comes from perturbing coordinate `j` alone. The Hessian form is `m`
//! separate `n x n` Hessians, one per output component; the probed points
//! are shared across components, so each vector evaluation fills one entry
//! of every slice.

use super::NumericalDifferentiation;
use crate::traits::{Scalar, VectorField};
use nalgebra::{DMatrix, DVector};

impl NumericalDifferentiation {
    /// Jacobian of the vector field `f` at `x`, using the configured method.
    pub fn jacobian<T, F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        T: Scalar,
        F: VectorField<T>,
    {
        self.dispatch(|e| e.forward_jacobian(f, x), |e| e.central_jacobian(f, x))
    }

    /// Jacobian by forward differences: `n + 1` vector evaluations.
    pub fn forward_jacobian<T, F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        T: Scalar,
        F: VectorField<T>,
    {
        let n = x.len();
        let y = f.evaluate(x);
        let m = y.len();
        let mut jacobian = DMatrix::from_element(m, n, T::zero());

        for j in 0..n {
            let h = self.step(x[j]);
            let mut forward = x.clone();
            forward[j] = forward[j] + h;
            let y_f = f.evaluate(&forward);
            for i in 0..m {
                jacobian[(i, j)] = (y_f[i] - y[i]) / h;
            }
        }
        jacobian
    }

    /// Jacobian by central differences: `2n` vector evaluations.
    pub fn central_jacobian<T, F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        T: Scalar,
        F: VectorField<T>,
    {
        let n = x.len();
        let two = T::from_f64(2.0).unwrap();
        let mut columns: Vec<DVector<T>> = Vec::with_capacity(n);

        for j in 0..n {
            let h = self.step(x[j]);
            let mut forward = x.clone();
            forward[j] = forward[j] + h;
            let mut backward = x.clone();
            backward[j] = backward[j] - h;

            let y_f = f.evaluate(&forward);
            let y_b = f.evaluate(&backward);
            let mut column = DVector::from_element(y_f.len(), T::zero());
            for i in 0..column.len() {
                column[i] = (y_f[i] - y_b[i]) / (two * h);
            }
            columns.push(column);
        }

        if columns.is_empty() {
            // A zero-dimensional point gives a Jacobian with no columns.
            DMatrix::from_element(0, 0, T::zero())
        } else {
            DMatrix::from_columns(&columns)
        }
    }

    /// Hessian form of the vector field `f` at `x`, using the configured
    /// method: one Hessian per output component.
    pub fn hessian_form<T, F>(&self, f: &F, x: &DVector<T>) -> Vec<DMatrix<T>>
    where
        T: Scalar,
        F: VectorField<T>,
    {
        self.dispatch(
            |e| e.forward_hessian_form(f, x),
            |e| e.central_hessian_form(f, x),
        )
    }

    /// Hessian form by forward differences. Same stencils as the scalar
    /// Hessian; component `k` of each probe fills slice `k`.
    pub fn forward_hessian_form<T, F>(&self, f: &F, x: &DVector<T>) -> Vec<DMatrix<T>>
    where
        T: Scalar,
        F: VectorField<T>,
    {
        let n = x.len();
        let two = T::from_f64(2.0).unwrap();
        let y = f.evaluate(x);
        let m = y.len();
        let mut forms = vec![DMatrix::from_element(n, n, T::zero()); m];

        for i in 0..n {
            let h_i = self.step(x[i]);

            let mut x_f = x.clone();
            x_f[i] = x_f[i] + h_i;
            let y_f = f.evaluate(&x_f);

            let mut x_2f = x.clone();
            x_2f[i] = x_2f[i] + two * h_i;
            let y_2f = f.evaluate(&x_2f);

            for (k, form) in forms.iter_mut().enumerate() {
                form[(i, i)] = (y_2f[k] - two * y_f[k] + y[k]) / (h_i * h_i);
            }

            for j in (i + 1)..n {
                let h_j = self.step(x[j]);

                let mut x_fj = x.clone();
                x_fj[j] = x_fj[j] + h_j;
                let y_fj = f.evaluate(&x_fj);

                let mut x_fij = x_f.clone();
                x_fij[j] = x_fij[j] + h_j;
                let y_fij = f.evaluate(&x_fij);

                for (k, form) in forms.iter_mut().enumerate() {
                    let entry = (y_fij[k] - y_f[k] - y_fj[k] + y[k]) / (h_i * h_j);
                    form[(i, j)] = entry;
                    form[(j, i)] = entry;
                }
            }
        }
        forms
    }

    /// Hessian form by central differences. Same stencils as the scalar
    /// Hessian; component `k` of each probe fills slice `k`.
    pub fn central_hessian_form<T, F>(&self, f: &F, x: &DVector<T>) -> Vec<DMatrix<T>>
    where
        T: Scalar,
        F: VectorField<T>,
    {
        let n = x.len();
        let two = T::from_f64(2.0).unwrap();
        let c4 = T::from_f64(4.0).unwrap();
        let c16 = T::from_f64(16.0).unwrap();
        let c30 = T::from_f64(30.0).unwrap();
        let c12 = T::from_f64(12.0).unwrap();
        let y = f.evaluate(x);
        let m = y.len();
        let mut forms = vec![DMatrix::from_element(n, n, T::zero()); m];

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

            let y_f = f.evaluate(&x_f);
            let y_b = f.evaluate(&x_b);
            let y_2f = f.evaluate(&x_2f);
            let y_2b = f.evaluate(&x_2b);

            for (k, form) in forms.iter_mut().enumerate() {
                form[(i, i)] = (-y_2f[k] + c16 * y_f[k] - c30 * y[k] + c16 * y_b[k] - y_2b[k])
                    / (c12 * h_i * h_i);
            }

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

                let y_pp = f.evaluate(&x_pp);
                let y_pm = f.evaluate(&x_pm);
                let y_mp = f.evaluate(&x_mp);
                let y_mm = f.evaluate(&x_mm);

                for (k, form) in forms.iter_mut().enumerate() {
                    let entry = (y_pp[k] - y_pm[k] - y_mp[k] + y_mm[k]) / (c4 * h_i * h_j);
                    form[(i, j)] = entry;
                    form[(j, i)] = entry;
                }
            }
        }
        forms
    }
}

#[cfg(test)]
mod tests {
    use crate::differentiation::{Method, NumericalDifferentiation};
    use nalgebra::DVector;

    #[test]
    fn jacobian_of_a_linear_map_is_its_matrix() {
        let f = |x: &DVector<f64>| DVector::from_vec(vec![x[0] + x[1], x[0] - x[1]]);
        let x = DVector::from_vec(vec![0.7, -1.9]);
        let expected = [[1.0, 1.0], [1.0, -1.0]];

        let mut engine = NumericalDifferentiation::default();
        for method in [Method::CentralDifferences, Method::ForwardDifferences] {
            engine.set_method(method);
            let jacobian = engine.jacobian(&f, &x);
            assert_eq!(jacobian.nrows(), 2);
            assert_eq!(jacobian.ncols(), 2);
            for i in 0..2 {
                for j in 0..2 {
                    assert!(
                        (jacobian[(i, j)] - expected[i][j]).abs() < 1e-4,
                        "{method}: J[{i}][{j}] = {}",
                        jacobian[(i, j)]
                    );
                }
            }
        }
    }

    #[test]
    fn jacobian_of_a_rectangular_map_has_output_by_input_shape() {
        // R^2 -> R^3, J = [[1, 0], [0, 1], [x1, x0]].
        let f = |x: &DVector<f64>| DVector::from_vec(vec![x[0], x[1], x[0] * x[1]]);
        let x = DVector::from_vec(vec![2.0, -0.5]);

        let engine = NumericalDifferentiation::default();
        let jacobian = engine.central_jacobian(&f, &x);
        assert_eq!(jacobian.nrows(), 3);
        assert_eq!(jacobian.ncols(), 2);
        assert!((jacobian[(2, 0)] - x[1]).abs() < 1e-3);
        assert!((jacobian[(2, 1)] - x[0]).abs() < 1e-3);
    }

    #[test]
    fn jacobian_dispatch_matches_selected_stencil_bit_for_bit() {
        let f = |x: &DVector<f64>| DVector::from_vec(vec![x[0].sin(), x[0] * x[1], x[1].exp()]);
        let x = DVector::from_vec(vec![0.4, 1.2]);

        let engine = NumericalDifferentiation::default();
        let dispatched = engine.jacobian(&f, &x);
        let direct = engine.central_jacobian(&f, &x);
        assert_eq!(dispatched.nrows(), direct.nrows());
        for i in 0..dispatched.nrows() {
            for j in 0..dispatched.ncols() {
                assert_eq!(dispatched[(i, j)].to_bits(), direct[(i, j)].to_bits());
            }
        }
    }

    #[test]
    fn hessian_form_separates_output_components() {
        // f(x) = [x0^2, x1^2]: slice 0 is [[2, 0], [0, 0]] and slice 1 is
        // [[0, 0], [0, 2]].
        let f = |x: &DVector<f64>| DVector::from_vec(vec![x[0] * x[0], x[1] * x[1]]);
        let x = DVector::from_vec(vec![1.0, -2.0]);
        let expected = [[[2.0, 0.0], [0.0, 0.0]], [[0.0, 0.0], [0.0, 2.0]]];

        let mut engine = NumericalDifferentiation::default();
        for method in [Method::CentralDifferences, Method::ForwardDifferences] {
            engine.set_method(method);
            let forms = engine.hessian_form(&f, &x);
            assert_eq!(forms.len(), 2);
            for (k, form) in forms.iter().enumerate() {
                assert_eq!(form.nrows(), 2);
                assert_eq!(form.ncols(), 2);
                for i in 0..2 {
                    for j in 0..2 {
                        assert!(
                            (form[(i, j)] - expected[k][i][j]).abs() < 1e-2,
                            "{method}: slice {k} entry [{i}][{j}] = {}",
                            form[(i, j)]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn hessian_form_slices_are_symmetric_bit_for_bit() {
        let f = |x: &DVector<f64>| {
            DVector::from_vec(vec![(x[0] * x[1]).cos(), x[0] * x[1] * x[2]])
        };
        let x = DVector::from_vec(vec![0.9, -0.4, 1.7]);

        let mut engine = NumericalDifferentiation::default();
        for method in [Method::CentralDifferences, Method::ForwardDifferences] {
            engine.set_method(method);
            for (k, form) in engine.hessian_form(&f, &x).iter().enumerate() {
                for i in 0..3 {
                    for j in 0..3 {
                        assert_eq!(
                            form[(i, j)].to_bits(),
                            form[(j, i)].to_bits(),
                            "{method}: slice {k} asymmetric at [{i}][{j}]"
                        );
                    }
                }
            }
        }
    }
}
