//! `Array` — a fixed-length one-dimensional vector of reals.
//!
//! A thin newtype around `nalgebra::DVector<f64>` exposing the elementwise
//! operations the lattice recursions are written in: powers of a common
//! base, componentwise products, exponentials, cumulative sums, and slicing
//! from either end. Binary operations require operands of equal length and
//! panic otherwise.

use nalgebra::DVector;
use std::ops::{Add, Index, IndexMut, Sub};

/// A fixed-length 1D vector of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Array(DVector<f64>);

#[inline]
fn check_len(op: &str, lhs: usize, rhs: usize) {
    assert_eq!(lhs, rhs, "array length mismatch in {op}: {lhs} vs {rhs}");
}

impl Array {
    /// Create a zero-filled array of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self(DVector::zeros(n))
    }

    /// Create an array filled with `value`.
    pub fn from_element(n: usize, value: f64) -> Self {
        Self(DVector::from_element(n, value))
    }

    /// Create an array from a `Vec`.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self(DVector::from_vec(data))
    }

    /// Create an array from a slice.
    pub fn from_slice(data: &[f64]) -> Self {
        Self(DVector::from_column_slice(data))
    }

    /// Create an array of length `n` from an index function.
    pub fn from_fn<F: FnMut(usize) -> f64>(n: usize, mut f: F) -> Self {
        Self(DVector::from_fn(n, |i, _| f(i)))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the elements as a slice.
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    /// Copy the elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.as_slice().to_vec()
    }

    /// Iterator over elements.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    /// Apply a function element-wise, returning a new array.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self(self.0.map(f))
    }

    /// Multiply every element by `scalar`.
    pub fn scale(&self, scalar: f64) -> Self {
        Self(&self.0 * scalar)
    }

    /// Raise `base` to each element: `out[i] = base^self[i]`.
    pub fn pow_base(&self, base: f64) -> Self {
        self.map(|x| base.powf(x))
    }

    /// Element-wise product with another array of the same length.
    pub fn component_mul(&self, other: &Array) -> Self {
        check_len("component_mul", self.len(), other.len());
        Self(self.0.component_mul(&other.0))
    }

    /// Element-wise exponential.
    pub fn exp(&self) -> Self {
        self.map(f64::exp)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f64 {
        self.0.sum()
    }

    /// Minimum element.
    pub fn min(&self) -> f64 {
        self.0.min()
    }

    /// Maximum element.
    pub fn max(&self) -> f64 {
        self.0.max()
    }

    /// Running sum: `out[i] = self[0] + ... + self[i]`.
    pub fn cumsum(&self) -> Self {
        let mut acc = 0.0;
        Self::from_fn(self.len(), |i| {
            acc += self.0[i];
            acc
        })
    }

    /// Elements in reverse order.
    pub fn reversed(&self) -> Self {
        let n = self.len();
        Self::from_fn(n, |i| self.0[n - 1 - i])
    }

    /// First `n` elements.
    pub fn head(&self, n: usize) -> Self {
        Self(self.0.rows(0, n).into_owned())
    }

    /// Last `n` elements.
    pub fn tail(&self, n: usize) -> Self {
        Self(self.0.rows(self.len() - n, n).into_owned())
    }
}

impl Index<usize> for Array {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Array {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl Add for Array {
    type Output = Array;

    fn add(self, rhs: Array) -> Array {
        check_len("add", self.len(), rhs.len());
        Array(self.0 + rhs.0)
    }
}

impl Sub for Array {
    type Output = Array;

    fn sub(self, rhs: Array) -> Array {
        check_len("sub", self.len(), rhs.len());
        Array(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_base_and_component_mul() {
        let exponents = Array::from_fn(4, |i| i as f64);
        let powers = exponents.pow_base(2.0);
        assert_eq!(powers.as_slice(), &[1.0, 2.0, 4.0, 8.0]);

        let product = powers.component_mul(&Array::from_element(4, 0.5));
        assert_eq!(product.as_slice(), &[0.5, 1.0, 2.0, 4.0]);
    }

    #[test]
    fn cumsum_reversed_head_tail() {
        let a = Array::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.cumsum().as_slice(), &[1.0, 3.0, 6.0, 10.0]);
        assert_eq!(a.reversed().as_slice(), &[4.0, 3.0, 2.0, 1.0]);
        assert_eq!(a.head(2).as_slice(), &[1.0, 2.0]);
        assert_eq!(a.tail(3).as_slice(), &[2.0, 3.0, 4.0]);
        assert_eq!(a.sum(), 10.0);
    }

    #[test]
    fn exp_scale_and_operators() {
        let a = Array::from_vec(vec![0.0, 1.0]);
        let e = a.exp();
        assert!((e[0] - 1.0).abs() < 1.0e-15);
        assert!((e[1] - std::f64::consts::E).abs() < 1.0e-15);

        let b = a.scale(3.0) + Array::from_element(2, 1.0);
        assert_eq!(b.as_slice(), &[1.0, 4.0]);
        let c = b - Array::from_element(2, 1.0);
        assert_eq!(c.as_slice(), &[0.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "array length mismatch")]
    fn mismatched_lengths_fail_fast() {
        let _ = Array::zeros(3) + Array::zeros(4);
    }
}
