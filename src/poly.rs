//! Polynomial evaluation for sensor ephemerides, grid timing, and polar-format
//! phase parameters.
//!
//! Coefficients are stored in ascending order of power, so `coeffs[i]`
//! multiplies `t^i`. All three families share the same derivative rule
//! (`i * c_i`, degree reduced by one), applied per coefficient element.

use nalgebra::Vector3;

/// 1-D polynomial in a scalar variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from ascending coefficients: `coeffs[i]` scales `t^i`.
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    /// Creates a degree-zero polynomial with the given constant value.
    pub fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// Evaluates the polynomial at `t` using Horner's scheme.
    ///
    /// # Example
    /// ```
    /// use sicd_projection::poly::Polynomial;
    ///
    /// let p = Polynomial::new(vec![1.0, 2.0, 3.0]); // 1 + 2t + 3t^2
    /// assert_eq!(p.eval(2.0), 17.0);
    /// ```
    #[inline]
    pub fn eval(&self, t: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }

    /// Returns the derivative polynomial, one degree lower.
    ///
    /// The derivative of a constant (or empty) polynomial is the zero constant.
    pub fn derivative(&self) -> Polynomial {
        if self.coeffs.len() <= 1 {
            return Polynomial::constant(0.0);
        }
        Polynomial::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, &c)| i as f64 * c)
                .collect(),
        )
    }

    /// The ascending coefficient slice.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }
}

/// Polynomial with 3-vector coefficients, used for sensor position ephemerides.
///
/// Evaluating at a time yields an ECEF position; the derivative evaluated at
/// the same time yields the velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzPolynomial {
    coeffs: Vec<Vector3<f64>>,
}

impl XyzPolynomial {
    /// Creates an xyz polynomial from ascending 3-vector coefficients.
    pub fn new(coeffs: Vec<Vector3<f64>>) -> Self {
        Self { coeffs }
    }

    /// Creates a degree-zero xyz polynomial with the given constant position.
    pub fn constant(c: Vector3<f64>) -> Self {
        Self { coeffs: vec![c] }
    }

    /// Evaluates the polynomial at `t` using Horner's scheme.
    #[inline]
    pub fn eval(&self, t: f64) -> Vector3<f64> {
        self.coeffs
            .iter()
            .rev()
            .fold(Vector3::zeros(), |acc, c| acc * t + c)
    }

    /// Returns the derivative polynomial, one degree lower.
    pub fn derivative(&self) -> XyzPolynomial {
        if self.coeffs.len() <= 1 {
            return XyzPolynomial::constant(Vector3::zeros());
        }
        XyzPolynomial::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| i as f64 * c)
                .collect(),
        )
    }

    /// The ascending coefficient slice.
    pub fn coeffs(&self) -> &[Vector3<f64>] {
        &self.coeffs
    }
}

/// Bivariate polynomial over image grid coordinates (xrow, ycol).
///
/// `coeffs[i][j]` scales `xrow^i * ycol^j`. Rows may be ragged.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial2d {
    coeffs: Vec<Vec<f64>>,
}

impl Polynomial2d {
    /// Creates a bivariate polynomial from ascending coefficient rows.
    pub fn new(coeffs: Vec<Vec<f64>>) -> Self {
        Self { coeffs }
    }

    /// Creates a degree-zero bivariate polynomial with the given constant value.
    pub fn constant(c: f64) -> Self {
        Self {
            coeffs: vec![vec![c]],
        }
    }

    /// Evaluates the polynomial at `(xrow, ycol)` with nested Horner passes.
    #[inline]
    pub fn eval(&self, xrow: f64, ycol: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, row| {
            acc * xrow + row.iter().rev().fold(0.0, |r, &c| r * ycol + c)
        })
    }
}
