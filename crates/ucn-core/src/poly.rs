// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Closed-form real roots of quadratic, cubic, and quartic polynomials.
//!
//! Coefficients are passed highest degree first. A vanishing leading
//! coefficient degrades to the next lower order (4 → 3 → 2 → 1), so callers
//! can hand over raw trajectory coefficients without pre-classifying them.
//! Only real roots are ever reported; repeated roots appear once per
//! multiplicity the closed form produces.

use core::f64::consts::TAU;

use thiserror::Error;

/// Threshold below which the quartic's `W²` is treated as exactly zero.
const W_SQUARED_ZERO: f64 = 1e-10;

/// Newton steps applied to each closed-form cubic and quartic root.
const POLISH_ITERATIONS: usize = 4;

/// Numerical failure inside a closed-form solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// A discriminant that is non-negative in exact arithmetic came out
    /// negative after rounding.
    #[error("negative {stage} discriminant: {value:e}")]
    NegativeDiscriminant {
        /// Which intermediate quantity went negative.
        stage: &'static str,
        /// Its computed value.
        value: f64,
    },
    /// [`solve`] was handed a coefficient count outside `2..=5`.
    #[error("unsupported polynomial: {coefficients} coefficients")]
    UnsupportedDegree {
        /// Number of coefficients passed.
        coefficients: usize,
    },
}

/// Up to four real roots, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Roots {
    values: [f64; 4],
    len: usize,
}

impl Roots {
    /// No real roots.
    pub const fn none() -> Self {
        Self { values: [0.0; 4], len: 0 }
    }

    fn push(&mut self, root: f64) {
        if self.len < self.values.len() {
            self.values[self.len] = root;
            self.len += 1;
        }
    }

    /// Number of real roots found.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no real root was found.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The roots as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    /// Iterates over the roots.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }

    /// Refines every root against the original coefficients.
    fn polished(mut self, coefficients: &[f64]) -> Self {
        for root in &mut self.values[..self.len] {
            *root = polish(coefficients, *root);
        }
        self
    }
}

/// Value and derivative at `x` of the polynomial with highest-degree-first
/// `coefficients`.
fn evaluate(coefficients: &[f64], x: f64) -> (f64, f64) {
    coefficients.iter().fold((0.0, 0.0), |(p, dp), &c| (p * x + c, dp * x + p))
}

/// Newton-refines `x`. A step is kept only if it shrinks the residual, so a
/// flat derivative near a repeated root cannot throw `x` onto another root.
fn polish(coefficients: &[f64], x: f64) -> f64 {
    let (mut x, (mut value, mut slope)) = (x, evaluate(coefficients, x));
    for _ in 0..POLISH_ITERATIONS {
        if value == 0.0 || slope == 0.0 {
            break;
        }
        let next = x - value / slope;
        let (next_value, next_slope) = evaluate(coefficients, next);
        if next_value.is_nan() || next_value.abs() >= value.abs() {
            break;
        }
        (x, value, slope) = (next, next_value, next_slope);
    }
    x
}

/// Solves `b·x + c = 0`.
///
/// Returns one root when `b ≠ 0`, none otherwise (including the identity
/// `0 = 0`, which has no isolated root).
pub fn solve_linear(b: f64, c: f64) -> Roots {
    let mut roots = Roots::none();
    if b != 0.0 {
        roots.push(-c / b);
    }
    roots
}

/// Solves `a·x² + b·x + c = 0`.
///
/// `a = 0` falls back to [`solve_linear`]. `c = 0` factors out the exact
/// root `x = 0`, which keeps "already on this surface" roots exact instead
/// of rounding to ±1e-17.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    if a == 0.0 {
        return solve_linear(b, c);
    }
    let mut roots = Roots::none();
    if c == 0.0 {
        roots.push(0.0);
        roots.push(-b / a);
        return roots;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return roots;
    }
    if disc == 0.0 {
        roots.push(-b / (2.0 * a));
        return roots;
    }
    // Avoid cancellation: compute the larger-magnitude root first.
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    if q == 0.0 {
        // b = 0 and the roots are ±sqrt(-c/a).
        let r = (-c / a).sqrt();
        roots.push(r);
        roots.push(-r);
        return roots;
    }
    roots.push(q / a);
    roots.push(c / q);
    roots
}

/// Solves `a·x³ + b·x² + c·x + d = 0`.
///
/// Uses the trigonometric/hyperbolic form of Cardano's method on the
/// depressed cubic `t³ + p·t + q = 0`, then Newton-polishes each root.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    if a == 0.0 {
        return solve_quadratic(b, c, d);
    }
    if d == 0.0 {
        let mut roots = solve_quadratic(a, b, c);
        roots.push(0.0);
        return roots;
    }
    let a2 = b / a;
    let a1 = c / a;
    let a0 = d / a;
    let shift = a2 / 3.0;
    let p = a1 - a2 * a2 / 3.0;
    let q = 2.0 * a2 * a2 * a2 / 27.0 - a2 * a1 / 3.0 + a0;

    let mut roots = Roots::none();
    if p == 0.0 {
        roots.push((-q).cbrt() - shift);
        return roots.polished(&[a, b, c, d]);
    }
    let s = (p.abs() / 3.0).sqrt();
    let big_c = 0.5 * q * (3.0 / p.abs()).powf(1.5);
    if p > 0.0 {
        roots.push(-2.0 * s * (big_c.asinh() / 3.0).sinh() - shift);
    } else if big_c > 1.0 {
        roots.push(-2.0 * s * (big_c.acosh() / 3.0).cosh() - shift);
    } else if big_c < -1.0 {
        roots.push(2.0 * s * ((-big_c).acosh() / 3.0).cosh() - shift);
    } else {
        let phi = (-big_c).acos() / 3.0;
        for k in 0..3 {
            roots.push(2.0 * s * (phi - TAU * f64::from(k) / 3.0).cos() - shift);
        }
    }
    roots.polished(&[a, b, c, d])
}

/// Solves `a·x⁴ + b·x³ + c·x² + d·x + e = 0`.
///
/// Reduces to the monic form `x⁴ + a3·x³ + a2·x² + a1·x + a0`, takes the
/// largest real root `y` of the resolvent cubic, and back-substitutes
/// through `W² = ¼a3² − a2 + y`. `W² < 0` is reported as
/// [`SolverError::NegativeDiscriminant`] rather than clamped. The
/// back-substituted roots lose accuracy when the resolvent root is large
/// next to `W`, so each is Newton-polished against `a..e`.
pub fn solve_quartic(a: f64, b: f64, c: f64, d: f64, e: f64) -> Result<Roots, SolverError> {
    if a == 0.0 {
        return Ok(solve_cubic(b, c, d, e));
    }
    if e == 0.0 {
        let mut roots = solve_cubic(a, b, c, d);
        roots.push(0.0);
        return Ok(roots);
    }
    let a3 = b / a;
    let a2 = c / a;
    let a1 = d / a;
    let a0 = e / a;

    let c1 = -a2;
    let c2 = a1 * a3 - 4.0 * a0;
    let c3 = 4.0 * a2 * a0 - a1 * a1 - a3 * a3 * a0;
    let y = solve_cubic(1.0, c1, c2, c3).iter().fold(f64::NEG_INFINITY, f64::max);

    let mut w_sq = 0.25 * a3 * a3 - a2 + y;
    if w_sq < 0.0 {
        return Err(SolverError::NegativeDiscriminant { stage: "quartic W²", value: w_sq });
    }
    if w_sq < W_SQUARED_ZERO {
        w_sq = 0.0;
    }
    let w = w_sq.sqrt();

    let (u_sq, v_sq) = if w == 0.0 {
        let inner = y * y - 4.0 * a0;
        if inner < 0.0 {
            // (x² + ½a3·x + ½y)² equals a negative constant.
            return Ok(Roots::none());
        }
        let base = 0.75 * a3 * a3 - 2.0 * a2;
        (base + 2.0 * inner.sqrt(), base - 2.0 * inner.sqrt())
    } else {
        let base = 0.75 * a3 * a3 - w_sq - 2.0 * a2;
        let skew = 0.25 * (4.0 * a3 * a2 - 8.0 * a1 - a3 * a3 * a3) / w;
        (base + skew, base - skew)
    };

    let mut roots = Roots::none();
    let centre = -0.25 * a3;
    if u_sq >= 0.0 {
        let u = u_sq.sqrt();
        roots.push(centre + 0.5 * w + 0.5 * u);
        roots.push(centre + 0.5 * w - 0.5 * u);
    }
    if v_sq >= 0.0 {
        let v = v_sq.sqrt();
        roots.push(centre - 0.5 * w + 0.5 * v);
        roots.push(centre - 0.5 * w - 0.5 * v);
    }
    Ok(roots.polished(&[a, b, c, d, e]))
}

/// Solves a polynomial of degree ≤ 4 given highest-degree-first
/// coefficients, dispatching on the slice length.
///
/// Fewer than two or more than five coefficients is
/// [`SolverError::UnsupportedDegree`].
pub fn solve(coefficients: &[f64]) -> Result<Roots, SolverError> {
    match *coefficients {
        [b, c] => Ok(solve_linear(b, c)),
        [a, b, c] => Ok(solve_quadratic(a, b, c)),
        [a, b, c, d] => Ok(solve_cubic(a, b, c, d)),
        [a, b, c, d, e] => solve_quartic(a, b, c, d, e),
        _ => Err(SolverError::UnsupportedDegree { coefficients: coefficients.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sorted(roots: Roots) -> Vec<f64> {
        let mut v = roots.as_slice().to_vec();
        v.sort_by(f64::total_cmp);
        v
    }

    #[test]
    fn quadratic_with_zero_constant_has_exact_zero_root() {
        let r = sorted(solve_quadratic(2.0, -4.0, 0.0));
        assert_eq!(r, vec![0.0, 2.0]);
    }

    #[test]
    fn quadratic_leading_zero_is_linear() {
        let r = solve_quadratic(0.0, 2.0, -3.0);
        assert_eq!(r.as_slice(), &[1.5]);
    }

    #[test]
    fn quadratic_negative_discriminant_has_no_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn cubic_three_real_roots() {
        // (x - 1)(x - 2)(x + 3) = x³ - 7x + 6
        let r = sorted(solve_cubic(1.0, 0.0, -7.0, 6.0));
        assert_eq!(r.len(), 3);
        assert_relative_eq!(r[0], -3.0, epsilon = 1e-12);
        assert_relative_eq!(r[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[2], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn cubic_single_real_root_hyperbolic_branches() {
        // x³ + x + 2 = (x + 1)(x² - x + 2)
        let r = solve_cubic(1.0, 0.0, 1.0, 2.0);
        assert_eq!(r.len(), 1);
        assert_relative_eq!(r.as_slice()[0], -1.0, epsilon = 1e-12);
        // x³ - 3x - 4: p < 0, C > 1
        let r = solve_cubic(1.0, 0.0, -3.0, -4.0);
        assert_eq!(r.len(), 1);
        let x = r.as_slice()[0];
        assert_relative_eq!(x * x * x - 3.0 * x - 4.0, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn quartic_four_real_roots() {
        // (x - 1)(x + 1)(x - 2)(x + 3) = x⁴ + x³ - 7x² - x + 6
        let r = sorted(solve_quartic(1.0, 1.0, -7.0, -1.0, 6.0).unwrap_or_default());
        assert_eq!(r.len(), 4);
        for (got, want) in r.iter().zip([-3.0, -1.0, 1.0, 2.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn quartic_without_real_roots() {
        let r = solve_quartic(1.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(r.map(|r| r.len()), Ok(0));
    }

    #[test]
    fn quartic_roots_are_polished_to_machine_residual() {
        // Radial equation of a grazing path in a tube under sideways gravity;
        // the unrefined closed form misses the wall crossing by ~1e-5.
        let (a, b, c, d, e) = (24.059_025, -12.269_367, 1.944_878_658_1, -0.097_036_526, -0.088_023_67);
        let roots = solve_quartic(a, b, c, d, e).unwrap_or_default();
        assert!(!roots.is_empty());
        for x in roots.iter() {
            let (value, _) = evaluate(&[a, b, c, d, e], x);
            assert!(value.abs() < 1e-12, "residual {value:e} at {x}");
        }
    }

    #[test]
    fn polish_leaves_a_double_root_in_place() {
        // (x - 1)² has a zero derivative at its root.
        assert_eq!(polish(&[1.0, -2.0, 1.0], 1.0), 1.0);
        let near = polish(&[1.0, -2.0, 1.0], 1.0 + 1e-9);
        assert!((near - 1.0).abs() < 2e-9);
    }

    #[test]
    fn solve_rejects_unsupported_degrees() {
        assert_eq!(solve(&[1.0]), Err(SolverError::UnsupportedDegree { coefficients: 1 }));
        assert_eq!(solve(&[]), Err(SolverError::UnsupportedDegree { coefficients: 0 }));
        assert_eq!(
            solve(&[1.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
            Err(SolverError::UnsupportedDegree { coefficients: 6 })
        );
        assert_eq!(solve(&[2.0, -1.0]).map(|r| r.as_slice().to_vec()), Ok(vec![0.5]));
    }

    #[test]
    fn quartic_falls_back_through_orders() {
        let r = solve_quartic(0.0, 0.0, 0.0, 2.0, -1.0);
        assert_eq!(r.map(|r| r.as_slice().to_vec()), Ok(vec![0.5]));
    }
}
