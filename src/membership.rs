use serde::{Deserialize, Serialize};

/// A piecewise-linear membership function.
///
/// Both shapes rise linearly from 0 at `a` to 1 at `b` and fall linearly back
/// to 0, at `c` for a triangle or from `c` to `d` for a trapezoid. An edge of
/// zero width is a perfect step, so shoulders such as `Trapezoidal(0, 0, 1, 2)`
/// are 1 at the left end of the universe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MembershipFunction {
    /// `(a, b, c)` with `a <= b <= c`
    Triangular(f64, f64, f64),
    /// `(a, b, c, d)` with `a <= b <= c <= d`
    Trapezoidal(f64, f64, f64, f64),
}

impl MembershipFunction {
    /// Degree of membership of `x`. Always within `[0, 1]`, never NaN.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.;
        }

        let (a, b, c, d) = self.corners();

        let degree = if x < a || x > d {
            0.
        } else if x >= b && x <= c {
            1.
        } else if x < b {
            // a <= x < b, so b > a
            (x - a) / (b - a)
        } else {
            // c < x <= d, so d > c
            (d - x) / (d - c)
        };

        degree.clamp(0., 1.)
    }

    /// Interval where membership is non-zero, including the end points
    pub fn support(&self) -> (f64, f64) {
        let (a, _, _, d) = self.corners();

        (a, d)
    }

    /// Interval where membership is exactly one
    pub fn core(&self) -> (f64, f64) {
        let (_, b, c, _) = self.corners();

        (b, c)
    }

    /// Every breakpoint of the function, in order.
    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            Self::Triangular(a, b, c) => vec![a, b, c],
            Self::Trapezoidal(a, b, c, d) => vec![a, b, c, d],
        }
    }

    /// Checks the parameters are finite and ordered. On failure returns a
    /// description of what is wrong.
    pub fn validate(&self) -> Result<(), String> {
        let points = self.breakpoints();

        if points.iter().any(|p| !p.is_finite()) {
            return Err(format!("parameters {points:?} must be finite"));
        }
        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err(format!("parameters {points:?} must be in non-decreasing order"));
        }

        Ok(())
    }

    fn corners(&self) -> (f64, f64, f64, f64) {
        match *self {
            Self::Triangular(a, b, c) => (a, b, b, c),
            Self::Trapezoidal(a, b, c, d) => (a, b, c, d),
        }
    }
}

#[test]
fn test_triangular_membership() {
    let mf = MembershipFunction::Triangular(0.0, 5.0, 10.0);

    assert_eq!(mf.evaluate(0.0), 0.0);
    assert_eq!(mf.evaluate(5.0), 1.0);
    assert_eq!(mf.evaluate(10.0), 0.0);
    assert_eq!(mf.evaluate(2.5), 0.5);
    assert_eq!(mf.evaluate(7.5), 0.5);
    assert_eq!(mf.evaluate(-3.0), 0.0);
    assert_eq!(mf.evaluate(11.0), 0.0);
}

#[test]
fn test_trapezoidal_membership() {
    let mf = MembershipFunction::Trapezoidal(1.5, 3.0, 5.0, 8.0);

    assert_eq!(mf.evaluate(1.5), 0.0);
    assert_eq!(mf.evaluate(2.25), 0.5);
    assert_eq!(mf.evaluate(3.0), 1.0);
    assert_eq!(mf.evaluate(4.0), 1.0);
    assert_eq!(mf.evaluate(5.0), 1.0);
    assert_eq!(mf.evaluate(6.5), 0.5);
    assert_eq!(mf.evaluate(8.0), 0.0);
}

#[test]
fn test_shoulders_are_steps() {
    let left = MembershipFunction::Trapezoidal(0., 0., 1., 2.);
    let right = MembershipFunction::Triangular(6.5, 10., 10.);

    assert_eq!(left.evaluate(0.), 1.);
    assert_eq!(left.evaluate(1.5), 0.5);
    assert_eq!(right.evaluate(10.), 1.);
    assert_eq!(right.evaluate(10.5), 0.);
}

#[test]
fn test_degenerate_membership() {
    let spike = MembershipFunction::Triangular(2., 2., 2.);
    let flat = MembershipFunction::Trapezoidal(4., 4., 4., 4.);

    assert_eq!(spike.evaluate(2.), 1.);
    assert_eq!(spike.evaluate(2.1), 0.);
    assert_eq!(flat.evaluate(4.), 1.);
    assert_eq!(flat.evaluate(3.9), 0.);
    assert_eq!(flat.evaluate(f64::NAN), 0.);
}

#[test]
fn test_support_and_core() {
    let trapezoid = MembershipFunction::Trapezoidal(1., 2., 3., 4.);
    let triangle = MembershipFunction::Triangular(0., 5., 10.);
    let shoulder = MembershipFunction::Trapezoidal(0., 0., 1., 2.);

    assert_eq!(trapezoid.support(), (1., 4.));
    assert_eq!(trapezoid.core(), (2., 3.));
    assert_eq!(triangle.support(), (0., 10.));
    assert_eq!(triangle.core(), (5., 5.));
    assert_eq!(shoulder.core(), (0., 1.));

    let (lo, hi) = trapezoid.core();

    assert_eq!(trapezoid.evaluate(lo), 1.);
    assert_eq!(trapezoid.evaluate(hi), 1.);
}

#[test]
fn test_validate() {
    assert!(MembershipFunction::Triangular(0., 1., 2.).validate().is_ok());
    assert!(MembershipFunction::Triangular(1., 0., 2.).validate().is_err());
    assert!(MembershipFunction::Trapezoidal(0., 1., f64::INFINITY, 2.).validate().is_err());
    assert!(MembershipFunction::Trapezoidal(3., 3., 3., 3.).validate().is_ok());
}
