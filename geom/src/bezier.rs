//! The degree-generic Bezier kernel (§4.1): evaluation, blossoming,
//! derivative, degree elevation/lowering, product, subdivision and cutting.
//!
//! Rust stable has no `generic_const_exprs`, so a literal `[T; N+1]` sized by
//! a const-generic degree isn't expressible for code that needs to go from a
//! degree-N curve to a degree-(N-1) or degree-(N+1) one. Control points are
//! instead held in a capacity-4 `ArrayVec` (enough for up to cubic, per this
//! crate's `MAX_DEGREE`), the same bounded-capacity style the teacher crate
//! already uses for its intersection-count results.

use arrayvec::ArrayVec;

use crate::point::{HPoint, Point, Vector};

/// Upper bound on control points a [`Bezier`] can hold (cubic + 1).
pub const CAP: usize = crate::MAX_DEGREE + 1;

/// A value type control points can be combined over: vector-space addition
/// and scalar multiplication, which is all Bernstein-basis evaluation needs.
pub trait Blend: Copy {
    fn zero() -> Self;
    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn scale(self, k: f64) -> Self;

    /// Affine combination `u*self + t*other` without assuming `u + t == 1`
    /// (the two-argument generalization §4.1 asks `evaluate_horner` and
    /// `blossom` to support, for cancellation-free evaluation near t=0/1).
    fn combine(self, other: Self, u: f64, t: f64) -> Self {
        self.scale(u).add(other.scale(t))
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        self.combine(other, 1.0 - t, t)
    }
}

impl Blend for f64 {
    fn zero() -> Self {
        0.0
    }
    fn add(self, other: Self) -> Self {
        self + other
    }
    fn sub(self, other: Self) -> Self {
        self - other
    }
    fn scale(self, k: f64) -> Self {
        self * k
    }
}

impl Blend for Point {
    fn zero() -> Self {
        crate::point::point(0.0, 0.0)
    }
    fn add(self, other: Self) -> Self {
        crate::point::point(self.x + other.x, self.y + other.y)
    }
    fn sub(self, other: Self) -> Self {
        crate::point::point(self.x - other.x, self.y - other.y)
    }
    fn scale(self, k: f64) -> Self {
        crate::point::point(self.x * k, self.y * k)
    }
}

impl Blend for Vector {
    fn zero() -> Self {
        crate::point::vector(0.0, 0.0)
    }
    fn add(self, other: Self) -> Self {
        crate::point::vector(self.x + other.x, self.y + other.y)
    }
    fn sub(self, other: Self) -> Self {
        crate::point::vector(self.x - other.x, self.y - other.y)
    }
    fn scale(self, k: f64) -> Self {
        crate::point::vector(self.x * k, self.y * k)
    }
}

impl Blend for HPoint {
    fn zero() -> Self {
        HPoint::new(0.0, 0.0, 0.0)
    }
    fn add(self, other: Self) -> Self {
        HPoint::new(self.x + other.x, self.y + other.y, self.w + other.w)
    }
    fn sub(self, other: Self) -> Self {
        HPoint::new(self.x - other.x, self.y - other.y, self.w - other.w)
    }
    fn scale(self, k: f64) -> Self {
        HPoint::new(self.x * k, self.y * k, self.w * k)
    }
}

/// A Bezier curve of degree `points.len() - 1`, at most cubic.
#[derive(Clone, Debug, PartialEq)]
pub struct Bezier<T: Blend> {
    pub points: ArrayVec<T, CAP>,
}

impl<T: Blend> Bezier<T> {
    pub fn new(points: ArrayVec<T, CAP>) -> Self {
        debug_assert!(!points.is_empty() && points.len() <= CAP);
        Bezier { points }
    }

    pub fn line(p0: T, p1: T) -> Self {
        let mut points = ArrayVec::new();
        points.push(p0);
        points.push(p1);
        Bezier::new(points)
    }

    pub fn quadratic(p0: T, p1: T, p2: T) -> Self {
        let mut points = ArrayVec::new();
        points.push(p0);
        points.push(p1);
        points.push(p2);
        Bezier::new(points)
    }

    pub fn cubic(p0: T, p1: T, p2: T, p3: T) -> Self {
        let mut points = ArrayVec::new();
        points.push(p0);
        points.push(p1);
        points.push(p2);
        points.push(p3);
        Bezier::new(points)
    }

    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    /// De Casteljau evaluation: repeated linear interpolation, one level of
    /// the triangle per step.
    pub fn evaluate_decasteljau(&self, t: f64) -> T {
        let mut tmp = self.points.clone();
        let n = tmp.len();
        for k in 1..n {
            for i in 0..(n - k) {
                tmp[i] = tmp[i].lerp(tmp[i + 1], t);
            }
        }
        tmp[0]
    }

    /// Horner evaluation in the Bernstein basis: `O(N)` by maintaining the
    /// binomial coefficient and the power of `t` incrementally instead of
    /// recomputing them. The two-argument form (`u` supplied explicitly
    /// rather than derived as `1 - t`) avoids cancellation when `t` is close
    /// to `1`.
    pub fn evaluate_horner_tu(&self, t: f64, u: f64) -> T {
        let n = self.degree();
        let mut binom = 1.0_f64;
        let mut t_pow = 1.0_f64;
        let mut u_pow = u.powi(n as i32);
        let mut result = self.points[0].scale(u_pow);
        for k in 1..=n {
            binom = binom * (n - k + 1) as f64 / k as f64;
            t_pow *= t;
            u_pow = if u.abs() > f64::EPSILON { u_pow / u } else { u.powi((n - k) as i32) };
            result = result.add(self.points[k].scale(binom * t_pow * u_pow));
        }
        result
    }

    pub fn evaluate_horner(&self, t: f64) -> T {
        self.evaluate_horner_tu(t, 1.0 - t)
    }

    /// One De Casteljau step, producing a degree-(N-1) curve. Unlike
    /// [`Bezier::lerp`]-style interpolation this does not assume `u + t ==
    /// 1`: `blossom` is the building block `cut` composes to reach
    /// arbitrary multi-affine blossom values.
    pub fn blossom(&self, t: f64, u: f64) -> Bezier<T> {
        let n = self.points.len();
        debug_assert!(n > 1, "blossom requires degree >= 1");
        let mut out = ArrayVec::new();
        for i in 0..(n - 1) {
            out.push(self.points[i].combine(self.points[i + 1], u, t));
        }
        Bezier::new(out)
    }

    /// The degree-(N-1) derivative: control points `N*(B[i+1]-B[i])`.
    pub fn derivative(&self) -> Bezier<T> {
        let n = self.degree() as f64;
        let diffs = self.differences();
        let mut out = ArrayVec::new();
        for p in diffs.points {
            out.push(p.scale(n));
        }
        Bezier::new(out)
    }

    /// Like [`Bezier::derivative`] but without the degree factor `N`.
    pub fn differences(&self) -> Bezier<T> {
        let n = self.points.len();
        debug_assert!(n > 1);
        let mut out = ArrayVec::new();
        for i in 0..(n - 1) {
            out.push(self.points[i + 1].sub(self.points[i]));
        }
        Bezier::new(out)
    }

    /// Splits into two degree-N halves over `[0,t]` and `[t,1]`; the shared
    /// midpoint (`evaluate(t)`) appears as the last point of the first half
    /// and the first point of the second.
    pub fn split(&self, t: f64) -> (Bezier<T>, Bezier<T>) {
        let n = self.points.len();
        // Build the full De Casteljau triangle so both the left edge (left
        // half's control points) and the right edge (right half's, in
        // reverse) can be read off.
        let mut triangle: ArrayVec<ArrayVec<T, CAP>, CAP> = ArrayVec::new();
        triangle.push(self.points.clone());
        for k in 1..n {
            let prev = &triangle[k - 1];
            let mut level = ArrayVec::new();
            for i in 0..(n - k) {
                level.push(prev[i].lerp(prev[i + 1], t));
            }
            triangle.push(level);
        }
        let mut left = ArrayVec::new();
        let mut right = ArrayVec::new();
        for level in &triangle {
            left.push(level[0]);
        }
        for level in triangle.iter().rev() {
            right.push(level[level.len() - 1]);
        }
        (Bezier::new(left), Bezier::new(right))
    }

    /// Restriction of this curve to `[a,b]`: `evaluate(cut(B,a,b), t) ==
    /// evaluate(B, a + (b-a)*t)`.
    pub fn cut(&self, a: f64, b: f64) -> Bezier<T> {
        if a == 0.0 && b == 1.0 {
            return self.clone();
        }
        let after_a = self.split(a).1;
        let span = 1.0 - a;
        if span.abs() < f64::EPSILON {
            return after_a;
        }
        let t2 = (b - a) / span;
        after_a.split(t2).0
    }

    pub fn prefix(&self, t: f64) -> Bezier<T> {
        self.split(t).0
    }

    pub fn suffix(&self, t: f64) -> Bezier<T> {
        self.split(t).1
    }

    /// Degree elevation: the unique degree-(N+1) curve representing the
    /// same polynomial.
    pub fn elevate_degree(&self) -> Bezier<T> {
        let n = self.degree();
        let m = n + 1;
        let mut out: ArrayVec<T, CAP> = ArrayVec::new();
        for i in 0..=m {
            let a = if i == 0 { T::zero() } else { self.points[i - 1].scale(i as f64 / m as f64) };
            let b = if i == m { T::zero() } else { self.points[i].scale(1.0 - i as f64 / m as f64) };
            out.push(a.add(b));
        }
        Bezier::new(out)
    }

    /// Degree lowering via the recurrence `R[i] = (N*B[i] - i*R[i-1]) /
    /// (N-i)`. Only meaningful when the caller has established (typically
    /// after an algebraic reduction) that `self` is truly representable at
    /// one degree lower; no check is performed here.
    pub fn lower_degree(&self) -> Bezier<T> {
        let n = self.degree(); // degree of self, i.e. the elevated curve
        debug_assert!(n >= 1, "lower_degree requires degree >= 1");
        let nf = n as f64;
        let mut r: ArrayVec<T, CAP> = ArrayVec::new();
        r.push(self.points[0]);
        for i in 1..n {
            let term = self.points[i].scale(nf).sub(r[i - 1].scale(i as f64));
            r.push(term.scale(1.0 / (nf - i as f64)));
        }
        Bezier::new(r)
    }
}

fn binom(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0_f64;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

/// Bernstein-form polynomial product: the degree-(M+N) curve representing
/// the product of two scalar polynomials given in Bernstein form of degree
/// M and N respectively.
pub fn product(p: &Bezier<f64>, q: &Bezier<f64>) -> Bezier<f64> {
    let m = p.degree();
    let n = q.degree();
    let mn = m + n;
    let c_mn = |k: usize| binom(mn, k);
    let mut out: ArrayVec<f64, CAP> = ArrayVec::new();
    // mn can exceed CAP-1 when both inputs are already cubic; callers of
    // `product` in this pipeline only ever multiply curves whose degrees sum
    // to at most MAX_DEGREE (derivatives/cross-products of up-to-cubic
    // curves), so this stays within capacity in practice.
    for k in 0..=mn {
        let lo = k.saturating_sub(n);
        let hi = k.min(m);
        let mut acc = 0.0_f64;
        for i in lo..=hi {
            acc += p.points[i] * q.points[k - i] * binom(m, i) * binom(n, k - i);
        }
        out.push(acc / c_mn(k));
    }
    Bezier::new(out)
}

/// `dot(P, Q)`: product of two vector-valued curves, summed component-wise,
/// yielding the scalar curve `t -> P(t) . Q(t)`.
pub fn dot(p: &Bezier<Vector>, q: &Bezier<Vector>) -> Bezier<f64> {
    let px = scalar_component(p, |v| v.x);
    let py = scalar_component(p, |v| v.y);
    let qx = scalar_component(q, |v| v.x);
    let qy = scalar_component(q, |v| v.y);
    let prod_x = product(&px, &qx);
    let prod_y = product(&py, &qy);
    let mut out: ArrayVec<f64, CAP> = ArrayVec::new();
    for i in 0..prod_x.points.len() {
        out.push(prod_x.points[i] + prod_y.points[i]);
    }
    Bezier::new(out)
}

fn scalar_component(b: &Bezier<Vector>, f: impl Fn(Vector) -> f64) -> Bezier<f64> {
    let mut out: ArrayVec<f64, CAP> = ArrayVec::new();
    for p in &b.points {
        out.push(f(*p));
    }
    Bezier::new(out)
}

/// Canonicalizes a rational quadratic (degree-2 `HPoint` curve) so both
/// endpoints carry `w == 1`, splitting at `t = 0.5` when `w0 != w2` per the
/// source's `canonize-rational-quadratic-bezier` routine. Requires `w0*w2 >
/// 0` (§7.4's semantic-impossibility check); callers must reject the
/// segment before calling this when that fails.
pub fn canonicalize_rational_quadratic(b: &Bezier<HPoint>) -> ArrayVec<Bezier<HPoint>, 2> {
    debug_assert_eq!(b.degree(), 2);
    let w0 = b.points[0].w;
    let w2 = b.points[2].w;
    assert!(w0 * w2 > 0.0, "rational quadratic endpoints must have same weight sign");

    let mut out = ArrayVec::new();
    if crate::numeric::is_almost_equal(w0, w2, crate::numeric::DEFAULT_ULP) {
        out.push(rescale_rational_quadratic(b, w0));
        return out;
    }
    let (left, right) = b.split(0.5);
    out.push(rescale_rational_quadratic(&left, left.points[0].w));
    out.push(rescale_rational_quadratic(&right, right.points[0].w));
    out
}

fn rescale_rational_quadratic(b: &Bezier<HPoint>, w0: f64) -> Bezier<HPoint> {
    let p0 = b.points[0].rescale(1.0 / w0);
    let w2 = b.points[2].w;
    let p2 = b.points[2].rescale(1.0 / w2);
    Bezier::quadratic(p0, b.points[1], p2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::point;
    use approx::assert_abs_diff_eq;

    fn sample_cubic() -> Bezier<Point> {
        Bezier::cubic(point(0.0, 0.0), point(1.0, 2.0), point(3.0, 2.0), point(4.0, 0.0))
    }

    #[test]
    fn horner_matches_decasteljau() {
        let b = sample_cubic();
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let a = b.evaluate_horner(t);
            let d = b.evaluate_decasteljau(t);
            assert_abs_diff_eq!(a.x, d.x, epsilon = 1e-9);
            assert_abs_diff_eq!(a.y, d.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn cut_then_evaluate_matches_reparameterized_original() {
        let b = sample_cubic();
        let (a, bnd) = (0.2, 0.7);
        let c = b.cut(a, bnd);
        for i in 0..=5 {
            let t = i as f64 / 5.0;
            let lhs = c.evaluate_decasteljau(t);
            let rhs = b.evaluate_decasteljau(a + (bnd - a) * t);
            assert_abs_diff_eq!(lhs.x, rhs.x, epsilon = 1e-9);
            assert_abs_diff_eq!(lhs.y, rhs.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn cut_full_range_is_identity() {
        let b = sample_cubic();
        let c = b.cut(0.0, 1.0);
        assert_eq!(c.points, b.points);
    }

    #[test]
    fn split_halves_reparameterize_exactly() {
        let b = sample_cubic();
        let (left, right) = b.split(0.35);
        for i in 0..=4 {
            let t = i as f64 / 4.0;
            let l = left.evaluate_decasteljau(t);
            let r = b.evaluate_decasteljau(0.35 * t);
            assert_abs_diff_eq!(l.x, r.x, epsilon = 1e-9);
            assert_abs_diff_eq!(l.y, r.y, epsilon = 1e-9);
        }
        for i in 0..=4 {
            let t = i as f64 / 4.0;
            let l = right.evaluate_decasteljau(t);
            let r = b.evaluate_decasteljau(0.35 + 0.65 * t);
            assert_abs_diff_eq!(l.x, r.x, epsilon = 1e-9);
            assert_abs_diff_eq!(l.y, r.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn lower_degree_undoes_elevate_degree() {
        let b = Bezier::quadratic(point(0.0, 0.0), point(1.0, 2.0), point(2.0, 0.0));
        let elevated = b.elevate_degree();
        let lowered = elevated.lower_degree();
        for (a, c) in lowered.points.iter().zip(b.points.iter()) {
            assert_abs_diff_eq!(a.x, c.x, epsilon = 1e-9);
            assert_abs_diff_eq!(a.y, c.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn product_distributes_over_elevate_degree() {
        let p = Bezier::line(1.0, 2.0);
        let q = Bezier::line(3.0, 1.0);
        let lhs = product(&p.elevate_degree(), &q);
        let rhs = product(&p, &q).elevate_degree();
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert_abs_diff_eq!(lhs.evaluate_decasteljau(t), rhs.evaluate_decasteljau(t), epsilon = 1e-7);
        }
    }

    #[test]
    fn canonicalize_is_noop_on_already_canonical_curve() {
        let b = Bezier::quadratic(HPoint::new(0.0, 0.0, 1.0), HPoint::new(1.0, 2.0, 0.7), HPoint::new(2.0, 0.0, 1.0));
        let out = canonicalize_rational_quadratic(&b);
        assert_eq!(out.len(), 1);
        for (a, c) in out[0].points.iter().zip(b.points.iter()) {
            assert_abs_diff_eq!(a.x, c.x, epsilon = 1e-9);
            assert_abs_diff_eq!(a.y, c.y, epsilon = 1e-9);
            assert_abs_diff_eq!(a.w, c.w, epsilon = 1e-9);
        }
    }
}
