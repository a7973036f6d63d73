//! Cubic (and quadratic) Bezier approximation of a sampled curve (§4.8):
//! Hoschek-style least-squares fitting with parameter refitting, recursive
//! subdivision on residual error, grounded on the source's
//! `cubic-bezier-approximation.h`.

use arrayvec::ArrayVec;

use vecstroke_geom::bezier::Bezier;
use vecstroke_geom::numeric::linear_solve;
use vecstroke_geom::point::{dot, Point, Vector};

/// Number of interior samples used to fit each cubic segment. The source
/// uses a small fixed sample count; `N + 1` total samples including both
/// endpoints.
pub const SAMPLE_COUNT: usize = 8;

/// Iteration cap for the alternating solve/refit loop (§4.8 step 2),
/// matching the source's `RVG_CUBIC_BEZIER_APPROXIMATION_MAX_ITER`.
pub const MAX_ITER: u32 = 10;

/// Maximum recursive subdivision depth (§4.8 step 3).
pub const MAX_SUBDIVISION_DEPTH: u32 = 5;

/// Inner Newton refit steps per sample (§4.8 step 2b).
const NEWTON_STEPS: u32 = 5;

/// A curve the approximator can sample: position and tangent direction at
/// any parameter in `[ta, tb]`.
pub trait Sampler {
    fn sample(&self, t: f64) -> Point;
    fn tangent_direction(&self, t: f64) -> Vector;
}

/// Approximates `sampler` on `[ta, tb]` by one or more cubic Beziers,
/// concatenated end to end, each within `tol` of the sampled curve.
pub fn approximate_cubic(sampler: &impl Sampler, ta: f64, tb: f64, tol: f64) -> ArrayVec<Bezier<Point>, 32> {
    let mut out = ArrayVec::new();
    approximate_cubic_recursive(sampler, ta, tb, tol, MAX_SUBDIVISION_DEPTH, &mut out);
    out
}

fn approximate_cubic_recursive(sampler: &impl Sampler, ta: f64, tb: f64, tol: f64, depth: u32, out: &mut ArrayVec<Bezier<Point>, 32>) {
    let (fit, err) = fit_one_cubic(sampler, ta, tb);
    if depth == 0 && err > tol * tol {
        #[cfg(feature = "tracing")]
        tracing::debug!(ta, tb, err, tol, "subdivision depth exhausted above tolerance (§7.3)");
    }
    if err <= tol * tol || depth == 0 {
        if out.try_push(fit).is_err() {
            // Approximation budget exhausted (§7.3): keep the best
            // approximation produced so far rather than growing further.
            #[cfg(feature = "tracing")]
            tracing::warn!(ta, tb, "piece budget (32) exhausted, dropping remaining subdivision");
        }
        return;
    }
    let tm = 0.5 * (ta + tb);
    approximate_cubic_recursive(sampler, ta, tm, tol, depth - 1, out);
    approximate_cubic_recursive(sampler, tm, tb, tol, depth - 1, out);
}

/// Fits a single cubic Bezier over `[ta, tb]`, returning it with the
/// achieved sum-of-squared-errors.
fn fit_one_cubic(sampler: &impl Sampler, ta: f64, tb: f64) -> (Bezier<Point>, f64) {
    let q0 = sampler.sample(ta);
    let q3 = sampler.sample(tb);
    let d0 = normalized(sampler.tangent_direction(ta));
    let d3 = normalized(sampler.tangent_direction(tb));

    let n = SAMPLE_COUNT;
    let mut us: ArrayVec<f64, { SAMPLE_COUNT + 1 }> = (0..=n).map(|i| i as f64 / n as f64).collect();
    let samples: ArrayVec<Point, { SAMPLE_COUNT + 1 }> = us.iter().map(|&u| sampler.sample(ta + (tb - ta) * u)).collect();

    let delta = sub(q3, q0);
    let mut q1 = add(q0, scale(delta, 1.0 / 3.0));
    let mut q2 = add(q0, scale(delta, 2.0 / 3.0));

    let mut prev_error = f64::INFINITY;
    for _ in 0..MAX_ITER {
        let curve = Bezier::cubic(q0, q1, q2, q3);

        // (a) solve for alpha, beta minimizing sum |c(t_i) - q(t_i)|^2 with
        // q1 = q0 + alpha*d0, q2 = q3 + beta*d3.
        let (alpha, beta, solved) = solve_alpha_beta(&curve, &samples, &us, q0, q3, d0, d3);
        if solved {
            q1 = add(q0, scale(d0, alpha));
            q2 = add(q3, scale(d3, beta));
        }
        let curve = Bezier::cubic(q0, q1, q2, q3);

        // (b) refit interior sample parameters by one constrained Newton
        // step along q'(t).
        for i in 1..n {
            us[i] = newton_refit(&curve, samples[i], us[i]);
        }

        // (c) compute error, apply stopping conditions.
        let error = sum_squared_error(&curve, &samples, &us);
        if error < 1e-20 || (prev_error - error).abs() < 1e-14 * prev_error.max(1.0) {
            return (curve, error);
        }
        if error > prev_error {
            return (curve, prev_error);
        }
        prev_error = error;
    }
    (Bezier::cubic(q0, q1, q2, q3), prev_error)
}

fn solve_alpha_beta(
    curve: &Bezier<Point>,
    samples: &[Point],
    us: &[f64],
    q0: Point,
    q3: Point,
    d0: Vector,
    d3: Vector,
) -> (f64, f64, bool) {
    // Minimize sum_i |B3(t_i; q0, q0+a d0, q3+b d3, q3) - c_i|^2 over a, b.
    // B3(t) = (1-t)^3 q0 + 3(1-t)^2 t (q0 + a d0) + 3(1-t) t^2 (q3 + b d3) + t^3 q3
    //       = base(t) + 3(1-t)^2 t * a * d0 + 3(1-t) t^2 * b * d3
    // with base(t) the cubic through q0,q0,q3,q3 weighted by the Bernstein terms.
    let _ = curve;
    let mut a00 = 0.0;
    let mut a01 = 0.0;
    let mut a11 = 0.0;
    let mut b0 = 0.0;
    let mut b1 = 0.0;
    for (i, &t) in us.iter().enumerate() {
        let u = 1.0 - t;
        let c0 = u * u * u;
        let c1 = 3.0 * u * u * t;
        let c2 = 3.0 * u * t * t;
        let c3 = t * t * t;
        let base = affine_combine(q0, c0 + c1, q3, c2 + c3);
        let residual = sub(samples[i], base);
        let w1 = c1;
        let w2 = c2;
        a00 += w1 * w1 * dot(d0, d0);
        a01 += w1 * w2 * dot(d0, d3);
        a11 += w2 * w2 * dot(d3, d3);
        b0 += w1 * dot(d0, residual);
        b1 += w2 * dot(d3, residual);
    }
    match linear_solve(a00, a01, a01, a11, b0, b1) {
        Some((alpha, beta)) => (alpha, beta, true),
        None => (0.0, 0.0, false),
    }
}

fn newton_refit(curve: &Bezier<Point>, target: Point, mut t: f64) -> f64 {
    // `curve.derivative()` yields its points typed as `Point` (the kernel's
    // `Blend` impl doesn't distinguish affine points from free vectors), so
    // the dot products here are taken directly on coordinates rather than
    // through `vecstroke_geom::point::dot`, which is typed for `Vector`.
    let deriv = curve.derivative();
    for _ in 0..NEWTON_STEPS {
        let p = curve.evaluate_decasteljau(t);
        let d = deriv.evaluate_decasteljau(t);
        let speed2 = d.x * d.x + d.y * d.y;
        if speed2 < f64::MIN_POSITIVE {
            break;
        }
        let residual = sub(p, target);
        let step = (residual.x * d.x + residual.y * d.y) / speed2;
        let next = t - step;
        if !(0.0..=1.0).contains(&next) {
            break;
        }
        t = next;
    }
    t.clamp(0.0, 1.0)
}

fn sum_squared_error(curve: &Bezier<Point>, samples: &[Point], us: &[f64]) -> f64 {
    let mut err = 0.0;
    for (i, &t) in us.iter().enumerate() {
        let p = curve.evaluate_decasteljau(t);
        let d = sub(p, samples[i]);
        err += dot(d, d);
    }
    err
}

/// Quadratic variant (§4.8 "Quadratic variant"): the middle control point is
/// the intersection of the two tangent lines at `ta`/`tb`. Falls back to a
/// straight line when the tangents are anti-parallel or the intersection
/// lies outside the chord.
pub fn approximate_quadratic(sampler: &impl Sampler, ta: f64, tb: f64) -> Bezier<Point> {
    let p0 = sampler.sample(ta);
    let p1 = sampler.sample(tb);
    let d0 = normalized(sampler.tangent_direction(ta));
    let d1 = normalized(sampler.tangent_direction(tb));

    let cross = d0.x * d1.y - d0.y * d1.x;
    if cross.abs() < 1e-9 {
        return Bezier::line(p0, p1);
    }
    // Solve p0 + s*d0 == p1 + r*d1 for s.
    let rhs = sub(p1, p0);
    let s = (rhs.x * d1.y - rhs.y * d1.x) / cross;
    let ctrl = add(p0, scale(d0, s));

    let chord = sub(p1, p0);
    let to_ctrl = sub(ctrl, p0);
    let proj = if dot(chord, chord) > f64::MIN_POSITIVE { dot(to_ctrl, chord) / dot(chord, chord) } else { 0.0 };
    if !(0.0..=1.0).contains(&proj) {
        return Bezier::line(p0, p1);
    }
    Bezier::quadratic(p0, ctrl, p1)
}

fn normalized(v: Vector) -> Vector {
    let len2 = dot(v, v);
    if len2 < f64::MIN_POSITIVE {
        return v;
    }
    scale(v, 1.0 / len2.sqrt())
}

fn add(p: Point, v: Vector) -> Point {
    vecstroke_geom::point::point(p.x + v.x, p.y + v.y)
}

fn affine_combine(p: Point, wp: f64, q: Point, wq: f64) -> Point {
    vecstroke_geom::point::point(p.x * wp + q.x * wq, p.y * wp + q.y * wq)
}

fn sub(a: Point, b: Point) -> Vector {
    vecstroke_geom::point::vector(a.x - b.x, a.y - b.y)
}

fn scale(v: Vector, k: f64) -> Vector {
    vecstroke_geom::point::vector(v.x * k, v.y * k)
}
