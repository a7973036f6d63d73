//! `input-path-f-to-regular-path` (§4.3): partitions each incoming segment
//! into regular pieces, cusps and degenerate stretches, driven by the
//! merged, sorted parameters from `find_parameters`.
//!
//! The source builds an explicit "precision polynomial" in Bernstein form
//! and root-finds its sign changes. Past degree 3 that polynomial no longer
//! fits this crate's `Bezier` capacity (the same obstacle `find_parameters`
//! works around), so regularity here is decided by sampling speed and
//! bounded curvature at three interior points of each candidate subinterval
//! (majority vote) against `options.delta`-derived thresholds instead of
//! root-finding the polynomial itself. The merged parameter list still
//! supplies the exact subinterval boundaries (inflections, double points,
//! offset/evolute cusps, monotonicity breaks), so the only approximation is
//! in classifying each resulting piece, not in where the pieces are cut.

use alloc::vec::Vec;

use vecstroke_geom::curvature::{bounded_radius_of_curvature, radius_of_curvature};
use vecstroke_geom::numeric::is_almost_zero;
use vecstroke_geom::point::{as_vector, HPoint, Point, Vector};
use vecstroke_path::events::{InputPath, RegularPath, SegmentPiece};
use vecstroke_path::style::StrokeOptions;

use crate::curve::{to_piece, Segment};
use crate::find_parameters::{cubic_parameters, monotonic_parameters, offsetting_parameters};

/// Radius clamp passed to `bounded_radius_of_curvature` when classifying
/// regularity; large enough that only genuinely tight curvature trips the
/// radius check, never a precision artifact near an inflection.
const MAX_RADIUS_CLAMP: f64 = 1e6;

/// Minimum squared speed (relative to `delta`) a sample point must have to
/// be considered regular, rather than a degenerate/cusp stretch.
fn min_speed2(delta: f64) -> f64 {
    delta.max(1e-20) * 1e6
}

/// Minimum radius of curvature (relative to `delta`) a sample point must
/// have to be considered regular. Tied to the same `delta`-derived scale as
/// `min_speed2` so both thresholds tighten and loosen together.
fn min_radius(delta: f64) -> f64 {
    1.0 / min_speed2(delta).sqrt()
}

/// A piece is regular at `t` when its speed is bounded away from zero and
/// its radius of curvature is bounded away from zero (§4.3). An infinite
/// radius (a straight run or an inflection point) never fails the second
/// check.
fn is_regular(seg: &Segment, t: f64, delta: f64) -> bool {
    let d = seg.derivative(t);
    let speed2 = d.x * d.x + d.y * d.y;
    if speed2 < min_speed2(delta) {
        return false;
    }
    let radius = radius_of_curvature(seg.sample(t), d, seg.second_derivative(t));
    if radius.value().is_none() {
        return true;
    }
    let r = bounded_radius_of_curvature(&radius, MAX_RADIUS_CLAMP);
    !is_almost_zero(r) && r.abs() > min_radius(delta)
}

pub struct Regularizer<S: RegularPath> {
    sink: S,
    opts: StrokeOptions,
    contour: Vec<Segment>,
    tol: f64,
}

impl<S: RegularPath> Regularizer<S> {
    pub fn new(sink: S, opts: StrokeOptions) -> Self {
        let tol = opts.ftol.min(1e-6).max(1e-12);
        Regularizer { sink, opts, contour: Vec::new(), tol }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn flush_contour(&mut self, closed: bool) {
        if self.contour.is_empty() {
            return;
        }
        let segments = core::mem::take(&mut self.contour);
        let first = &segments[0];
        let d0 = first.start_tangent();
        let p0 = first.from();
        self.sink.begin_regular_contour(p0, d0);

        for seg in &segments {
            self.emit_segment(seg);
        }

        let last = segments.last().unwrap();
        let d1 = last.end_tangent();
        let p1 = last.to();
        if closed {
            self.sink.end_regular_closed_contour(d1, p1);
        } else {
            self.sink.end_regular_open_contour(d1, p1);
        }
    }

    fn emit_segment(&mut self, seg: &Segment) {
        let offset = self.opts.offset();
        let mut cuts: Vec<f64> = Vec::new();
        match seg {
            Segment::Linear(b) | Segment::Quadratic(b) | Segment::Cubic(b) => {
                // Parameter finders are no-ops below their minimum degree
                // (e.g. `cubic_parameters` on a line), so a single match arm
                // covers all three integral segment kinds.
                for t in monotonic_parameters(b, self.tol) {
                    cuts.push(t);
                }
                for t in cubic_parameters(b, self.tol) {
                    cuts.push(t);
                }
                let (evolute, offset_cusps) = offsetting_parameters(b, offset, self.tol);
                cuts.extend(evolute);
                cuts.extend(offset_cusps);
            }
            Segment::RationalQuadratic(_) => {
                // Rational-quadratic monotonicity/inflection search isn't
                // implemented; offsetting cusps still matter most for
                // thickening and are skipped here too, so a rational
                // segment is always treated as a single candidate piece.
            }
        }
        cuts.retain(|t| *t > self.tol && *t < 1.0 - self.tol);
        cuts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        cuts.dedup_by(|a, b| (*a - *b).abs() < self.tol);

        let mut bounds = Vec::with_capacity(cuts.len() + 2);
        bounds.push(0.0);
        bounds.extend(cuts);
        bounds.push(1.0);

        for w in bounds.windows(2) {
            self.emit_piece(seg, w[0], w[1]);
        }
    }

    fn emit_piece(&mut self, seg: &Segment, t_lo: f64, t_hi: f64) {
        if t_hi - t_lo < self.tol {
            return;
        }
        let mid = 0.5 * (t_lo + t_hi);
        let span = t_hi - t_lo;
        let votes = [t_lo + 0.25 * span, mid, t_lo + 0.75 * span]
            .iter()
            .filter(|&&t| is_regular(seg, t, self.opts.delta))
            .count();
        if votes >= 2 {
            self.emit_regular_piece(seg, t_lo, t_hi);
            return;
        }

        // Irregular: decide cusp (zero-width turning point) vs degenerate
        // stretch (positive-width near-stationary run) by how narrow the
        // slow subinterval is.
        let p_lo = seg.sample(t_lo);
        let p_hi = seg.sample(t_hi);
        if t_hi - t_lo < 1e3 * self.tol {
            let p = seg.sample(mid);
            let d0 = tangent_into(seg, t_lo);
            let d1 = tangent_into(seg, t_hi);
            let turn = cross(d0, d1);
            if turn < 0.0 {
                self.sink.inner_cusp(d0, p, d1, 1.0);
            } else {
                self.sink.cusp(d0, p, d1, 1.0);
            }
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(t_lo, t_hi, "near-stationary stretch downgraded to a degenerate segment (§7.2)");
            let d = as_vector(vecstroke_geom::point::point(p_hi.x - p_lo.x, p_hi.y - p_lo.y));
            self.sink.degenerate_segment(p_lo, d, p_hi);
        }
    }

    fn emit_regular_piece(&mut self, seg: &Segment, t_lo: f64, t_hi: f64) {
        let sub = seg.cut(t_lo, t_hi);
        let d0 = sub.start_tangent();
        let d1 = sub.end_tangent();
        let p0 = sub.from();
        let p1 = sub.to();
        self.sink.begin_segment_piece(p0, d0);
        self.sink.segment_piece(to_piece(&sub, t_lo, t_hi));
        self.sink.end_segment_piece(d1, p1);
    }
}

fn tangent_into(seg: &Segment, t: f64) -> Vector {
    seg.derivative(t)
}

fn cross(a: Vector, b: Vector) -> f64 {
    a.x * b.y - a.y * b.x
}

impl<S: RegularPath> InputPath for Regularizer<S> {
    fn begin_contour(&mut self, p0: Point) {
        self.contour.clear();
        let _ = p0;
    }

    fn end_open_contour(&mut self, p0: Point) {
        let _ = p0;
        self.flush_contour(false);
    }

    fn end_closed_contour(&mut self, p0: Point) {
        let _ = p0;
        self.flush_contour(true);
    }

    fn linear_segment(&mut self, p0: Point, p1: Point) {
        self.contour.push(Segment::Linear(vecstroke_geom::bezier::Bezier::line(p0, p1)));
    }

    fn quadratic_segment(&mut self, p0: Point, p1: Point, p2: Point) {
        self.contour.push(Segment::Quadratic(vecstroke_geom::bezier::Bezier::quadratic(p0, p1, p2)));
    }

    fn rational_quadratic_segment(&mut self, p0: Point, p1: HPoint, p2: Point) {
        let b = vecstroke_geom::bezier::Bezier::quadratic(HPoint::from_point(p0), p1, HPoint::from_point(p2));
        self.contour.push(Segment::RationalQuadratic(b));
    }

    fn cubic_segment(&mut self, p0: Point, p1: Point, p2: Point, p3: Point) {
        self.contour.push(Segment::Cubic(vecstroke_geom::bezier::Bezier::cubic(p0, p1, p2, p3)));
    }
}
