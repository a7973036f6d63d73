//! `decorated-path-f-thicken` (§4.7): turns each decorated, join-simplified
//! regular-path event into the actual fill geometry of the stroke outline —
//! the offset curve on either side of the centerline, plus the cap and join
//! shapes that connect them.
//!
//! The source runs this stage twice per contour: once forward, computing the
//! `+offset` curve and feeding it straight to the output sink, and once
//! backward, replaying the same contour's events in reverse to compute the
//! `-offset` curve. Both curves of one cap-delimited run are then stitched
//! into a single closed fill contour by a forward/backward combinator.
//!
//! Here both sides are computed in one streaming pass instead: the `+offset`
//! geometry is emitted to the sink as each event arrives, while the
//! `-offset` geometry for the same run is buffered (in traversal order) and
//! replayed — each primitive reversed, the whole buffer reversed — once the
//! run's closing cap is seen. A "run" is whatever a cap-family event pair
//! brackets (`decorate`'s `begin_regular_contour` always opens one with a
//! placeholder butt cap, even for a plain closed contour, so every run here
//! is cap-delimited; there is no separate closed-ring case to handle).
//!
//! Each curved piece is independently classified offset mode or evolute
//! mode per side (`side_prims`), per §4.7. The source draws evolute mode as
//! its own closed loop; since this stream's running position on entry to a
//! piece is the previous offset point rather than the base curve point,
//! `evolute_prims` inlines the same four legs (input endpoint to evolute
//! endpoint, evolute curve, evolute endpoint back to input endpoint) between
//! two connecting lines to the piece's own offset endpoints, so the
//! single-pass offset-point continuity this module relies on elsewhere still
//! holds.

use alloc::vec;
use alloc::vec::Vec;

use vecstroke_geom::bezier::Bezier;
use vecstroke_geom::curvature::{center_of_curvature, is_evolute_mode};
use vecstroke_geom::point::{dot, perp, point, HPoint, Point, Vector};
use vecstroke_path::events::{DecoratedPath, InputPath, RegularPath, SegmentPiece};
use vecstroke_path::style::{CapStyle, InnerJoinStyle, JoinStyle, StrokeOptions, StrokeStyle};

use crate::approximate::{approximate_cubic, Sampler};
use crate::curve::{from_piece, Segment};

/// Above this cosine, two offset-curve normals are close enough that a join
/// or cap arc degenerates to a straight line (roughly a 2 degree turn).
const ARC_COS_EPS: f64 = 0.9995;

#[derive(Clone, Copy, Debug)]
enum Prim {
    Linear(Point, Point),
    Quadratic(Point, Point, Point),
    RationalQuadratic(Point, HPoint, Point),
    Cubic(Point, Point, Point, Point),
}

fn emit_prim(sink: &mut impl InputPath, prim: &Prim) {
    match *prim {
        Prim::Linear(a, b) => sink.linear_segment(a, b),
        Prim::Quadratic(a, b, c) => sink.quadratic_segment(a, b, c),
        Prim::RationalQuadratic(a, b, c) => sink.rational_quadratic_segment(a, b, c),
        Prim::Cubic(a, b, c, d) => sink.cubic_segment(a, b, c, d),
    }
}

fn reverse_prim(prim: &Prim) -> Prim {
    match *prim {
        Prim::Linear(a, b) => Prim::Linear(b, a),
        Prim::Quadratic(a, b, c) => Prim::Quadratic(c, b, a),
        Prim::RationalQuadratic(a, b, c) => Prim::RationalQuadratic(c, b, a),
        Prim::Cubic(a, b, c, d) => Prim::Cubic(d, c, b, a),
    }
}

fn prim_end(prim: &Prim) -> Point {
    match *prim {
        Prim::Linear(_, b) => b,
        Prim::Quadratic(_, _, c) => c,
        Prim::RationalQuadratic(_, _, c) => c,
        Prim::Cubic(_, _, _, d) => d,
    }
}

/// Replaces a primitive's starting point, keeping its other control points.
/// Used to snap the first primitive of a side's piece geometry onto the
/// stream's running position rather than trust it already matches exactly.
fn prim_with_start(prim: &Prim, start: Point) -> Prim {
    match *prim {
        Prim::Linear(_, b) => Prim::Linear(start, b),
        Prim::Quadratic(_, b, c) => Prim::Quadratic(start, b, c),
        Prim::RationalQuadratic(_, b, c) => Prim::RationalQuadratic(start, b, c),
        Prim::Cubic(_, b, c, d) => Prim::Cubic(start, b, c, d),
    }
}

fn unit_normal(d: Vector) -> Vector {
    let len = (d.x * d.x + d.y * d.y).sqrt().max(1e-300);
    let p = perp(d);
    vecstroke_geom::point::vector(p.x / len, p.y / len)
}

fn unit(d: Vector) -> Vector {
    let len = (d.x * d.x + d.y * d.y).sqrt().max(1e-300);
    vecstroke_geom::point::vector(d.x / len, d.y / len)
}

fn offset_point(p: Point, n: Vector, offset: f64) -> Point {
    point(p.x + offset * n.x, p.y + offset * n.y)
}

fn dist(a: Point, b: Point) -> f64 {
    ((a.x - b.x) * (a.x - b.x) + (a.y - b.y) * (a.y - b.y)).sqrt()
}

/// `sink_arc` (§4.7): a round join or cap core between two offset points
/// sharing center `c`, as a single rational-quadratic conic when the turn is
/// wide enough to need one, or a line when it's negligible.
fn arc_prims(c: Point, q0: Point, n0: Vector, q1: Point, n1: Vector, offset: f64) -> Vec<Prim> {
    let cos = dot(n0, n1).clamp(-1.0, 1.0);
    if cos >= ARC_COS_EPS {
        return vec![Prim::Linear(q0, q1)];
    }
    let sum = vecstroke_geom::point::vector(n0.x + n1.x, n0.y + n1.y);
    let sum_len = (sum.x * sum.x + sum.y * sum.y).sqrt();
    let bisector = if sum_len < 1e-9 { perp(n0) } else { vecstroke_geom::point::vector(sum.x / sum_len, sum.y / sum_len) };
    let w1 = (0.5 * (cos + 1.0)).abs().sqrt();
    let ctrl = HPoint::new(offset * bisector.x + w1 * c.x, offset * bisector.y + w1 * c.y, w1);
    vec![Prim::RationalQuadratic(q0, ctrl, q1)]
}

fn line_intersection(q0: Point, d0: Vector, q1: Point, d1: Vector) -> Option<Point> {
    let cross = d0.x * d1.y - d0.y * d1.x;
    if cross.abs() < 1e-12 {
        return None;
    }
    let diff = vecstroke_geom::point::vector(q1.x - q0.x, q1.y - q0.y);
    let t = (diff.x * d1.y - diff.y * d1.x) / cross;
    Some(point(q0.x + t * d0.x, q0.y + t * d0.y))
}

/// `sink_join_miter_or_bevel`/`sink_join_miter_clip`: the shared miter-spike
/// computation, clipped at `limit * offset` from the corner when `clip` is
/// set, dropped to a plain bevel line otherwise.
fn miter_prims(c: Point, q0: Point, n0: Vector, q1: Point, n1: Vector, offset: f64, limit: f64, clip: bool) -> Vec<Prim> {
    let m = match line_intersection(q0, perp(n0), q1, perp(n1)) {
        Some(m) => m,
        None => return vec![Prim::Linear(q0, q1)],
    };
    let l = dist(c, m);
    if l <= limit * offset.abs() || l < 1e-12 {
        return vec![Prim::Linear(q0, m), Prim::Linear(m, q1)];
    }
    if !clip {
        return vec![Prim::Linear(q0, q1)];
    }
    let t = (limit * offset.abs()) / l;
    let pa = point(q0.x + t * (m.x - q0.x), q0.y + t * (m.y - q0.y));
    let pb = point(q1.x + t * (m.x - q1.x), q1.y + t * (m.y - q1.y));
    vec![Prim::Linear(q0, pa), Prim::Linear(pa, pb), Prim::Linear(pb, q1)]
}

fn outer_join_prims(style: JoinStyle, c: Point, q0: Point, n0: Vector, q1: Point, n1: Vector, offset: f64, limit: f64) -> Vec<Prim> {
    match style {
        JoinStyle::Round => arc_prims(c, q0, n0, q1, n1, offset),
        JoinStyle::Bevel => vec![Prim::Linear(q0, q1)],
        JoinStyle::MiterOrBevel => miter_prims(c, q0, n0, q1, n1, offset, limit, false),
        JoinStyle::MiterClip => miter_prims(c, q0, n0, q1, n1, offset, limit, true),
    }
}

/// `sink_inner_join_round`/`sink_inner_join_bevel` (§4.6, §4.7): `w > 1`
/// means the far side's own fill already covers this corner, so a single
/// line suffices; `0 < w <= 1` pivots through the center; `w <= 0` wraps
/// fully around, the long way drawn as an arc (round) or a line (bevel).
fn inner_join_prims(round: bool, c: Point, q0: Point, n0: Vector, q1: Point, n1: Vector, w: f64, offset: f64) -> Vec<Prim> {
    if w > 1.0 {
        return vec![Prim::Linear(q0, q1)];
    }
    if w > 0.0 {
        return vec![Prim::Linear(q0, c), Prim::Linear(c, q1)];
    }
    let mut v = vec![Prim::Linear(q0, c), Prim::Linear(c, q1)];
    if round {
        v.extend(arc_prims(c, q1, n1, q0, n0, offset));
    } else {
        v.push(Prim::Linear(q1, q0));
    }
    v.push(Prim::Linear(q0, c));
    v.push(Prim::Linear(c, q1));
    v
}

fn cap_prims(style: CapStyle, p: Point, d: Vector, offset: f64) -> Vec<Prim> {
    let n = unit_normal(d);
    let dhat = unit(d);
    let q_pos = offset_point(p, n, offset);
    let q_neg = offset_point(p, n, -offset);
    match style {
        CapStyle::Butt => vec![Prim::Linear(q_pos, q_neg)],
        CapStyle::Round => {
            let apex_n = vecstroke_geom::point::vector(-dhat.x, -dhat.y);
            let apex = offset_point(p, apex_n, offset);
            let mut v = arc_prims(p, q_pos, n, apex, apex_n, offset);
            v.extend(arc_prims(p, apex, apex_n, q_neg, vecstroke_geom::point::vector(-n.x, -n.y), offset));
            v
        }
        CapStyle::Square => {
            let e0 = point(q_pos.x + offset * dhat.x, q_pos.y + offset * dhat.y);
            let e1 = point(q_neg.x + offset * dhat.x, q_neg.y + offset * dhat.y);
            vec![Prim::Linear(q_pos, e0), Prim::Linear(e0, e1), Prim::Linear(e1, q_neg)]
        }
        CapStyle::Triangle => {
            let apex = point(p.x + offset * dhat.x, p.y + offset * dhat.y);
            vec![Prim::Linear(q_pos, apex), Prim::Linear(apex, q_neg)]
        }
        CapStyle::Fletching => {
            let apex = point(p.x + offset * dhat.x, p.y + offset * dhat.y);
            let a = point(p.x + 0.5 * offset * dhat.x + 0.5 * offset * n.x, p.y + 0.5 * offset * dhat.y + 0.5 * offset * n.y);
            let b = point(p.x + 0.5 * offset * dhat.x - 0.5 * offset * n.x, p.y + 0.5 * offset * dhat.y - 0.5 * offset * n.y);
            vec![Prim::Linear(q_pos, a), Prim::Linear(a, apex), Prim::Linear(apex, b), Prim::Linear(b, q_neg)]
        }
    }
}

struct OffsetSampler<'a> {
    seg: &'a Segment,
    offset: f64,
}

impl Sampler for OffsetSampler<'_> {
    fn sample(&self, t: f64) -> Point {
        let p = self.seg.sample(t);
        let d = self.seg.derivative(t);
        offset_point(p, unit_normal(d), self.offset)
    }

    fn tangent_direction(&self, t: f64) -> Vector {
        self.seg.derivative(t)
    }
}

fn offset_curve_prims(seg: &Segment, offset: f64, ftol: f64) -> Vec<Prim> {
    let sampler = OffsetSampler { seg, offset };
    let pieces = approximate_cubic(&sampler, 0.0, 1.0, ftol);
    pieces.iter().map(|b: &Bezier<Point>| Prim::Cubic(b.points[0], b.points[1], b.points[2], b.points[3])).collect()
}

/// Radius clamp handed to `center_of_curvature`, scaled to the offset so it
/// only bites near genuine tight turns, never a straight run's rounding
/// noise.
fn evolute_max_radius(offset: f64) -> f64 {
    offset.abs().max(1e-6) * 1e4
}

/// Classifies a piece as evolute mode (§4.7) by sampling `is_evolute_mode`
/// at three interior points and taking a majority vote, matching the
/// regularizer's own sampling scheme.
fn mode_is_evolute(seg: &Segment, offset: f64) -> bool {
    [0.25, 0.5, 0.75]
        .iter()
        .filter(|&&t| is_evolute_mode(seg.sample(t), seg.derivative(t), seg.second_derivative(t), offset))
        .count()
        >= 2
}

struct EvoluteSampler<'a> {
    seg: &'a Segment,
    max_r: f64,
}

impl Sampler for EvoluteSampler<'_> {
    fn sample(&self, t: f64) -> Point {
        let s = self.seg.sample(t);
        let ds = self.seg.derivative(t);
        let dds = self.seg.second_derivative(t);
        center_of_curvature(s, ds, dds, self.max_r)
    }

    fn tangent_direction(&self, t: f64) -> Vector {
        perp(self.seg.derivative(t))
    }
}

fn evolute_curve_prims(seg: &Segment, max_r: f64, ftol: f64) -> Vec<Prim> {
    let sampler = EvoluteSampler { seg, max_r };
    let pieces = approximate_cubic(&sampler, 0.0, 1.0, ftol);
    pieces.iter().map(|b: &Bezier<Point>| Prim::Cubic(b.points[0], b.points[1], b.points[2], b.points[3])).collect()
}

/// `sink_offset_f_evolute` (§4.7): the parallel offset curve self-intersects
/// once the offset exceeds the local radius of curvature, so this detours
/// through the evolute instead — input endpoint to evolute endpoint (line),
/// the evolute itself (curve), evolute endpoint back to input endpoint
/// (line). The source closes this as a separate small loop; here, since the
/// stream's running position on entry is the *previous* offset point, the
/// detour is inlined between two connecting legs back to the offset curve
/// (`q0`/`q1`) so the run's single-pass offset-point continuity still holds.
fn evolute_prims(seg: &Segment, offset: f64, ftol: f64) -> Vec<Prim> {
    let max_r = evolute_max_radius(offset);
    let p0 = seg.sample(0.0);
    let p1 = seg.sample(1.0);
    let n0 = unit_normal(seg.derivative(0.0));
    let n1 = unit_normal(seg.derivative(1.0));
    let q0 = offset_point(p0, n0, offset);
    let q1 = offset_point(p1, n1, offset);
    let e0 = center_of_curvature(p0, seg.derivative(0.0), seg.second_derivative(0.0), max_r);
    let e1 = center_of_curvature(p1, seg.derivative(1.0), seg.second_derivative(1.0), max_r);

    let mut v = vec![Prim::Linear(q0, p0), Prim::Linear(p0, e0)];
    v.extend(evolute_curve_prims(seg, max_r, ftol));
    v.push(Prim::Linear(e1, p1));
    v.push(Prim::Linear(p1, q1));
    v
}

/// Picks the offset-mode or evolute-mode construction for one side of a
/// curved piece, per §4.7's per-side offset/evolute classification.
fn side_prims(seg: &Segment, offset: f64, ftol: f64) -> Vec<Prim> {
    if mode_is_evolute(seg, offset) {
        evolute_prims(seg, offset, ftol)
    } else {
        offset_curve_prims(seg, offset, ftol)
    }
}

pub struct Thickener<S: InputPath> {
    sink: S,
    style: StrokeStyle,
    offset: f64,
    ftol: f64,
    miter_limit: f64,
    fwd_pt: Point,
    bwd_pt: Point,
    run_start_neg: Point,
    backward_buf: Vec<Prim>,
}

impl<S: InputPath> Thickener<S> {
    pub fn new(sink: S, opts: &StrokeOptions) -> Self {
        let origin = point(0.0, 0.0);
        Thickener {
            sink,
            style: opts.style.clone(),
            offset: opts.offset(),
            ftol: opts.ftol,
            miter_limit: opts.style.miter_limit,
            fwd_pt: origin,
            bwd_pt: origin,
            run_start_neg: origin,
            backward_buf: Vec::new(),
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn start_run(&mut self, p: Point, d: Vector, style: CapStyle) {
        let n = unit_normal(d);
        let q_pos = offset_point(p, n, self.offset);
        let q_neg = offset_point(p, n, -self.offset);
        self.sink.begin_contour(q_neg);
        let prims = cap_prims(style, p, d, self.offset);
        for prim in prims.iter().rev() {
            emit_prim(&mut self.sink, &reverse_prim(prim));
        }
        self.fwd_pt = q_pos;
        self.bwd_pt = q_neg;
        self.run_start_neg = q_neg;
        self.backward_buf.clear();
    }

    fn finalize_run(&mut self, p: Point, d: Vector, style: CapStyle) {
        let prims = cap_prims(style, p, d, self.offset);
        for prim in &prims {
            emit_prim(&mut self.sink, prim);
        }
        let mut buf = core::mem::take(&mut self.backward_buf);
        buf.reverse();
        for prim in &buf {
            emit_prim(&mut self.sink, &reverse_prim(prim));
        }
        self.sink.end_closed_contour(self.run_start_neg);
    }

    fn emit_fwd_all(&mut self, prims: &[Prim]) {
        for prim in prims {
            emit_prim(&mut self.sink, prim);
        }
    }

    fn push_bwd_all(&mut self, prims: Vec<Prim>) {
        self.backward_buf.extend(prims);
    }

    fn corner(&mut self, d0: Vector, p: Point, d1: Vector, w: f64, fwd_is_outer: bool) {
        let n0 = unit_normal(d0);
        let n1 = unit_normal(d1);
        let q0f = offset_point(p, n0, self.offset);
        let q1f = offset_point(p, n1, self.offset);
        let q0b = offset_point(p, n0, -self.offset);
        let q1b = offset_point(p, n1, -self.offset);
        if fwd_is_outer {
            let fwd = outer_join_prims(self.style.join, p, q0f, n0, q1f, n1, self.offset, self.miter_limit);
            self.emit_fwd_all(&fwd);
            let bwd = inner_join_prims(matches!(self.style.inner_join, InnerJoinStyle::Round), p, q0b, n0, q1b, n1, w, self.offset);
            self.push_bwd_all(bwd);
        } else {
            let fwd = inner_join_prims(matches!(self.style.inner_join, InnerJoinStyle::Round), p, q0f, n0, q1f, n1, w, self.offset);
            self.emit_fwd_all(&fwd);
            let bwd = outer_join_prims(self.style.join, p, q0b, n0, q1b, n1, self.offset, self.miter_limit);
            self.push_bwd_all(bwd);
        }
        self.fwd_pt = q1f;
        self.bwd_pt = q1b;
    }

    fn corner_cusp(&mut self, d0: Vector, p: Point, d1: Vector, fwd_is_outer: bool) {
        let n0 = unit_normal(d0);
        let n1 = unit_normal(d1);
        let q0f = offset_point(p, n0, self.offset);
        let q1f = offset_point(p, n1, self.offset);
        let q0b = offset_point(p, n0, -self.offset);
        let q1b = offset_point(p, n1, -self.offset);
        if fwd_is_outer {
            let fwd = arc_prims(p, q0f, n0, q1f, n1, self.offset);
            self.emit_fwd_all(&fwd);
            let bwd = inner_join_prims(true, p, q0b, n0, q1b, n1, 0.0, self.offset);
            self.push_bwd_all(bwd);
        } else {
            let fwd = inner_join_prims(true, p, q0f, n0, q1f, n1, 0.0, self.offset);
            self.emit_fwd_all(&fwd);
            let bwd = arc_prims(p, q0b, n0, q1b, n1, self.offset);
            self.push_bwd_all(bwd);
        }
        self.fwd_pt = q1f;
        self.bwd_pt = q1b;
    }

    fn thicken_linear(&mut self, seg: &Segment) {
        let p1 = seg.to();
        let d = seg.derivative(0.5);
        let n = unit_normal(d);
        let qf1 = offset_point(p1, n, self.offset);
        emit_prim(&mut self.sink, &Prim::Linear(self.fwd_pt, qf1));
        self.fwd_pt = qf1;
        let qb1 = offset_point(p1, n, -self.offset);
        self.backward_buf.push(Prim::Linear(self.bwd_pt, qb1));
        self.bwd_pt = qb1;
    }

    fn emit_side(&mut self, prims: &[Prim]) {
        let Some((first, rest)) = prims.split_first() else { return };
        let first = prim_with_start(first, self.fwd_pt);
        emit_prim(&mut self.sink, &first);
        self.fwd_pt = prim_end(&first);
        for prim in rest {
            emit_prim(&mut self.sink, prim);
            self.fwd_pt = prim_end(prim);
        }
    }

    fn push_side(&mut self, prims: &[Prim]) {
        let Some((first, rest)) = prims.split_first() else { return };
        let first = prim_with_start(first, self.bwd_pt);
        self.bwd_pt = prim_end(&first);
        self.backward_buf.push(first);
        for prim in rest {
            self.bwd_pt = prim_end(prim);
            self.backward_buf.push(*prim);
        }
    }

    fn thicken_curved(&mut self, seg: &Segment) {
        let fwd = side_prims(seg, self.offset, self.ftol);
        self.emit_side(&fwd);
        let bwd = side_prims(seg, -self.offset, self.ftol);
        self.push_side(&bwd);
    }
}

impl<S: InputPath> RegularPath for Thickener<S> {
    fn begin_regular_contour(&mut self, _p: Point, _d: Vector) {}

    fn end_regular_open_contour(&mut self, _d: Vector, _p: Point) {}

    fn end_regular_closed_contour(&mut self, _d: Vector, _p: Point) {}

    fn degenerate_segment(&mut self, _p_i: Point, d: Vector, p_f: Point) {
        let n = unit_normal(d);
        let qf = offset_point(p_f, n, self.offset);
        emit_prim(&mut self.sink, &Prim::Linear(self.fwd_pt, qf));
        self.fwd_pt = qf;
        let qb = offset_point(p_f, n, -self.offset);
        self.backward_buf.push(Prim::Linear(self.bwd_pt, qb));
        self.bwd_pt = qb;
    }

    fn cusp(&mut self, d0: Vector, p: Point, d1: Vector, _w: f64) {
        self.corner_cusp(d0, p, d1, true);
    }

    fn inner_cusp(&mut self, d0: Vector, p: Point, d1: Vector, _w: f64) {
        self.corner_cusp(d0, p, d1, false);
    }

    fn begin_segment_piece(&mut self, _p: Point, _d: Vector) {}

    fn end_segment_piece(&mut self, _d: Vector, _p: Point) {}

    fn segment_piece(&mut self, piece: SegmentPiece) {
        let seg = from_piece(&piece);
        match &seg {
            Segment::Linear(_) => self.thicken_linear(&seg),
            _ => self.thicken_curved(&seg),
        }
    }
}

impl<S: InputPath> DecoratedPath for Thickener<S> {
    fn initial_cap(&mut self, p: Point, d: Vector) {
        self.start_run(p, d, self.style.initial_cap);
    }

    fn terminal_cap(&mut self, d: Vector, p: Point) {
        self.finalize_run(p, d, self.style.terminal_cap);
    }

    fn initial_butt_cap(&mut self, p: Point, d: Vector) {
        self.start_run(p, d, CapStyle::Butt);
    }

    fn terminal_butt_cap(&mut self, d: Vector, p: Point) {
        self.finalize_run(p, d, CapStyle::Butt);
    }

    // Never reached from this crate's `Decorator` (§4.5): the forward pass
    // doesn't get replayed backward here, so no event carries a "backward"
    // tag. Implemented defensively, matching the source's own pairing
    // (`backward_initial_cap` draws with the *terminal* cap style).
    fn backward_initial_cap(&mut self, p: Point, d: Vector) {
        self.start_run(p, d, self.style.terminal_cap);
    }

    fn backward_terminal_cap(&mut self, d: Vector, p: Point) {
        self.finalize_run(p, d, self.style.initial_cap);
    }

    fn backward_initial_butt_cap(&mut self, p: Point, d: Vector) {
        self.start_run(p, d, CapStyle::Butt);
    }

    fn backward_terminal_butt_cap(&mut self, d: Vector, p: Point) {
        self.finalize_run(p, d, CapStyle::Butt);
    }

    fn join(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        self.corner(d0, p, d1, w, true);
    }

    fn inner_join(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        self.corner(d0, p, d1, w, false);
    }

    fn dash_initial_cap(&mut self, p: Point, d: Vector) {
        self.start_run(p, d, self.style.dash_initial_cap);
    }

    fn dash_terminal_cap(&mut self, d: Vector, p: Point) {
        self.finalize_run(p, d, self.style.dash_terminal_cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecstroke_geom::point::vector;

    #[derive(Default)]
    struct Recorder {
        contours: usize,
        linears: usize,
        rational_quadratics: usize,
        cubics: usize,
    }

    impl InputPath for Recorder {
        fn begin_contour(&mut self, _p0: Point) {
            self.contours += 1;
        }
        fn end_open_contour(&mut self, _p0: Point) {}
        fn end_closed_contour(&mut self, _p0: Point) {}
        fn linear_segment(&mut self, _p0: Point, _p1: Point) {
            self.linears += 1;
        }
        fn quadratic_segment(&mut self, _p0: Point, _p1: Point, _p2: Point) {}
        fn rational_quadratic_segment(&mut self, _p0: Point, _p1: HPoint, _p2: Point) {
            self.rational_quadratics += 1;
        }
        fn cubic_segment(&mut self, _p0: Point, _p1: Point, _p2: Point, _p3: Point) {
            self.cubics += 1;
        }
    }

    fn opts() -> StrokeOptions {
        StrokeOptions::new(2.0)
    }

    #[test]
    fn a_straight_butt_capped_run_is_a_single_closed_quad() {
        let mut th = Thickener::new(Recorder::default(), &opts());
        th.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        th.initial_butt_cap(point(0.0, 0.0), vector(1.0, 0.0));
        th.begin_segment_piece(point(0.0, 0.0), vector(1.0, 0.0));
        th.segment_piece(SegmentPiece::Linear { t_i: 0.0, t_f: 1.0, p0: point(0.0, 0.0), p1: point(10.0, 0.0) });
        th.end_segment_piece(vector(1.0, 0.0), point(10.0, 0.0));
        th.terminal_butt_cap(vector(1.0, 0.0), point(10.0, 0.0));
        th.end_regular_open_contour(vector(1.0, 0.0), point(10.0, 0.0));
        let rec = th.into_sink();
        assert_eq!(rec.contours, 1);
        // start cap, forward edge, end cap, backward edge.
        assert_eq!(rec.linears, 4);
    }

    #[test]
    fn arc_prims_uses_a_line_for_a_negligible_turn() {
        let n0 = vector(0.0, 1.0);
        let n1 = vector(1e-6, 1.0);
        let prims = arc_prims(point(0.0, 0.0), point(0.0, 1.0), n0, point(1e-6, 1.0), n1, 1.0);
        assert_eq!(prims.len(), 1);
        assert!(matches!(prims[0], Prim::Linear(_, _)));
    }

    #[test]
    fn arc_prims_uses_a_conic_for_a_right_angle_turn() {
        let n0 = vector(1.0, 0.0);
        let n1 = vector(0.0, 1.0);
        let prims = arc_prims(point(0.0, 0.0), point(1.0, 0.0), n0, point(0.0, 1.0), n1, 1.0);
        assert_eq!(prims.len(), 1);
        assert!(matches!(prims[0], Prim::RationalQuadratic(_, _, _)));
    }

    #[test]
    fn inner_join_with_large_weight_is_a_single_line() {
        let prims = inner_join_prims(true, point(0.0, 0.0), point(-1.0, 0.0), vector(0.0, -1.0), point(0.0, -1.0), vector(-1.0, 0.0), 2.0, 1.0);
        assert_eq!(prims.len(), 1);
        assert!(matches!(prims[0], Prim::Linear(_, _)));
    }

    #[test]
    fn inner_join_with_zero_weight_wraps_fully_around() {
        let prims = inner_join_prims(true, point(0.0, 0.0), point(-1.0, 0.0), vector(0.0, -1.0), point(0.0, -1.0), vector(-1.0, 0.0), 0.0, 1.0);
        assert!(prims.len() > 2);
    }
}
