//! `decorated-path-f-simplify-joins` (§4.6): classifies each raw join/cusp
//! coming out of the decoration stage as an outer join/cusp, an inner
//! join/cusp, or no join at all, from the turn angle between the two
//! tangents, and assigns the inner-join weight that records whether the
//! stroke's own fill already covers the inner corner.
//!
//! Classification needs one piece of context on each side of the join: the
//! segment piece right before it and right after it. The source buffers
//! these in a three-slot ring (`m_path[3]`) so that, by the time a join
//! reaches the middle slot, both neighbors are already known; this is the
//! same ring here, specialized to the fact that each slot in this pipeline
//! holds exactly one logical event (a single piece, or a single join/cusp,
//! or a single cap) rather than an arbitrary run of them.

use arrayvec::ArrayVec;

use vecstroke_geom::curvature::is_evolute_mode;
use vecstroke_geom::point::{cross, dot, perp, point, Point, Vector};
use vecstroke_path::events::{DecoratedPath, RegularPath, SegmentPiece};

use crate::curve::{from_piece, Segment};

/// Below this, a turn is treated as straight and the join is dropped.
const STRAIGHT_EPS: f64 = 1e-9;

#[derive(Clone, Copy)]
enum Ev {
    Degenerate(Point, Vector, Point),
    Cusp(Vector, Point, Vector, f64),
    InnerCusp(Vector, Point, Vector, f64),
    Join(Vector, Point, Vector, f64),
    InnerJoin(Vector, Point, Vector, f64),
    BeginPiece(Point, Vector),
    EndPiece(Vector, Point),
    Piece(SegmentPiece),
    InitialCap(Point, Vector),
    TerminalCap(Vector, Point),
    InitialButtCap(Point, Vector),
    TerminalButtCap(Vector, Point),
    BackwardInitialCap(Point, Vector),
    BackwardTerminalCap(Vector, Point),
    BackwardInitialButtCap(Point, Vector),
    BackwardTerminalButtCap(Vector, Point),
    DashInitialCap(Point, Vector),
    DashTerminalCap(Vector, Point),
    BeginContour(Point, Vector),
    EndOpenContour(Vector, Point),
    EndClosedContour(Vector, Point),
}

fn emit<S: RegularPath + DecoratedPath>(sink: &mut S, ev: Ev) {
    match ev {
        Ev::Degenerate(pi, d, pf) => sink.degenerate_segment(pi, d, pf),
        Ev::Cusp(d0, p, d1, w) => sink.cusp(d0, p, d1, w),
        Ev::InnerCusp(d0, p, d1, w) => sink.inner_cusp(d0, p, d1, w),
        Ev::Join(d0, p, d1, w) => sink.join(d0, p, d1, w),
        Ev::InnerJoin(d0, p, d1, w) => sink.inner_join(d0, p, d1, w),
        Ev::BeginPiece(p, d) => sink.begin_segment_piece(p, d),
        Ev::EndPiece(d, p) => sink.end_segment_piece(d, p),
        Ev::Piece(piece) => sink.segment_piece(piece),
        Ev::InitialCap(p, d) => sink.initial_cap(p, d),
        Ev::TerminalCap(d, p) => sink.terminal_cap(d, p),
        Ev::InitialButtCap(p, d) => sink.initial_butt_cap(p, d),
        Ev::TerminalButtCap(d, p) => sink.terminal_butt_cap(d, p),
        Ev::BackwardInitialCap(p, d) => sink.backward_initial_cap(p, d),
        Ev::BackwardTerminalCap(d, p) => sink.backward_terminal_cap(d, p),
        Ev::BackwardInitialButtCap(p, d) => sink.backward_initial_butt_cap(p, d),
        Ev::BackwardTerminalButtCap(d, p) => sink.backward_terminal_butt_cap(d, p),
        Ev::DashInitialCap(p, d) => sink.dash_initial_cap(p, d),
        Ev::DashTerminalCap(d, p) => sink.dash_terminal_cap(d, p),
        Ev::BeginContour(p, d) => sink.begin_regular_contour(p, d),
        Ev::EndOpenContour(d, p) => sink.end_regular_open_contour(d, p),
        Ev::EndClosedContour(d, p) => sink.end_regular_closed_contour(d, p),
    }
}

fn slot_piece(slot: &[Ev]) -> Option<Segment> {
    slot.iter().find_map(|ev| match ev {
        Ev::Piece(p) => Some(from_piece(p)),
        _ => None,
    })
}

pub struct JoinSimplifier<S: RegularPath + DecoratedPath> {
    sink: S,
    offset: f64,
    slots: [ArrayVec<Ev, 4>; 3],
    index: usize,
}

impl<S: RegularPath + DecoratedPath> JoinSimplifier<S> {
    pub fn new(sink: S, offset: f64) -> Self {
        JoinSimplifier { sink, offset, slots: [ArrayVec::new(), ArrayVec::new(), ArrayVec::new()], index: 2 }
    }

    pub fn into_sink(mut self) -> S {
        self.flush();
        self.sink
    }

    fn first_idx(&self) -> usize {
        (self.index + 1) % 3
    }

    fn middle_idx(&self) -> usize {
        (self.index + 2) % 3
    }

    fn last_idx(&self) -> usize {
        self.index % 3
    }

    fn push(&mut self, ev: Ev) {
        let idx = self.last_idx();
        let _ = self.slots[idx].try_push(ev);
    }

    fn shift(&mut self) {
        self.classify_middle();
        let idx = self.first_idx();
        let events = core::mem::replace(&mut self.slots[idx], ArrayVec::new());
        for ev in events {
            emit(&mut self.sink, ev);
        }
        self.index += 1;
    }

    fn flush(&mut self) {
        self.shift();
        self.shift();
        self.shift();
    }

    fn classify_middle(&mut self) {
        let middle = self.middle_idx();
        if self.slots[middle].len() != 1 {
            return;
        }
        let (d0, p, d1, is_join) = match self.slots[middle][0] {
            Ev::Join(d0, p, d1, _) => (d0, p, d1, true),
            Ev::Cusp(d0, p, d1, _) => (d0, p, d1, false),
            _ => return,
        };
        let sin = dot(-perp(d0), d1);
        let cos = dot(d0, d1);
        let replacement = if sin < -STRAIGHT_EPS {
            let w = if is_join { self.inner_join_weight(d0, p, d1) } else { 0.0 };
            Some(if is_join { Ev::InnerJoin(d0, p, d1, w) } else { Ev::InnerCusp(d0, p, d1, 0.0) })
        } else if sin > STRAIGHT_EPS || cos < 0.0 {
            let w = if is_join { self.inner_join_weight(d0, p, d1) } else { 0.0 };
            Some(if is_join { Ev::Join(d0, p, d1, w) } else { Ev::Cusp(d0, p, d1, 0.0) })
        } else {
            None
        };
        self.slots[middle].clear();
        if let Some(ev) = replacement {
            let _ = self.slots[middle].try_push(ev);
        }
    }

    /// Whether the stroke's own fill, on one side of a corner, already
    /// passes outside the inner-join vertex on the other side — in which
    /// case that side contributes `1` to the inner-join weight (§4.6).
    fn inner_join_weight(&self, d0: Vector, p: Point, d1: Vector) -> f64 {
        let (v0, v1) = inner_join_vertices(self.offset, d0, p, d1);
        let mut w = 0.0;
        if let Some(seg) = slot_piece(&self.slots[self.last_idx()]) {
            w += cover_contribution(v1, p, d0, d1, &seg, 0.0, self.offset);
        }
        if let Some(seg) = slot_piece(&self.slots[self.first_idx()]) {
            w += cover_contribution(v0, p, flip(d1), flip(d0), &seg, 1.0, self.offset);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(w, "inner-join covering weight decided (§4.6)");
        w
    }
}

fn inner_join_vertices(offset: f64, d0: Vector, p: Point, d1: Vector) -> (Point, Point) {
    let r = if cross(d0, d1) < 0.0 { -offset } else { offset };
    (offset_along(p, d1, r), offset_along(p, d0, r))
}

fn flip(v: Vector) -> Vector {
    vecstroke_geom::point::vector(-v.x, -v.y)
}

fn offset_along(p: Point, d: Vector, r: f64) -> Point {
    let len = (d.x * d.x + d.y * d.y).sqrt().max(1e-30);
    let n = perp(d);
    point(p.x + r * n.x / len, p.y + r * n.y / len)
}

/// `1` when the neighboring piece, sampled at its end nearest the join
/// (`t`), does not already curl back across `vertex` within its own offset
/// curve. Evaluated at a single endpoint sample rather than the source's
/// root search over the whole neighboring run: every slot in this pipeline
/// holds exactly one already-regularized piece, so the endpoint adjacent to
/// the join is the only sample that matters.
fn cover_contribution(vertex: Point, center: Point, d_in: Vector, d_out: Vector, seg: &Segment, t: f64, offset: f64) -> f64 {
    let s_pos = seg.sample(t);
    let ds = seg.derivative(t);
    let dds = seg.second_derivative(t);
    if is_evolute_mode(s_pos, ds, dds, offset) {
        return 0.0;
    }
    let normal = perp(ds);
    if vertex_covers_by_normal(vertex, center, d_in, d_out, normal) {
        1.0
    } else {
        0.0
    }
}

fn vertex_covers_by_normal(vertex: Point, center: Point, d0: Vector, d1: Vector, normal: Vector) -> bool {
    let denom = dot(normal, normal);
    if denom < 1e-30 {
        return false;
    }
    let vc = vecstroke_geom::point::vector(vertex.x - center.x, vertex.y - center.y);
    let k = 2.0 * dot(normal, vc) / denom;
    let other = vecstroke_geom::point::vector(vc.x - k * normal.x, vc.y - k * normal.y);
    if cross(d0, d1) < 0.0 {
        dot(other, flip(d1)) > 0.0 || dot(other, flip(d0)) < 0.0
    } else {
        dot(other, d1) < 0.0 || dot(other, d0) > 0.0
    }
}

impl<S: RegularPath + DecoratedPath> RegularPath for JoinSimplifier<S> {
    fn begin_regular_contour(&mut self, p: Point, d: Vector) {
        self.flush();
        self.push(Ev::BeginContour(p, d));
        self.shift();
    }

    fn end_regular_open_contour(&mut self, d: Vector, p: Point) {
        self.push(Ev::EndOpenContour(d, p));
        self.flush();
    }

    fn end_regular_closed_contour(&mut self, d: Vector, p: Point) {
        self.push(Ev::EndClosedContour(d, p));
        self.flush();
    }

    fn degenerate_segment(&mut self, p_i: Point, d: Vector, p_f: Point) {
        self.push(Ev::Degenerate(p_i, d, p_f));
        self.shift();
    }

    fn cusp(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        self.push(Ev::Cusp(d0, p, d1, w));
        self.shift();
    }

    fn inner_cusp(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        self.push(Ev::InnerCusp(d0, p, d1, w));
        self.shift();
    }

    fn begin_segment_piece(&mut self, p: Point, d: Vector) {
        self.push(Ev::BeginPiece(p, d));
    }

    fn end_segment_piece(&mut self, d: Vector, p: Point) {
        self.push(Ev::EndPiece(d, p));
        self.shift();
    }

    fn segment_piece(&mut self, piece: SegmentPiece) {
        self.push(Ev::Piece(piece));
    }
}

impl<S: RegularPath + DecoratedPath> DecoratedPath for JoinSimplifier<S> {
    fn initial_cap(&mut self, p: Point, d: Vector) {
        self.flush();
        self.push(Ev::InitialCap(p, d));
        self.shift();
    }

    fn terminal_cap(&mut self, d: Vector, p: Point) {
        self.push(Ev::TerminalCap(d, p));
        self.flush();
    }

    fn initial_butt_cap(&mut self, p: Point, d: Vector) {
        self.flush();
        self.push(Ev::InitialButtCap(p, d));
        self.shift();
    }

    fn terminal_butt_cap(&mut self, d: Vector, p: Point) {
        self.push(Ev::TerminalButtCap(d, p));
        self.flush();
    }

    fn backward_initial_cap(&mut self, p: Point, d: Vector) {
        self.push(Ev::BackwardInitialCap(p, d));
        self.shift();
    }

    fn backward_terminal_cap(&mut self, d: Vector, p: Point) {
        self.push(Ev::BackwardTerminalCap(d, p));
        self.shift();
    }

    fn backward_initial_butt_cap(&mut self, p: Point, d: Vector) {
        self.push(Ev::BackwardInitialButtCap(p, d));
        self.shift();
    }

    fn backward_terminal_butt_cap(&mut self, d: Vector, p: Point) {
        self.push(Ev::BackwardTerminalButtCap(d, p));
        self.shift();
    }

    fn join(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        self.push(Ev::Join(d0, p, d1, w));
        self.shift();
    }

    fn inner_join(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        self.push(Ev::InnerJoin(d0, p, d1, w));
        self.shift();
    }

    fn dash_initial_cap(&mut self, p: Point, d: Vector) {
        self.flush();
        self.push(Ev::DashInitialCap(p, d));
        self.shift();
    }

    fn dash_terminal_cap(&mut self, d: Vector, p: Point) {
        self.push(Ev::DashTerminalCap(d, p));
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecstroke_geom::point::vector;

    #[derive(Default)]
    struct Recorder {
        joins: usize,
        inner_joins: usize,
        cusps: usize,
        pieces: usize,
        last_inner_join_w: f64,
    }

    impl RegularPath for Recorder {
        fn begin_regular_contour(&mut self, _p: Point, _d: Vector) {}
        fn end_regular_open_contour(&mut self, _d: Vector, _p: Point) {}
        fn end_regular_closed_contour(&mut self, _d: Vector, _p: Point) {}
        fn degenerate_segment(&mut self, _p_i: Point, _d: Vector, _p_f: Point) {}
        fn cusp(&mut self, _d0: Vector, _p: Point, _d1: Vector, _w: f64) {
            self.cusps += 1;
        }
        fn inner_cusp(&mut self, _d0: Vector, _p: Point, _d1: Vector, _w: f64) {
            self.cusps += 1;
        }
        fn begin_segment_piece(&mut self, _p: Point, _d: Vector) {}
        fn end_segment_piece(&mut self, _d: Vector, _p: Point) {}
        fn segment_piece(&mut self, _piece: SegmentPiece) {
            self.pieces += 1;
        }
    }

    impl DecoratedPath for Recorder {
        fn initial_cap(&mut self, _p: Point, _d: Vector) {}
        fn terminal_cap(&mut self, _d: Vector, _p: Point) {}
        fn initial_butt_cap(&mut self, _p: Point, _d: Vector) {}
        fn terminal_butt_cap(&mut self, _d: Vector, _p: Point) {}
        fn backward_initial_cap(&mut self, _p: Point, _d: Vector) {}
        fn backward_terminal_cap(&mut self, _d: Vector, _p: Point) {}
        fn backward_initial_butt_cap(&mut self, _p: Point, _d: Vector) {}
        fn backward_terminal_butt_cap(&mut self, _d: Vector, _p: Point) {}
        fn join(&mut self, _d0: Vector, _p: Point, _d1: Vector, w: f64) {
            self.joins += 1;
            self.last_inner_join_w = w;
        }
        fn inner_join(&mut self, _d0: Vector, _p: Point, _d1: Vector, w: f64) {
            self.inner_joins += 1;
            self.last_inner_join_w = w;
        }
        fn dash_initial_cap(&mut self, _p: Point, _d: Vector) {}
        fn dash_terminal_cap(&mut self, _d: Vector, _p: Point) {}
    }

    fn feed_piece(js: &mut JoinSimplifier<Recorder>, p0: Point, d: Vector, p1: Point) {
        js.begin_segment_piece(p0, d);
        js.segment_piece(SegmentPiece::Linear { t_i: 0.0, t_f: 1.0, p0, p1 });
        js.end_segment_piece(d, p1);
    }

    #[test]
    fn convex_corner_stays_an_outer_join() {
        let mut js = JoinSimplifier::new(Recorder::default(), 1.0);
        js.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        feed_piece(&mut js, point(0.0, 0.0), vector(1.0, 0.0), point(10.0, 0.0));
        js.join(vector(1.0, 0.0), point(10.0, 0.0), vector(0.0, 1.0), 1.0);
        feed_piece(&mut js, point(10.0, 0.0), vector(0.0, 1.0), point(10.0, 10.0));
        js.end_regular_open_contour(vector(0.0, 1.0), point(10.0, 10.0));
        let rec = js.into_sink();
        assert_eq!(rec.joins, 1);
        assert_eq!(rec.inner_joins, 0);
    }

    #[test]
    fn concave_corner_becomes_an_inner_join() {
        let mut js = JoinSimplifier::new(Recorder::default(), 1.0);
        js.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        feed_piece(&mut js, point(0.0, 0.0), vector(1.0, 0.0), point(10.0, 0.0));
        // Turning right (clockwise) makes this a reflex/inner corner for a
        // counterclockwise-wound outline.
        js.join(vector(1.0, 0.0), point(10.0, 0.0), vector(0.0, -1.0), 1.0);
        feed_piece(&mut js, point(10.0, 0.0), vector(0.0, -1.0), point(10.0, -10.0));
        js.end_regular_open_contour(vector(0.0, -1.0), point(10.0, -10.0));
        let rec = js.into_sink();
        assert_eq!(rec.inner_joins, 1);
        assert_eq!(rec.joins, 0);
    }

    #[test]
    fn straight_through_join_is_dropped() {
        let mut js = JoinSimplifier::new(Recorder::default(), 1.0);
        js.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        feed_piece(&mut js, point(0.0, 0.0), vector(1.0, 0.0), point(10.0, 0.0));
        js.join(vector(1.0, 0.0), point(10.0, 0.0), vector(1.0, 0.0), 1.0);
        feed_piece(&mut js, point(10.0, 0.0), vector(1.0, 0.0), point(20.0, 0.0));
        js.end_regular_open_contour(vector(1.0, 0.0), point(20.0, 0.0));
        let rec = js.into_sink();
        assert_eq!(rec.joins, 0);
        assert_eq!(rec.inner_joins, 0);
        assert_eq!(rec.pieces, 2);
    }
}
