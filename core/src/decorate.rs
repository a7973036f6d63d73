//! `regular-path-f-to-decorated-path` (§4.5): turns a regular-path event
//! stream into a decorated one by inserting caps at contour boundaries and
//! joins between segment pieces, and (when the style carries a dash
//! pattern) splitting pieces at dash boundaries and dropping the invisible
//! stretches.
//!
//! Because the contour's open/closed-ness isn't known until its last event
//! arrives, the initial cap is deferred: `begin_regular_contour` always
//! emits `initial_butt_cap` as a placeholder, and the real `initial_cap` (if
//! the style wants one richer than butt) is only emitted once the contour
//! turns out to end open, or to end closed with the pen having been lifted
//! partway through.
//!
//! The source keeps dash-boundary discovery and dash-boundary splitting as
//! two separate filters (this one only emits `begin_dash_parameter`/
//! `end_dash_parameter` markers; another stage cuts geometry at them). Here
//! the split happens in the same place the boundary is found: nothing
//! downstream needs the pre-split piece, and the arc-length object used to
//! find the boundary already has everything needed to cut there too.

use arrayvec::ArrayVec;

use vecstroke_geom::arc_length::{ArcLength, DEFAULT_SUBINTEGRAL_ORDER, DEFAULT_SUBINTERVALS};
use vecstroke_geom::point::{Point, Vector};
use vecstroke_path::events::{DecoratedPath, RegularPath, SegmentPiece};
use vecstroke_path::style::{CapStyle, StrokeOptions, StrokeStyle};

use crate::curve::{from_piece, to_piece, Segment};

pub struct Decorator<S: RegularPath + DecoratedPath> {
    sink: S,
    style: StrokeStyle,
    width: f64,
    dashing: bool,

    initial_pen_down: bool,
    initial_dash: usize,
    initial_length_needed: f64,

    current_pen_down: bool,
    current_dash: usize,
    current_length_needed: f64,

    resets_on_move: bool,
    pen_down_at_begin_contour: bool,

    first_p: Point,
    first_d: Vector,
    pf: Point,
    df: Vector,
}

impl<S: RegularPath + DecoratedPath> Decorator<S> {
    pub fn new(sink: S, opts: &StrokeOptions) -> Self {
        let style = opts.style.clone();
        let width = opts.width;
        let dashing = style.has_dashes();

        let mut initial_pen_down = true;
        let mut initial_dash = 0usize;
        let mut initial_length_needed = 0.0;

        if dashing {
            let length: f64 = style.dashes.iter().map(|d| d * width).sum();
            let mut offset = (style.dash_offset * width) % length.max(f64::MIN_POSITIVE);
            if offset < 0.0 {
                offset += length;
            }
            while offset >= style.dashes[initial_dash] * width {
                offset -= style.dashes[initial_dash] * width;
                initial_dash += 1;
                if initial_dash >= style.dashes.len() {
                    initial_dash = 0;
                }
                initial_pen_down = !initial_pen_down;
            }
            initial_length_needed = style.dashes[initial_dash] * width - offset;
        }

        Decorator {
            sink,
            style,
            width,
            dashing,
            initial_pen_down,
            initial_dash,
            initial_length_needed,
            current_pen_down: initial_pen_down,
            current_dash: initial_dash,
            current_length_needed: initial_length_needed,
            resets_on_move: opts.style.resets_on_move,
            pen_down_at_begin_contour: initial_pen_down,
            first_p: vecstroke_geom::point::point(0.0, 0.0),
            first_d: vecstroke_geom::point::vector(0.0, 0.0),
            pf: vecstroke_geom::point::point(0.0, 0.0),
            df: vecstroke_geom::point::vector(0.0, 0.0),
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Consumes as much of `length_needed` as the segment (of total arc
    /// length `a.get_length()`) can supply, toggling the pen and recording
    /// every point where it does. Mirrors `process_dashes`. Bounded to 32
    /// toggles per piece (a degenerate dash pattern far shorter than the
    /// segment could in principle exceed this; extra toggles are dropped).
    fn walk_dashes(&mut self, a: &ArcLength) -> ArrayVec<f64, 32> {
        let mut cuts = ArrayVec::new();
        let mut length = a.get_length();
        let mut last_t = 0.0;
        while length > 0.0 {
            let now = length.min(self.current_length_needed);
            length -= now;
            if length.abs() < 1e-12 {
                length = 0.0;
            }
            self.current_length_needed -= now;
            if self.current_length_needed.abs() < 1e-12 {
                self.current_length_needed = 0.0;
            }
            if self.current_length_needed <= 0.0 {
                self.current_dash += 1;
                if self.current_dash >= self.style.dashes.len() {
                    self.current_dash = 0;
                }
                self.current_length_needed = self.style.dashes[self.current_dash] * self.width;
                let l = a.get_length();
                let u = if l > 0.0 { (l - length) / l } else { 1.0 };
                let mut t = a.get_relative_parameter_for_length_fraction(u);
                t = t.max(last_t + 1e-12);
                last_t = t;
                if t < 1.0 {
                    let _ = cuts.try_push(t);
                }
                self.current_pen_down = !self.current_pen_down;
            }
        }
        cuts
    }

    fn dash_cap_style(&self, opening: bool) -> CapStyle {
        if opening {
            self.style.dash_initial_cap
        } else {
            self.style.dash_terminal_cap
        }
    }

    /// Splits `seg` (the segment a whole `SegmentPiece` was rebuilt from) at
    /// its dash boundaries and emits a full `begin_segment_piece`/
    /// `segment_piece`/`end_segment_piece` triple, with dash caps, for every
    /// visible stretch. `pen_down_initially` is the pen state in effect
    /// before this piece was entered (used for the very first stretch,
    /// which has no preceding in-piece boundary to react to).
    fn emit_dashed(&mut self, seg: &Segment, pen_down_initially: bool) {
        // `ArcLength::build` requires `Fn + Copy`; a shared reference is
        // `Copy` even though `Segment` itself isn't, so capture `seg` by
        // reference rather than cloning it in.
        let ds2 = move |t: f64| {
            let d = seg.derivative(t);
            d.x * d.x + d.y * d.y
        };
        let a = ArcLength::build(ds2, 0.0, 1.0, DEFAULT_SUBINTERVALS, DEFAULT_SUBINTEGRAL_ORDER);
        let visible = pen_down_initially || self.current_length_needed < a.get_length();
        let cuts = self.walk_dashes(&a);

        if !visible && cuts.is_empty() {
            return;
        }

        let mut bounds: ArrayVec<f64, 34> = ArrayVec::new();
        let _ = bounds.try_push(0.0);
        for t in &cuts {
            let _ = bounds.try_push(*t);
        }
        let _ = bounds.try_push(1.0);

        let mut pen_down = pen_down_initially;
        for w in bounds.windows(2) {
            let (lo, hi) = (w[0], w[1]);
            if pen_down && hi - lo > 1e-12 {
                let sub = seg.cut(lo, hi);
                let p0 = sub.from();
                let d0 = sub.start_tangent();
                let p1 = sub.to();
                let d1 = sub.end_tangent();
                if lo > 0.0 {
                    let cap = self.dash_cap_style(true);
                    if cap == CapStyle::Butt {
                        self.sink.initial_butt_cap(p0, d0);
                    } else {
                        self.sink.dash_initial_cap(p0, d0);
                    }
                }
                self.sink.begin_segment_piece(p0, d0);
                self.sink.segment_piece(to_piece(&sub, lo, hi));
                self.sink.end_segment_piece(d1, p1);
                // Every visible window's end is a dash boundary and gets a
                // cap here, even when it lands exactly on `hi == 1.0` (this
                // piece's own end): a dash transition deserves a cap
                // wherever it falls, regardless of whether it happens to
                // coincide with a segment-piece boundary. Leaving this to
                // `end_regular_*_contour` would miss it whenever the dash
                // pattern's length happens to divide the path's length
                // exactly, since `current_pen_down` would already read
                // false by the time that code runs.
                let cap = self.dash_cap_style(false);
                if cap == CapStyle::Butt {
                    self.sink.terminal_butt_cap(d1, p1);
                } else {
                    self.sink.dash_terminal_cap(d1, p1);
                }
                self.pf = p1;
                self.df = d1;
            }
            pen_down = !pen_down;
        }
    }
}

impl<S: RegularPath + DecoratedPath> RegularPath for Decorator<S> {
    fn begin_regular_contour(&mut self, p: Point, d: Vector) {
        if self.dashing && self.resets_on_move {
            self.current_length_needed = self.initial_length_needed;
            self.current_dash = self.initial_dash;
            self.current_pen_down = self.initial_pen_down;
        }
        self.first_p = p;
        self.first_d = d;
        self.pf = p;
        self.df = d;
        if self.current_pen_down {
            self.pen_down_at_begin_contour = true;
            self.sink.initial_butt_cap(p, d);
        } else {
            self.pen_down_at_begin_contour = false;
        }
    }

    fn end_regular_open_contour(&mut self, d: Vector, p: Point) {
        if self.current_pen_down {
            self.sink.terminal_cap(d, p);
        }
        if self.pen_down_at_begin_contour && self.style.initial_cap != CapStyle::Butt {
            self.sink.initial_cap(self.first_p, self.first_d);
            self.sink.terminal_butt_cap(self.first_d, self.first_p);
        }
    }

    fn end_regular_closed_contour(&mut self, d: Vector, p: Point) {
        if self.current_pen_down && self.pen_down_at_begin_contour {
            self.sink.join(d, p, self.first_d, 0.0);
            self.sink.terminal_butt_cap(self.first_d, p);
        } else if self.current_pen_down {
            self.sink.terminal_cap(d, p);
        } else if self.pen_down_at_begin_contour && self.style.initial_cap != CapStyle::Butt {
            self.sink.initial_cap(self.first_p, self.first_d);
            self.sink.terminal_butt_cap(self.first_d, self.first_p);
        }
    }

    fn degenerate_segment(&mut self, p_i: Point, d: Vector, p_f: Point) {
        if self.current_pen_down {
            self.sink.join(self.df, p_i, d, 0.0);
            self.sink.degenerate_segment(p_i, d, p_f);
            self.df = d;
            self.pf = p_f;
        }
    }

    fn cusp(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        if self.current_pen_down {
            self.sink.cusp(d0, p, d1, w);
            self.df = d1;
            self.pf = p;
        }
    }

    fn inner_cusp(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        if self.current_pen_down {
            self.sink.inner_cusp(d0, p, d1, w);
            self.df = d1;
            self.pf = p;
        }
    }

    fn begin_segment_piece(&mut self, p: Point, d: Vector) {
        if self.current_pen_down {
            self.sink.join(self.df, p, d, 0.0);
        }
    }

    fn end_segment_piece(&mut self, _d: Vector, _p: Point) {
        // Bookkeeping only: `segment_piece` (below) already advanced
        // `pf`/`df` to the last visible stretch's end, dashing or not.
    }

    fn segment_piece(&mut self, piece: SegmentPiece) {
        let seg = from_piece(&piece);
        if self.dashing {
            let pen_down_initially = self.current_pen_down;
            self.emit_dashed(&seg, pen_down_initially);
        } else {
            let p1 = seg.to();
            let d1 = seg.end_tangent();
            self.sink.segment_piece(piece);
            self.pf = p1;
            self.df = d1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecstroke_geom::point::{point, vector};
    use vecstroke_path::style::{InnerJoinStyle, JoinStyle};

    #[derive(Default)]
    struct Recorder {
        initial_butt_caps: usize,
        terminal_butt_caps: usize,
        initial_caps: usize,
        terminal_caps: usize,
        dash_initial_caps: usize,
        dash_terminal_caps: usize,
        joins: usize,
        pieces: Vec<SegmentPiece>,
    }

    impl RegularPath for Recorder {
        fn begin_regular_contour(&mut self, _p: Point, _d: Vector) {}
        fn end_regular_open_contour(&mut self, _d: Vector, _p: Point) {}
        fn end_regular_closed_contour(&mut self, _d: Vector, _p: Point) {}
        fn degenerate_segment(&mut self, _p_i: Point, _d: Vector, _p_f: Point) {}
        fn cusp(&mut self, _d0: Vector, _p: Point, _d1: Vector, _w: f64) {}
        fn inner_cusp(&mut self, _d0: Vector, _p: Point, _d1: Vector, _w: f64) {}
        fn begin_segment_piece(&mut self, _p: Point, _d: Vector) {}
        fn end_segment_piece(&mut self, _d: Vector, _p: Point) {}
        fn segment_piece(&mut self, piece: SegmentPiece) {
            self.pieces.push(piece);
        }
    }

    impl DecoratedPath for Recorder {
        fn initial_cap(&mut self, _p: Point, _d: Vector) {
            self.initial_caps += 1;
        }
        fn terminal_cap(&mut self, _d: Vector, _p: Point) {
            self.terminal_caps += 1;
        }
        fn initial_butt_cap(&mut self, _p: Point, _d: Vector) {
            self.initial_butt_caps += 1;
        }
        fn terminal_butt_cap(&mut self, _d: Vector, _p: Point) {
            self.terminal_butt_caps += 1;
        }
        fn backward_initial_cap(&mut self, _p: Point, _d: Vector) {}
        fn backward_terminal_cap(&mut self, _d: Vector, _p: Point) {}
        fn backward_initial_butt_cap(&mut self, _p: Point, _d: Vector) {}
        fn backward_terminal_butt_cap(&mut self, _d: Vector, _p: Point) {}
        fn join(&mut self, _d0: Vector, _p: Point, _d1: Vector, _w: f64) {
            self.joins += 1;
        }
        fn inner_join(&mut self, _d0: Vector, _p: Point, _d1: Vector, _w: f64) {}
        fn dash_initial_cap(&mut self, _p: Point, _d: Vector) {
            self.dash_initial_caps += 1;
        }
        fn dash_terminal_cap(&mut self, _d: Vector, _p: Point) {
            self.dash_terminal_caps += 1;
        }
    }

    fn plain_options(width: f64) -> StrokeOptions {
        StrokeOptions::new(width)
    }

    #[test]
    fn undashed_closed_square_emits_one_join_and_no_caps() {
        let opts = plain_options(2.0);
        let mut dec = Decorator::new(Recorder::default(), &opts);
        dec.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        for (p0, d0, p1, d1) in [
            (point(0.0, 0.0), vector(1.0, 0.0), point(10.0, 0.0), vector(1.0, 0.0)),
            (point(10.0, 0.0), vector(0.0, 1.0), point(10.0, 10.0), vector(0.0, 1.0)),
        ] {
            dec.begin_segment_piece(p0, d0);
            dec.segment_piece(SegmentPiece::Linear { t_i: 0.0, t_f: 1.0, p0, p1 });
            dec.end_segment_piece(d1, p1);
        }
        dec.end_regular_closed_contour(vector(0.0, 1.0), point(10.0, 10.0));
        let rec = dec.into_sink();
        assert_eq!(rec.initial_butt_caps, 1);
        assert_eq!(rec.terminal_caps, 0);
        assert_eq!(rec.pieces.len(), 2);
        // one join between the two pieces; the closing join is folded into
        // `end_regular_closed_contour` rather than counted here.
        assert!(rec.joins >= 1);
    }

    #[test]
    fn undashed_open_contour_with_round_cap_gets_initial_and_terminal_caps() {
        let style = StrokeStyle::default().with_caps(CapStyle::Round, CapStyle::Round).with_join(JoinStyle::Round).with_inner_join(InnerJoinStyle::Round);
        let opts = plain_options(2.0).with_style(style);
        let mut dec = Decorator::new(Recorder::default(), &opts);
        dec.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        dec.begin_segment_piece(point(0.0, 0.0), vector(1.0, 0.0));
        dec.segment_piece(SegmentPiece::Linear { t_i: 0.0, t_f: 1.0, p0: point(0.0, 0.0), p1: point(10.0, 0.0) });
        dec.end_segment_piece(vector(1.0, 0.0), point(10.0, 0.0));
        dec.end_regular_open_contour(vector(1.0, 0.0), point(10.0, 0.0));
        let rec = dec.into_sink();
        assert_eq!(rec.initial_butt_caps, 1);
        assert_eq!(rec.terminal_caps, 1);
        assert_eq!(rec.initial_caps, 1);
        assert_eq!(rec.terminal_butt_caps, 1);
    }

    #[test]
    fn dashed_line_skips_the_gaps() {
        let style = StrokeStyle::default().with_dashes(&[4.0, 4.0], 0.0);
        let opts = plain_options(1.0).with_style(style);
        let mut dec = Decorator::new(Recorder::default(), &opts);
        dec.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        dec.begin_segment_piece(point(0.0, 0.0), vector(1.0, 0.0));
        dec.segment_piece(SegmentPiece::Linear { t_i: 0.0, t_f: 1.0, p0: point(0.0, 0.0), p1: point(20.0, 0.0) });
        dec.end_segment_piece(vector(1.0, 0.0), point(20.0, 0.0));
        dec.end_regular_open_contour(vector(1.0, 0.0), point(20.0, 0.0));
        let rec = dec.into_sink();
        // 20 units / (4 on + 4 off) = 2.5 dashes: 3 visible stretches.
        assert_eq!(rec.pieces.len(), 3);
    }

    #[test]
    fn fully_off_segment_emits_no_pieces() {
        let style = StrokeStyle::default().with_dashes(&[4.0, 4.0], 4.0);
        let opts = plain_options(1.0).with_style(style);
        let mut dec = Decorator::new(Recorder::default(), &opts);
        dec.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        dec.begin_segment_piece(point(0.0, 0.0), vector(1.0, 0.0));
        dec.segment_piece(SegmentPiece::Linear { t_i: 0.0, t_f: 1.0, p0: point(0.0, 0.0), p1: point(3.0, 0.0) });
        dec.end_segment_piece(vector(1.0, 0.0), point(3.0, 0.0));
        dec.end_regular_open_contour(vector(1.0, 0.0), point(3.0, 0.0));
        let rec = dec.into_sink();
        assert!(rec.pieces.is_empty());
    }
}
