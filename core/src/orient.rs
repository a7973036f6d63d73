//! `regular-path-f-orient` (§4.4): buffers one contour of regular-path
//! events, computes its signed area via the shoelace formula over piece
//! endpoints, and replays it reversed when the area is negative so every
//! contour reaching `decorate` winds consistently (counterclockwise
//! positive, matching the source's convention).

use alloc::vec::Vec;

use vecstroke_geom::point::{HPoint, Point, Vector};
use vecstroke_path::events::{RegularPath, SegmentPiece};

enum Event {
    DegenerateSegment { p_i: Point, d: Vector, p_f: Point },
    Cusp { d0: Vector, p: Point, d1: Vector, w: f64 },
    InnerCusp { d0: Vector, p: Point, d1: Vector, w: f64 },
    Piece { p0: Point, d0: Vector, piece: SegmentPiece, d1: Vector, p1: Point },
}

pub struct Orienter<S: RegularPath> {
    sink: S,
    start: Point,
    start_dir: Vector,
    events: Vec<Event>,
    /// Staged `(p, d)` from `begin_segment_piece` and the `SegmentPiece`
    /// from the following `segment_piece`, completed once `end_segment_piece`
    /// supplies the end tangent/point.
    pending_piece_start: Option<(Point, Vector)>,
    pending_piece: Option<SegmentPiece>,
}

impl<S: RegularPath> Orienter<S> {
    pub fn new(sink: S) -> Self {
        Orienter {
            sink,
            start: vecstroke_geom::point::point(0.0, 0.0),
            start_dir: vecstroke_geom::point::vector(0.0, 0.0),
            events: Vec::new(),
            pending_piece_start: None,
            pending_piece: None,
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn signed_area(&self) -> f64 {
        let mut area = 0.0;
        let mut prev = self.start;
        for ev in &self.events {
            let next = match ev {
                Event::DegenerateSegment { p_f, .. } => *p_f,
                Event::Cusp { p, .. } | Event::InnerCusp { p, .. } => *p,
                Event::Piece { p1, .. } => *p1,
            };
            area += prev.x * next.y - next.x * prev.y;
            prev = next;
        }
        0.5 * area
    }

    fn flush(&mut self, close: impl FnOnce(&mut S, Vector, Point)) {
        let reverse = self.signed_area() < 0.0;
        let events = core::mem::take(&mut self.events);
        // `reverse_event` mirrors each event in place from its own stored
        // points, so two events that shared an endpoint before reversal
        // still share it afterwards — no re-threading pass is needed. The
        // new contour's start is the old contour's end, i.e. the first
        // reversed event's own start point.
        let (first_point, first_dir, ordered) = if reverse {
            let rev: Vec<Event> = events.into_iter().rev().map(reverse_event).collect();
            let first_point = rev.first().map(event_start_point).unwrap_or(self.start);
            let first_dir = rev.first().map(event_start_dir).unwrap_or(flip(self.start_dir));
            (first_point, first_dir, rev)
        } else {
            (self.start, self.start_dir, events)
        };

        self.sink.begin_regular_contour(first_point, first_dir);
        let mut end_dir = first_dir;
        let mut end_point = first_point;
        for ev in ordered {
            match ev {
                Event::DegenerateSegment { p_i, d, p_f } => {
                    self.sink.degenerate_segment(p_i, d, p_f);
                    end_point = p_f;
                }
                Event::Cusp { d0, p, d1, w } => {
                    self.sink.cusp(d0, p, d1, w);
                    end_point = p;
                    end_dir = d1;
                }
                Event::InnerCusp { d0, p, d1, w } => {
                    self.sink.inner_cusp(d0, p, d1, w);
                    end_point = p;
                    end_dir = d1;
                }
                Event::Piece { p0, d0, piece, d1, p1 } => {
                    self.sink.begin_segment_piece(p0, d0);
                    self.sink.segment_piece(piece);
                    self.sink.end_segment_piece(d1, p1);
                    end_point = p1;
                    end_dir = d1;
                }
            }
        }
        close(&mut self.sink, end_dir, end_point);
    }

}

impl<S: RegularPath> RegularPath for Orienter<S> {
    fn begin_regular_contour(&mut self, p: Point, d: Vector) {
        self.start = p;
        self.start_dir = d;
        self.events.clear();
    }

    fn end_regular_open_contour(&mut self, d: Vector, p: Point) {
        let _ = (d, p);
        self.flush(|sink, d, p| sink.end_regular_open_contour(d, p));
    }

    fn end_regular_closed_contour(&mut self, d: Vector, p: Point) {
        let _ = (d, p);
        self.flush(|sink, d, p| sink.end_regular_closed_contour(d, p));
    }

    fn degenerate_segment(&mut self, p_i: Point, d: Vector, p_f: Point) {
        self.events.push(Event::DegenerateSegment { p_i, d, p_f });
    }

    fn cusp(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        self.events.push(Event::Cusp { d0, p, d1, w });
    }

    fn inner_cusp(&mut self, d0: Vector, p: Point, d1: Vector, w: f64) {
        self.events.push(Event::InnerCusp { d0, p, d1, w });
    }

    fn begin_segment_piece(&mut self, p: Point, d: Vector) {
        self.pending_piece_start = Some((p, d));
    }

    fn end_segment_piece(&mut self, d1: Vector, p1: Point) {
        if let (Some((p0, d0)), Some(piece)) = (self.pending_piece_start.take(), self.pending_piece.take()) {
            self.events.push(Event::Piece { p0, d0, piece, d1, p1 });
        }
    }

    fn segment_piece(&mut self, piece: SegmentPiece) {
        self.pending_piece = Some(piece);
    }
}

fn flip(v: Vector) -> Vector {
    vecstroke_geom::point::vector(-v.x, -v.y)
}

fn event_start_point(ev: &Event) -> Point {
    match ev {
        Event::DegenerateSegment { p_i, .. } => *p_i,
        Event::Cusp { p, .. } | Event::InnerCusp { p, .. } => *p,
        Event::Piece { p0, .. } => *p0,
    }
}

fn event_start_dir(ev: &Event) -> Vector {
    match ev {
        Event::DegenerateSegment { d, .. } => *d,
        Event::Cusp { d0, .. } | Event::InnerCusp { d0, .. } => *d0,
        Event::Piece { d0, .. } => *d0,
    }
}

fn reverse_event(ev: Event) -> Event {
    match ev {
        Event::DegenerateSegment { p_i, d, p_f } => Event::DegenerateSegment { p_i: p_f, d: flip(d), p_f: p_i },
        Event::Cusp { d0, p, d1, w } => Event::Cusp { d0: flip(d1), p, d1: flip(d0), w },
        Event::InnerCusp { d0, p, d1, w } => Event::InnerCusp { d0: flip(d1), p, d1: flip(d0), w },
        Event::Piece { p0, d0, piece, d1, p1 } => Event::Piece { p0: p1, d0: flip(d1), piece: reverse_piece(piece), d1: flip(d0), p1: p0 },
    }
}

fn reverse_piece(piece: SegmentPiece) -> SegmentPiece {
    match piece {
        SegmentPiece::Linear { t_i, t_f, p0, p1 } => SegmentPiece::Linear { t_i: 1.0 - t_f, t_f: 1.0 - t_i, p0: p1, p1: p0 },
        SegmentPiece::Quadratic { t_i, t_f, p0, p1, p2 } => SegmentPiece::Quadratic { t_i: 1.0 - t_f, t_f: 1.0 - t_i, p0: p2, p1, p2: p0 },
        SegmentPiece::RationalQuadratic { t_i, t_f, p0, p1, p2 } => {
            SegmentPiece::RationalQuadratic { t_i: 1.0 - t_f, t_f: 1.0 - t_i, p0: p2, p1: reverse_hpoint(p1), p2: p0 }
        }
        SegmentPiece::Cubic { t_i, t_f, p0, p1, p2, p3 } => SegmentPiece::Cubic { t_i: 1.0 - t_f, t_f: 1.0 - t_i, p0: p3, p1: p2, p2: p1, p3: p0 },
    }
}

fn reverse_hpoint(h: HPoint) -> HPoint {
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecstroke_geom::point::{point, vector};

    #[derive(Default)]
    struct Recorder {
        begins: Vec<Point>,
        pieces: Vec<SegmentPiece>,
    }

    impl RegularPath for Recorder {
        fn begin_regular_contour(&mut self, p: Point, _d: Vector) {
            self.begins.push(p);
        }
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

    fn emit_piece(o: &mut Orienter<Recorder>, p0: Point, d0: Vector, p1: Point, d1: Vector) {
        o.begin_segment_piece(p0, d0);
        o.segment_piece(SegmentPiece::Linear { t_i: 0.0, t_f: 1.0, p0, p1 });
        o.end_segment_piece(d1, p1);
    }

    #[test]
    fn counterclockwise_square_is_left_unreversed() {
        let mut o = Orienter::new(Recorder::default());
        o.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        emit_piece(&mut o, point(0.0, 0.0), vector(1.0, 0.0), point(10.0, 0.0), vector(1.0, 0.0));
        emit_piece(&mut o, point(10.0, 0.0), vector(0.0, 1.0), point(10.0, 10.0), vector(0.0, 1.0));
        emit_piece(&mut o, point(10.0, 10.0), vector(-1.0, 0.0), point(0.0, 10.0), vector(-1.0, 0.0));
        emit_piece(&mut o, point(0.0, 10.0), vector(0.0, -1.0), point(0.0, 0.0), vector(0.0, -1.0));
        o.end_regular_closed_contour(vector(0.0, -1.0), point(0.0, 0.0));
        let rec = o.into_sink();
        assert_eq!(rec.begins[0], point(0.0, 0.0));
        assert_eq!(rec.pieces.len(), 4);
    }

    #[test]
    fn clockwise_square_is_reversed() {
        let mut o = Orienter::new(Recorder::default());
        o.begin_regular_contour(point(0.0, 0.0), vector(0.0, 1.0));
        emit_piece(&mut o, point(0.0, 0.0), vector(0.0, 1.0), point(0.0, 10.0), vector(0.0, 1.0));
        emit_piece(&mut o, point(0.0, 10.0), vector(1.0, 0.0), point(10.0, 10.0), vector(1.0, 0.0));
        emit_piece(&mut o, point(10.0, 10.0), vector(0.0, -1.0), point(10.0, 0.0), vector(0.0, -1.0));
        emit_piece(&mut o, point(10.0, 0.0), vector(-1.0, 0.0), point(0.0, 0.0), vector(-1.0, 0.0));
        o.end_regular_closed_contour(vector(-1.0, 0.0), point(0.0, 0.0));
        let rec = o.into_sink();
        assert_eq!(rec.pieces.len(), 4);
        // First emitted piece after reversal should start at the old end (0,0)
        // and head in the direction opposite the original first piece.
        if let SegmentPiece::Linear { p0, p1, .. } = rec.pieces[0] {
            assert_eq!(p0, point(0.0, 0.0));
            assert_eq!(p1, point(10.0, 0.0));
        } else {
            panic!("expected linear piece");
        }
    }

    /// An open contour's reversed start must be the old end point, not the
    /// old start (a closed contour can't distinguish the two).
    #[test]
    fn open_clockwise_path_reverses_to_start_at_the_old_end() {
        let mut o = Orienter::new(Recorder::default());
        o.begin_regular_contour(point(0.0, 0.0), vector(1.0, 0.0));
        emit_piece(&mut o, point(0.0, 0.0), vector(1.0, 0.0), point(10.0, 0.0), vector(1.0, 0.0));
        emit_piece(&mut o, point(10.0, 0.0), vector(0.0, -1.0), point(10.0, -10.0), vector(0.0, -1.0));
        o.end_regular_open_contour(vector(0.0, -1.0), point(10.0, -10.0));
        let rec = o.into_sink();
        assert_eq!(rec.begins[0], point(10.0, -10.0));
        assert_eq!(rec.pieces.len(), 2);
        if let SegmentPiece::Linear { p0, p1, .. } = rec.pieces[0] {
            assert_eq!(p0, point(10.0, -10.0));
            assert_eq!(p1, point(10.0, 0.0));
        } else {
            panic!("expected linear piece");
        }
    }
}
