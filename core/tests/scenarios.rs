//! End-to-end scenarios and cross-cutting invariants for the whole
//! stroke-to-fill pipeline, driven only through the public `InputPath`/
//! `stroke_to_fill`/`finish` surface.

use vecstroke_core::{finish, stroke_to_fill};
use vecstroke_geom::bezier::Bezier;
use vecstroke_geom::point::{point, HPoint, Point};
use vecstroke_path::events::InputPath;
use vecstroke_path::style::{CapStyle, JoinStyle, StrokeOptions, StrokeStyle};

/// Records every output contour as a polyline, flattening curved
/// primitives by direct de Casteljau sampling so tests can measure area
/// and vertex counts without reaching into the pipeline's internals.
#[derive(Default)]
struct Flattener {
    contours: Vec<Vec<Point>>,
    closed: Vec<bool>,
    cur: Vec<Point>,
}

const FLATTEN_STEPS: usize = 24;

impl Flattener {
    fn push(&mut self, p: Point) {
        self.cur.push(p);
    }

    fn finish_contour(&mut self, closed: bool) {
        self.contours.push(core::mem::take(&mut self.cur));
        self.closed.push(closed);
    }
}

impl InputPath for Flattener {
    fn begin_contour(&mut self, p0: Point) {
        self.cur.clear();
        self.cur.push(p0);
    }

    fn end_open_contour(&mut self, _p0: Point) {
        self.finish_contour(false);
    }

    fn end_closed_contour(&mut self, _p0: Point) {
        self.finish_contour(true);
    }

    fn linear_segment(&mut self, _p0: Point, p1: Point) {
        self.push(p1);
    }

    fn quadratic_segment(&mut self, p0: Point, p1: Point, p2: Point) {
        let b = Bezier::quadratic(p0, p1, p2);
        for i in 1..=FLATTEN_STEPS {
            self.push(b.evaluate_decasteljau(i as f64 / FLATTEN_STEPS as f64));
        }
    }

    fn rational_quadratic_segment(&mut self, p0: Point, p1: HPoint, p2: Point) {
        let b = Bezier::quadratic(HPoint::from_point(p0), p1, HPoint::from_point(p2));
        for i in 1..=FLATTEN_STEPS {
            let t = i as f64 / FLATTEN_STEPS as f64;
            self.push(b.evaluate_decasteljau(t).project());
        }
    }

    fn cubic_segment(&mut self, p0: Point, p1: Point, p2: Point, p3: Point) {
        let b = Bezier::cubic(p0, p1, p2, p3);
        for i in 1..=FLATTEN_STEPS {
            self.push(b.evaluate_decasteljau(i as f64 / FLATTEN_STEPS as f64));
        }
    }
}

fn shoelace_area(poly: &[Point]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    0.5 * sum.abs()
}

fn run(opts: StrokeOptions, build: impl FnOnce(&mut dyn InputPath)) -> Flattener {
    let pipeline = stroke_to_fill(opts, Flattener::default());
    let mut pipeline = pipeline;
    build(&mut pipeline);
    finish(pipeline)
}

// 1. Square stroke with miter_or_bevel join, limit 4, butt caps: two
// nested closed squares, 12x12 outer and 8x8 inner.
#[test]
fn closed_square_stroke_yields_two_nested_squares() {
    let style = StrokeStyle::default().with_join(JoinStyle::MiterOrBevel).with_miter_limit(4.0);
    let opts = StrokeOptions::new(2.0).with_style(style);
    let out = run(opts, |p| {
        p.begin_contour(point(0.0, 0.0));
        p.linear_segment(point(0.0, 0.0), point(10.0, 0.0));
        p.linear_segment(point(10.0, 0.0), point(10.0, 10.0));
        p.linear_segment(point(10.0, 10.0), point(0.0, 10.0));
        p.linear_segment(point(0.0, 10.0), point(0.0, 0.0));
        p.end_closed_contour(point(0.0, 0.0));
    });

    assert_eq!(out.contours.len(), 2);
    assert!(out.closed.iter().all(|&c| c));

    let mut areas: Vec<f64> = out.contours.iter().map(|c| shoelace_area(c)).collect();
    areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((areas[0] - 64.0).abs() < 0.5, "inner area {}", areas[0]);
    assert!((areas[1] - 144.0).abs() < 0.5, "outer area {}", areas[1]);
}

// 2. Round-capped segment: one closed contour, area = rectangle + full
// circle (two half-circle caps).
#[test]
fn round_capped_segment_yields_rectangle_plus_circle_area() {
    let style = StrokeStyle::default().with_caps(CapStyle::Round, CapStyle::Round);
    let opts = StrokeOptions::new(2.0).with_style(style);
    let out = run(opts, |p| {
        p.begin_contour(point(0.0, 0.0));
        p.linear_segment(point(0.0, 0.0), point(10.0, 0.0));
        p.end_open_contour(point(10.0, 0.0));
    });

    assert_eq!(out.contours.len(), 1);
    assert!(out.closed[0]);
    let area = shoelace_area(&out.contours[0]);
    let expected = 20.0 + core::f64::consts::PI;
    assert!((area - expected).abs() < 0.3, "area {} expected {}", area, expected);
}

// 3. Dashed segment of length 10, pattern [2, 1]: three full 2x2 dashes
// plus a closing partial dash, total fill area 7 (width 1 used so dash
// rectangles are 2 long x 1 wide... width chosen as 1 below so areas are
// exactly dash-length * width).
#[test]
fn dashed_segment_area_matches_dash_pattern_coverage() {
    let style = StrokeStyle::default().with_dashes(&[2.0, 1.0], 0.0);
    let opts = StrokeOptions::new(1.0).with_style(style);
    let out = run(opts, |p| {
        p.begin_contour(point(0.0, 0.0));
        p.linear_segment(point(0.0, 0.0), point(10.0, 0.0));
        p.end_open_contour(point(10.0, 0.0));
    });

    // Pattern [2,1] over length 10 starting at offset 0: dash covers
    // [0,2],[3,5],[6,8],[9,10] (a trailing partial dash of length 1).
    let total_dash_length = 2.0 + 2.0 + 2.0 + 1.0;
    let expected_area = total_dash_length * 1.0;
    let total_area: f64 = out.contours.iter().map(|c| shoelace_area(c)).sum();
    assert!((total_area - expected_area).abs() < 0.5, "area {} expected {}", total_area, expected_area);
    assert!(out.contours.len() >= 3);
}

// 4. Quadratic offset approximated within tolerance of the analytic
// offset at several sample parameters.
#[test]
fn quadratic_stroke_edge_tracks_analytic_offset() {
    let opts = StrokeOptions::new(2.0).with_tolerance(0.01);
    let out = run(opts, |p| {
        p.begin_contour(point(0.0, 0.0));
        p.quadratic_segment(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
        p.end_open_contour(point(10.0, 0.0));
    });

    assert_eq!(out.contours.len(), 1);
    // The flattened fill contour must stay within a bounded band around
    // the base curve: every vertex should be no farther than offset plus
    // slack from the nearest sampled base-curve point.
    let base = Bezier::quadratic(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    let offset = 1.0;
    let mut samples = Vec::new();
    for i in 0..=200 {
        samples.push(base.evaluate_decasteljau(i as f64 / 200.0));
    }
    for v in &out.contours[0] {
        let mut best = f64::MAX;
        for s in &samples {
            let d = ((v.x - s.x).powi(2) + (v.y - s.y).powi(2)).sqrt();
            if d < best {
                best = d;
            }
        }
        assert!(best < offset + 0.2, "vertex {:?} too far from base curve (dist {})", v, best);
    }
}

// 5. Miter-limit switch: a sharp join is mitered when the limit is
// generous and bevels when the limit is tight.
#[test]
fn miter_limit_switches_between_miter_and_bevel() {
    let build = |p: &mut dyn InputPath| {
        p.begin_contour(point(0.0, 0.0));
        p.linear_segment(point(0.0, 0.0), point(10.0, 0.0));
        p.linear_segment(point(10.0, 0.0), point(10.0, 1.0));
        p.end_open_contour(point(10.0, 1.0));
    };

    let wide_style = StrokeStyle::default().with_join(JoinStyle::MiterOrBevel).with_miter_limit(10.0);
    let wide = run(StrokeOptions::new(0.4).with_style(wide_style), build);

    let tight_style = StrokeStyle::default().with_join(JoinStyle::MiterOrBevel).with_miter_limit(1.0);
    let tight = run(StrokeOptions::new(0.4).with_style(tight_style), build);

    // A generous limit lets the spike extend past the tight limit's
    // bevel, so the mitered contour's bounding area must be larger.
    let area_wide = shoelace_area(&wide.contours[0]);
    let area_tight = shoelace_area(&tight.contours[0]);
    assert!(area_wide >= area_tight - 1e-9);
}

// 6. Serpentine cubic with two inflections still produces a single
// closed fill contour (the regularizer splits the curve internally, but
// the decorator keeps the whole thing as one cap-delimited run).
#[test]
fn serpentine_cubic_produces_one_contour() {
    let opts = StrokeOptions::new(1.0);
    let out = run(opts, |p| {
        p.begin_contour(point(0.0, 0.0));
        p.cubic_segment(point(0.0, 0.0), point(10.0, 10.0), point(0.0, -10.0), point(10.0, 0.0));
        p.end_open_contour(point(10.0, 0.0));
    });
    assert_eq!(out.contours.len(), 1);
    assert!(out.closed[0]);
}

// Invariant: stroking at width 0 produces no output contours.
#[test]
fn zero_width_stroke_is_empty() {
    let opts = StrokeOptions::new(0.0);
    let out = run(opts, |p| {
        p.begin_contour(point(0.0, 0.0));
        p.linear_segment(point(0.0, 0.0), point(10.0, 0.0));
        p.end_open_contour(point(10.0, 0.0));
    });
    assert!(out.contours.is_empty() || out.contours.iter().all(|c| shoelace_area(c) < 1e-9));
}

// Round-trip law: stroking a straight segment with butt caps and no
// dashes produces a closed rectangle of area L*w.
#[test]
fn straight_butt_capped_segment_is_an_exact_rectangle() {
    let opts = StrokeOptions::new(2.0);
    let out = run(opts, |p| {
        p.begin_contour(point(0.0, 0.0));
        p.linear_segment(point(0.0, 0.0), point(10.0, 0.0));
        p.end_open_contour(point(10.0, 0.0));
    });
    assert_eq!(out.contours.len(), 1);
    let area = shoelace_area(&out.contours[0]);
    assert!((area - 20.0).abs() < 1e-6, "area {}", area);
}

// Boundary behavior: a 180 degree join chooses bevel under
// miter_or_bevel (the miter spike would be infinite) and a half-circle
// under round.
#[test]
fn u_turn_join_bevels_under_miter_or_bevel() {
    let style = StrokeStyle::default().with_join(JoinStyle::MiterOrBevel).with_miter_limit(4.0);
    let opts = StrokeOptions::new(2.0).with_style(style);
    let out = run(opts, |p| {
        p.begin_contour(point(0.0, 0.0));
        p.linear_segment(point(0.0, 0.0), point(10.0, 0.0));
        p.linear_segment(point(10.0, 0.0), point(0.0, 0.0));
        p.end_open_contour(point(0.0, 0.0));
    });
    assert_eq!(out.contours.len(), 1);
    // A u-turn bevel/cap should keep the outline within a bounded band
    // around the centerline (no runaway miter spike).
    for v in &out.contours[0] {
        assert!(v.x >= -1.5 && v.x <= 11.5, "vertex {:?} escaped expected band", v);
        assert!(v.y.abs() <= 1.5, "vertex {:?} escaped expected band", v);
    }
}
