//! The segment representation threaded through `regularize`, `decorate`,
//! `join` and `thicken`: a small enum over the four kinds the input stream
//! carries, with a uniform `sample`/`derivative`/`second_derivative` API
//! grounded on the teacher's `Segment` trait (`from`/`to`/`sample`/
//! `derivative`/`split`), generalized to the rational-quadratic case via the
//! quotient rule.

use arrayvec::ArrayVec;

use vecstroke_geom::bezier::Bezier;
use vecstroke_geom::point::{as_vector, HPoint, Point, Vector};
use vecstroke_path::events::SegmentPiece;

/// One input segment, restricted (via `cut`) to whatever sub-range of its
/// original parameter the caller is currently working with.
#[derive(Clone, Debug)]
pub enum Segment {
    Linear(Bezier<Point>),
    Quadratic(Bezier<Point>),
    RationalQuadratic(Bezier<HPoint>),
    Cubic(Bezier<Point>),
}

impl Segment {
    pub fn from(&self) -> Point {
        self.sample(0.0)
    }

    pub fn to(&self) -> Point {
        self.sample(1.0)
    }

    pub fn sample(&self, t: f64) -> Point {
        match self {
            Segment::RationalQuadratic(b) => {
                let h = b.evaluate_decasteljau(t);
                debug_assert!(!h.is_almost_ideal(vecstroke_geom::numeric::DEFAULT_ULP));
                h.project()
            }
            Segment::Linear(b) | Segment::Quadratic(b) | Segment::Cubic(b) => b.evaluate_decasteljau(t),
        }
    }

    /// First derivative, as a direction (not normalized).
    pub fn derivative(&self, t: f64) -> Vector {
        match self {
            Segment::RationalQuadratic(b) => rational_derivative(b, t).0,
            Segment::Linear(b) | Segment::Quadratic(b) | Segment::Cubic(b) => as_vector(b.derivative().evaluate_decasteljau(t)),
        }
    }

    /// Second derivative.
    pub fn second_derivative(&self, t: f64) -> Vector {
        match self {
            Segment::RationalQuadratic(b) => rational_derivative(b, t).1,
            Segment::Linear(b) => {
                let _ = b;
                vecstroke_geom::point::vector(0.0, 0.0)
            }
            Segment::Quadratic(b) | Segment::Cubic(b) => as_vector(b.derivative().derivative().evaluate_decasteljau(t)),
        }
    }

    pub fn degree(&self) -> usize {
        match self {
            Segment::Linear(_) => 1,
            Segment::Quadratic(_) | Segment::RationalQuadratic(_) => 2,
            Segment::Cubic(_) => 3,
        }
    }

    pub fn is_rational(&self) -> bool {
        matches!(self, Segment::RationalQuadratic(_))
    }

    /// Restricts this segment to `[a,b]` (in its own current parameter
    /// space), the way `Bezier::cut` restricts a plain polynomial curve.
    pub fn cut(&self, a: f64, b: f64) -> Segment {
        match self {
            Segment::Linear(c) => Segment::Linear(c.cut(a, b)),
            Segment::Quadratic(c) => Segment::Quadratic(c.cut(a, b)),
            Segment::Cubic(c) => Segment::Cubic(c.cut(a, b)),
            Segment::RationalQuadratic(c) => Segment::RationalQuadratic(c.cut(a, b)),
        }
    }

    pub fn split(&self, t: f64) -> (Segment, Segment) {
        (self.cut(0.0, t), self.cut(t, 1.0))
    }

    /// `d0`: direction into the segment at `t = 0`. Falls back to the second
    /// derivative at a starting cusp where the first vanishes (§4.2.2).
    pub fn start_tangent(&self) -> Vector {
        tangent_with_fallback(self.derivative(0.0), self.second_derivative(0.0))
    }

    pub fn end_tangent(&self) -> Vector {
        tangent_with_fallback(self.derivative(1.0), self.second_derivative(1.0))
    }
}

/// Rebuilds the `Segment` a [`SegmentPiece`] was cut from, local to its own
/// `[0,1]`: the `t_i`/`t_f` fields carried on a piece are bookkeeping against
/// the original segment, not needed to evaluate the piece itself.
pub fn from_piece(piece: &SegmentPiece) -> Segment {
    match *piece {
        SegmentPiece::Linear { p0, p1, .. } => Segment::Linear(Bezier::line(p0, p1)),
        SegmentPiece::Quadratic { p0, p1, p2, .. } => Segment::Quadratic(Bezier::quadratic(p0, p1, p2)),
        SegmentPiece::RationalQuadratic { p0, p1, p2, .. } => {
            Segment::RationalQuadratic(Bezier::quadratic(HPoint::from_point(p0), p1, HPoint::from_point(p2)))
        }
        SegmentPiece::Cubic { p0, p1, p2, p3, .. } => Segment::Cubic(Bezier::cubic(p0, p1, p2, p3)),
    }
}

/// Packages `seg` as a [`SegmentPiece`], tagging it with the `[t_i,t_f]`
/// range it occupies in whatever larger segment it was cut from (purely for
/// downstream bookkeeping; `seg`'s own control points already evaluate
/// correctly over its local `[0,1]`).
pub fn to_piece(seg: &Segment, t_i: f64, t_f: f64) -> SegmentPiece {
    match seg {
        Segment::Linear(b) => SegmentPiece::Linear { t_i, t_f, p0: b.points[0], p1: b.points[1] },
        Segment::Quadratic(b) => SegmentPiece::Quadratic { t_i, t_f, p0: b.points[0], p1: b.points[1], p2: b.points[2] },
        Segment::Cubic(b) => SegmentPiece::Cubic { t_i, t_f, p0: b.points[0], p1: b.points[1], p2: b.points[2], p3: b.points[3] },
        Segment::RationalQuadratic(b) => SegmentPiece::RationalQuadratic { t_i, t_f, p0: b.points[0].project(), p1: b.points[1], p2: b.points[2].project() },
    }
}

fn tangent_with_fallback(d: Vector, dd: Vector) -> Vector {
    vecstroke_geom::curvature::tangent_direction(d, dd)
}

/// Quotient-rule derivative of a rational quadratic: position is `(x,y)/w`;
/// `d/dt (n/w) = (n' w - n w') / w^2`, applied twice for the second
/// derivative.
fn rational_derivative(b: &Bezier<HPoint>, t: f64) -> (Vector, Vector) {
    let n: Bezier<Point> = Bezier::new(b.points.iter().map(|h| vecstroke_geom::point::point(h.x, h.y)).collect::<ArrayVec<Point, 4>>());
    let w: Bezier<f64> = Bezier::new(b.points.iter().map(|h| h.w).collect::<ArrayVec<f64, 4>>());

    let n0 = n.evaluate_decasteljau(t);
    let w0 = w.evaluate_decasteljau(t);
    let n1 = as_vector(n.derivative().evaluate_decasteljau(t));
    let w1 = w.derivative().evaluate_decasteljau(t);
    let n2 = as_vector(n.derivative().derivative().evaluate_decasteljau(t));
    let w2 = w.derivative().derivative().evaluate_decasteljau(t);

    let w0_2 = w0 * w0;
    let d1 = vecstroke_geom::point::vector((n1.x * w0 - n0.x * w1) / w0_2, (n1.y * w0 - n0.y * w1) / w0_2);

    // Second derivative of n/w via the quotient rule applied to n'/w - n*w'/w^2.
    let term_a = vecstroke_geom::point::vector((n2.x * w0 - n0.x * w2) / w0_2, (n2.y * w0 - n0.y * w2) / w0_2);
    let term_b = vecstroke_geom::point::vector(2.0 * w1 * d1.x / w0, 2.0 * w1 * d1.y / w0);
    let d2 = vecstroke_geom::point::vector(term_a.x - term_b.x, term_a.y - term_b.y);
    (d1, d2)
}
