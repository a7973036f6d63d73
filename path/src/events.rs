//! Event-stream contracts (§2/§3/§6). Each family below is an independent
//! trait a pipeline stage can implement; a stage that only cares about a
//! subset of a family's events owns a typed sink and forwards the rest to it
//! explicitly, the way [`NoAttributes`] forwards unhandled `PathBuilder`
//! calls to its inner builder in the teacher crate — there is no implicit
//! default-forwarding magic here, every stage's `impl` says exactly what it
//! does with each event.

use vecstroke_geom::{HPoint, Point, Vector};

/// The input event stream (§3, §6's external interface in both directions):
/// `begin_contour`, the two end-of-contour variants, and one event per
/// segment kind.
pub trait InputPath {
    fn begin_contour(&mut self, p0: Point);
    fn end_open_contour(&mut self, p0: Point);
    fn end_closed_contour(&mut self, p0: Point);
    fn linear_segment(&mut self, p0: Point, p1: Point);
    fn quadratic_segment(&mut self, p0: Point, p1: Point, p2: Point);
    /// `p1` carries the rational quadratic's middle control point in
    /// homogeneous form; `p0`/`p2` are affine endpoints (`w == 1`).
    fn rational_quadratic_segment(&mut self, p0: Point, p1: HPoint, p2: Point);
    fn cubic_segment(&mut self, p0: Point, p1: Point, p2: Point, p3: Point);
}

/// A segment restricted to a parameter subinterval, as emitted by the
/// regularization filter's `{kind}_segment_piece` events (§3).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SegmentPiece {
    Linear { t_i: f64, t_f: f64, p0: Point, p1: Point },
    Quadratic { t_i: f64, t_f: f64, p0: Point, p1: Point, p2: Point },
    RationalQuadratic { t_i: f64, t_f: f64, p0: Point, p1: HPoint, p2: Point },
    Cubic { t_i: f64, t_f: f64, p0: Point, p1: Point, p2: Point, p3: Point },
}

/// The regular path event stream (§3): regular pieces, cusps and degenerate
/// segments, bracketed by `begin`/`end_regular_*_contour`.
pub trait RegularPath {
    fn begin_regular_contour(&mut self, p: Point, d: Vector);
    fn end_regular_open_contour(&mut self, d: Vector, p: Point);
    fn end_regular_closed_contour(&mut self, d: Vector, p: Point);
    fn degenerate_segment(&mut self, p_i: Point, d: Vector, p_f: Point);
    /// `w` is the classification weight: `1` means "unresolved, let
    /// simplify-joins decide" (§4.3).
    fn cusp(&mut self, d0: Vector, p: Point, d1: Vector, w: f64);
    fn inner_cusp(&mut self, d0: Vector, p: Point, d1: Vector, w: f64);
    fn begin_segment_piece(&mut self, p: Point, d: Vector);
    fn end_segment_piece(&mut self, d: Vector, p: Point);
    fn segment_piece(&mut self, piece: SegmentPiece);
}

/// The decorated path event stream (§3): regular-path events plus caps and
/// joins. A decorator owns a `RegularPath`-consuming sink "one level up" in
/// the sense that the segment-piece/cusp vocabulary is unchanged; only caps
/// and joins are new here.
pub trait DecoratedPath {
    fn initial_cap(&mut self, p: Point, d: Vector);
    fn terminal_cap(&mut self, d: Vector, p: Point);
    fn initial_butt_cap(&mut self, p: Point, d: Vector);
    fn terminal_butt_cap(&mut self, d: Vector, p: Point);
    fn backward_initial_cap(&mut self, p: Point, d: Vector);
    fn backward_terminal_cap(&mut self, d: Vector, p: Point);
    fn backward_initial_butt_cap(&mut self, p: Point, d: Vector);
    fn backward_terminal_butt_cap(&mut self, d: Vector, p: Point);
    fn join(&mut self, d0: Vector, p: Point, d1: Vector, w: f64);
    fn inner_join(&mut self, d0: Vector, p: Point, d1: Vector, w: f64);
    /// Cap opening a visible dash run, styled by `dash_initial_cap` rather
    /// than the contour-level `initial_cap`.
    fn dash_initial_cap(&mut self, p: Point, d: Vector);
    /// Cap closing a visible dash run, styled by `dash_terminal_cap`.
    fn dash_terminal_cap(&mut self, d: Vector, p: Point);
}

/// `find-monotonic-parameters` events: roots of the coordinate derivatives.
pub trait MonotonicParams {
    fn root_dx_parameter(&mut self, t: f64);
    fn root_dy_parameter(&mut self, t: f64);
    fn root_dw_parameter(&mut self, t: f64);
}

/// `find-cubic-parameters` events: inflection and double-point parameters.
pub trait CubicParams {
    fn inflection_parameter(&mut self, t: f64);
    fn double_point_parameter(&mut self, t: f64);
}

/// `find-offsetting-parameters` events.
pub trait OffsettingParams {
    fn offset_cusp_parameter(&mut self, t: f64);
    fn evolute_cusp_parameter(&mut self, t: f64);
}

/// `find-join-parameters` events, emitted by the join simplifier's local
/// search (§4.2.3, §4.6).
pub trait JoinParams {
    fn join_tangent_parameter(&mut self, t: f64);
    fn join_vertex_parameter(&mut self, t: f64);
}

/// Dashing parameter events (§4.5), including the backward variants used
/// while replaying a contour's reversed pass.
pub trait DashingParams {
    fn begin_dash_parameter(&mut self, t: f64);
    fn end_dash_parameter(&mut self, t: f64);
    fn backward_begin_dash_parameter(&mut self, t: f64);
    fn backward_end_dash_parameter(&mut self, t: f64);
}
