#![cfg_attr(not(feature = "std"), no_std)]

//! Converts a stroked 2D path into an equivalent filled path using pure
//! Bezier arithmetic (§1): regularize each input segment, orient every
//! contour consistently, decorate it with caps/joins/dashes, simplify the
//! resulting joins against the offset curve, then thicken into fill
//! geometry.
//!
//! A thin facade over `vecstroke-geom`/`vecstroke-path`/`vecstroke-core`,
//! the way the `lyon` crate re-exports `lyon_geom`/`lyon_path`/
//! `lyon_tessellation`.

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use vecstroke_core as core;
pub use vecstroke_geom as geom;
pub use vecstroke_path as path;

pub use vecstroke_core::{finish, stroke_to_fill, Error, Pipeline, StrokeResult};
pub use vecstroke_path::{
    CapStyle, DecoratedPath, InnerJoinStyle, InputPath, JoinStyle, RegularPath, SegmentPiece, StrokeOptions, StrokeStyle,
};

#[cfg(test)]
mod tests {
    use super::*;
    use vecstroke_geom::point::{point, HPoint, Point};

    #[derive(Default)]
    struct Recorder {
        contours: usize,
    }

    impl InputPath for Recorder {
        fn begin_contour(&mut self, _p0: Point) {
            self.contours += 1;
        }
        fn end_open_contour(&mut self, _p0: Point) {}
        fn end_closed_contour(&mut self, _p0: Point) {}
        fn linear_segment(&mut self, _p0: Point, _p1: Point) {}
        fn quadratic_segment(&mut self, _p0: Point, _p1: Point, _p2: Point) {}
        fn rational_quadratic_segment(&mut self, _p0: Point, _p1: HPoint, _p2: Point) {}
        fn cubic_segment(&mut self, _p0: Point, _p1: Point, _p2: Point, _p3: Point) {}
    }

    #[test]
    fn facade_reexports_drive_a_whole_stroke() {
        let opts = StrokeOptions::new(2.0);
        let mut pipeline = stroke_to_fill(opts, Recorder::default());
        pipeline.begin_contour(point(0.0, 0.0));
        pipeline.linear_segment(point(0.0, 0.0), point(10.0, 0.0));
        pipeline.end_open_contour(point(10.0, 0.0));
        let rec = finish(pipeline);
        assert_eq!(rec.contours, 1);
    }
}
