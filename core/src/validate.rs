//! A stream-order pre-check (§7.1) ahead of the pipeline proper.
//! `stroke_to_fill` itself assumes a well-formed event stream and does not
//! check for one — wrapping a sink in [`Validator`] first catches a
//! producer bug (a segment emitted outside any contour, an unmatched
//! end-of-contour) as a [`MalformedStream`] before it reaches the geometry
//! stages, rather than letting it silently corrupt the output.

use vecstroke_geom::point::{HPoint, Point};
use vecstroke_path::events::InputPath;

use crate::error::{MalformedStream, StrokeResult};

/// Wraps an `InputPath` sink, tracking whether a contour is currently open
/// and rejecting segment/close events that arrive out of turn.
pub struct Validator<S: InputPath> {
    sink: S,
    in_contour: bool,
}

impl<S: InputPath> Validator<S> {
    pub fn new(sink: S) -> Self {
        Validator { sink, in_contour: false }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn begin_contour(&mut self, p0: Point) {
        self.in_contour = true;
        self.sink.begin_contour(p0);
    }

    fn require_open(&self) -> StrokeResult<()> {
        if !self.in_contour {
            return Err(MalformedStream::SegmentOutsideContour.into());
        }
        Ok(())
    }

    fn close(&mut self, p0: Point, closed: bool) -> StrokeResult<()> {
        if !self.in_contour {
            return Err(MalformedStream::UnmatchedEndContour.into());
        }
        self.in_contour = false;
        if closed {
            self.sink.end_closed_contour(p0);
        } else {
            self.sink.end_open_contour(p0);
        }
        Ok(())
    }

    pub fn end_open_contour(&mut self, p0: Point) -> StrokeResult<()> {
        self.close(p0, false)
    }

    pub fn end_closed_contour(&mut self, p0: Point) -> StrokeResult<()> {
        self.close(p0, true)
    }

    pub fn linear_segment(&mut self, p0: Point, p1: Point) -> StrokeResult<()> {
        self.require_open()?;
        self.sink.linear_segment(p0, p1);
        Ok(())
    }

    pub fn quadratic_segment(&mut self, p0: Point, p1: Point, p2: Point) -> StrokeResult<()> {
        self.require_open()?;
        self.sink.quadratic_segment(p0, p1, p2);
        Ok(())
    }

    pub fn rational_quadratic_segment(&mut self, p0: Point, p1: HPoint, p2: Point) -> StrokeResult<()> {
        self.require_open()?;
        self.sink.rational_quadratic_segment(p0, p1, p2);
        Ok(())
    }

    pub fn cubic_segment(&mut self, p0: Point, p1: Point, p2: Point, p3: Point) -> StrokeResult<()> {
        self.require_open()?;
        self.sink.cubic_segment(p0, p1, p2, p3);
        Ok(())
    }
}
