//! The stroke style configuration bundle (§3, §9.4): a single `Copy` record
//! threaded immutably through the pipeline, the way
//! `lyon_tessellation::StrokeOptions` is constructed once and passed down
//! into the tessellator.

use arrayvec::ArrayVec;

/// Maximum number of entries in a dash pattern this crate supports.
pub const MAX_DASHES: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum CapStyle {
    Butt,
    Round,
    Square,
    Triangle,
    Fletching,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinStyle {
    Round,
    Bevel,
    MiterClip,
    MiterOrBevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum InnerJoinStyle {
    Round,
    Bevel,
}

/// The `stroke_style` record (§3). Derives `Serialize`/`Deserialize` behind
/// `serialization` so a style can be saved alongside a document rather than
/// rebuilt from code every time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct StrokeStyle {
    pub join: JoinStyle,
    pub inner_join: InnerJoinStyle,
    pub initial_cap: CapStyle,
    pub terminal_cap: CapStyle,
    pub dash_initial_cap: CapStyle,
    pub dash_terminal_cap: CapStyle,
    pub miter_limit: f64,
    pub dashes: ArrayVec<f64, MAX_DASHES>,
    pub dash_offset: f64,
    pub resets_on_move: bool,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        StrokeStyle {
            join: JoinStyle::MiterOrBevel,
            inner_join: InnerJoinStyle::Round,
            initial_cap: CapStyle::Butt,
            terminal_cap: CapStyle::Butt,
            dash_initial_cap: CapStyle::Butt,
            dash_terminal_cap: CapStyle::Butt,
            miter_limit: 4.0,
            dashes: ArrayVec::new(),
            dash_offset: 0.0,
            resets_on_move: true,
        }
    }
}

impl StrokeStyle {
    pub fn with_join(mut self, join: JoinStyle) -> Self {
        self.join = join;
        self
    }

    pub fn with_inner_join(mut self, inner_join: InnerJoinStyle) -> Self {
        self.inner_join = inner_join;
        self
    }

    pub fn with_caps(mut self, initial: CapStyle, terminal: CapStyle) -> Self {
        self.initial_cap = initial;
        self.terminal_cap = terminal;
        self
    }

    pub fn with_dash_caps(mut self, initial: CapStyle, terminal: CapStyle) -> Self {
        self.dash_initial_cap = initial;
        self.dash_terminal_cap = terminal;
        self
    }

    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        debug_assert!(miter_limit >= 1.0);
        self.miter_limit = miter_limit;
        self
    }

    pub fn with_dashes(mut self, dashes: &[f64], offset: f64) -> Self {
        self.dashes = dashes.iter().copied().collect();
        self.dash_offset = offset;
        self
    }

    pub fn has_dashes(&self) -> bool {
        !self.dashes.is_empty() && self.dashes.iter().any(|&d| d > 0.0)
    }

    pub fn dash_pattern_length(&self) -> f64 {
        self.dashes.iter().sum()
    }
}

/// Every configuration input the pipeline needs at construction time (§6):
/// the stroke style, the width, and the numerical tolerances. Constructed
/// once per `stroke_to_fill` call and passed down by reference or by value
/// (it is `Clone`, not `Copy`, only because `StrokeStyle` carries a
/// variable-length dash pattern).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct StrokeOptions {
    pub style: StrokeStyle,
    pub width: f64,
    /// Absolute approximation tolerance, in output-coordinate units.
    pub ftol: f64,
    /// Angular regularity tolerance, in radians.
    pub alpha: f64,
    /// Numerical regularity tolerance.
    pub delta: f64,
    /// Offset-cusp tolerance.
    pub ptol: f64,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        StrokeOptions {
            style: StrokeStyle::default(),
            width: 1.0,
            ftol: 0.01,
            alpha: vecstroke_geom::numeric::radians(0.5),
            delta: 32.0 * f64::EPSILON,
            ptol: 0.2,
        }
    }
}

impl StrokeOptions {
    pub fn new(width: f64) -> Self {
        debug_assert!(width >= 0.0);
        StrokeOptions { width, ..Default::default() }
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_tolerance(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    pub fn with_angular_tolerance_degrees(mut self, degrees: f64) -> Self {
        self.alpha = vecstroke_geom::numeric::radians(degrees);
        self
    }

    pub fn with_offset_cusp_tolerance(mut self, ptol: f64) -> Self {
        self.ptol = ptol;
        self
    }

    /// Offset distance: half the stroke width.
    pub fn offset(&self) -> f64 {
        self.width * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offset_is_half_default_width() {
        let opts = StrokeOptions::default();
        assert_eq!(opts.offset(), 0.5);
    }

    #[test]
    fn dash_pattern_length_sums_entries() {
        let style = StrokeStyle::default().with_dashes(&[2.0, 1.0], 0.0);
        assert_eq!(style.dash_pattern_length(), 3.0);
        assert!(style.has_dashes());
    }
}
