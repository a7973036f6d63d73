//! Error taxonomy (§7). Only stream malformation and semantic impossibility
//! (§7.1, §7.4) abort the pipeline; numerical degeneracy and approximation
//! budget exhaustion (§7.2, §7.3) recover locally and never appear here.

/// The pipeline's result type.
pub type StrokeResult<T> = Result<T, Error>;

/// A programming-contract violation: the input event stream did not
/// satisfy §3's invariants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum MalformedStream {
    /// A segment event arrived with no enclosing `begin_contour`.
    SegmentOutsideContour,
    /// An `end_*_contour` arrived with no matching `begin_contour`.
    UnmatchedEndContour,
    /// A `terminal_cap`/`terminal_butt_cap` arrived with no preceding
    /// `initial_*_cap` in the same contour.
    TerminalCapWithoutInitialCap,
    /// A parameter event's `t` fell outside `[0,1]`.
    ParameterOutOfRange,
}

#[cfg(feature = "std")]
impl core::fmt::Display for MalformedStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MalformedStream::SegmentOutsideContour => std::write!(f, "segment event outside any contour"),
            MalformedStream::UnmatchedEndContour => std::write!(f, "end-of-contour event with no matching begin"),
            MalformedStream::TerminalCapWithoutInitialCap => {
                std::write!(f, "terminal cap with no preceding initial cap")
            }
            MalformedStream::ParameterOutOfRange => std::write!(f, "parameter event outside [0,1]"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MalformedStream {}

/// §7.4: a rational quadratic whose endpoint weights have non-matching
/// sign (`w0*w2 <= 0`), rejected at canonicalization time rather than
/// silently producing a meaningless projection.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct RationalWeightSign {
    pub w0: f64,
    pub w2: f64,
}

#[cfg(feature = "std")]
impl core::fmt::Display for RationalWeightSign {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        std::write!(f, "rational quadratic endpoint weights {} and {} do not share a sign", self.w0, self.w2)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RationalWeightSign {}

/// The pipeline's hard-abort error enumeration (§7's classes 1 and 4).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    MalformedStream(MalformedStream),
    RationalWeightSign(RationalWeightSign),
}

#[cfg(feature = "std")]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::MalformedStream(e) => std::write!(f, "malformed event stream: {e}"),
            Error::RationalWeightSign(e) => std::write!(f, "semantic impossibility: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<MalformedStream> for Error {
    fn from(e: MalformedStream) -> Self {
        Error::MalformedStream(e)
    }
}

impl From<RationalWeightSign> for Error {
    fn from(e: RationalWeightSign) -> Self {
        Error::RationalWeightSign(e)
    }
}
