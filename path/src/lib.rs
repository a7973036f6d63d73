#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::too_many_arguments)]

//! Event-stream contracts and the stroke style configuration bundle (§3,
//! §6) that the pipeline stages in `vecstroke-core` implement and thread
//! through.

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod events;
pub mod style;

pub use events::{
    CubicParams, DashingParams, DecoratedPath, InputPath, JoinParams, MonotonicParams, OffsettingParams, RegularPath,
    SegmentPiece,
};
pub use style::{CapStyle, InnerJoinStyle, JoinStyle, StrokeOptions, StrokeStyle};

pub use vecstroke_geom as geom;
