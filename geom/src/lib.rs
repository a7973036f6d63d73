#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unconditional_recursion)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]

//! Pure Bezier arithmetic: the degree-generic kernel (§4.1) and the
//! curve-analysis layer built on top of it (§4.2) — arc length, radius of
//! curvature, tangent direction and the parameter finders the regularization
//! and thickening stages drive off of.
//!
//! This crate knows nothing about paths, strokes, or event streams; it is the
//! same kind of leaf maths crate as `lyon_geom` is to `lyon_tessellation`.

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

pub mod numeric;
pub mod point;
pub mod bezier;
pub mod roots;
pub mod arc_length;
pub mod curvature;

pub use point::{point, vector, Point, Vector};
pub use point::{HPoint, RP1};

/// Maximum Bezier degree this crate supports (the spec covers integral and
/// rational curves "up to cubic").
pub const MAX_DEGREE: usize = 3;
