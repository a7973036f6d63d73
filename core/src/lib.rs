#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::too_many_arguments)]

//! The stroke-to-fill pipeline (§4): regularization, orientation, decoration
//! (caps, joins, dashing), join simplification and thickening, composed in
//! [`pipeline::stroke_to_fill`].
//!
//! Each stage is a small struct that both implements one of
//! `vecstroke_path::events`'s traits (what it consumes) and wraps a sink
//! implementing another (what it produces), the same one-stage-one-filter
//! style the source's `i_sink`-based pipeline uses, translated into plain
//! generic structs instead of a sink-holding CRTP mixin.

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

pub mod approximate;
pub mod curve;
pub mod decorate;
pub mod error;
pub mod find_parameters;
pub mod join;
pub mod orient;
pub mod pipeline;
pub mod regularize;
pub mod thicken;
pub mod validate;

pub use error::{Error, StrokeResult};
pub use pipeline::{finish, stroke_to_fill, Pipeline};
pub use validate::Validator;
