//! Composes the pipeline stages (§4.3–§4.7) into the single entry point
//! `stroke_to_fill` (§6), the way the source's `i_sink`-chained filters are
//! wired together by its driver code, only here as a fixed generic stack
//! instead of a runtime chain of virtual sinks.

use vecstroke_path::events::InputPath;
use vecstroke_path::style::StrokeOptions;

use crate::decorate::Decorator;
use crate::join::JoinSimplifier;
use crate::orient::Orienter;
use crate::regularize::Regularizer;
use crate::thicken::Thickener;

/// The full stroke-to-fill pipeline, specialized to whatever sink collects
/// the resulting fill geometry: regularize, orient, decorate, simplify
/// joins, thicken.
pub type Pipeline<S> = Regularizer<Orienter<Decorator<JoinSimplifier<Thickener<S>>>>>;

/// Builds the pipeline (§6). Feed it `InputPath` events in contour order
/// (`begin_contour`, segment events, `end_open_contour`/`end_closed_contour`,
/// repeated per contour), then call [`finish`] to drain the last stage and
/// recover `sink` with the fill geometry written into it.
pub fn stroke_to_fill<S: InputPath>(opts: StrokeOptions, sink: S) -> Pipeline<S> {
    let offset = opts.offset();
    let thickener = Thickener::new(sink, &opts);
    let joins = JoinSimplifier::new(thickener, offset);
    let decorator = Decorator::new(joins, &opts);
    let oriented = Orienter::new(decorator);
    Regularizer::new(oriented, opts)
}

/// Drains every stage — most importantly the join simplifier's three-slot
/// ring, which otherwise leaves its last two buffered events unemitted — and
/// returns the sink the pipeline was built with.
pub fn finish<S: InputPath>(pipeline: Pipeline<S>) -> S {
    pipeline.into_sink().into_sink().into_sink().into_sink().into_sink()
}
