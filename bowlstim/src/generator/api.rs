use crate::foundation::error::StimResult;
use crate::foundation::frame::Frame;

/// A frame-producing routine with fixed construction-time parameters.
///
/// Implementations receive a [`ClockHandle`](crate::ClockHandle) at construction when they
/// depend on run time, and may keep a private cache and pacer when their own rate differs from
/// the presentation loop. `produce` is called once per Advance tick of the loop.
pub trait Generator {
    /// Per-call parameters.
    type Params;

    /// Produce the next frame.
    fn produce(&mut self, params: &Self::Params) -> StimResult<Frame>;

    /// Drop caches before a new run. The default does nothing.
    fn reset(&mut self) {}
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    type Params = G::Params;

    fn produce(&mut self, params: &Self::Params) -> StimResult<Frame> {
        (**self).produce(params)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
