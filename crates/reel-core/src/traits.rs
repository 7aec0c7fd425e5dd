//! Core abstraction traits at the engine's two seams: where ticks come
//! from, and where derived state goes.

use crate::id::TickId;

/// A monotonically increasing tick source.
///
/// For a render-driven timeline the caller supplies the tick per
/// evaluation (pull-based); for a live simulation the clock follows
/// wall time. Reading the clock cannot fail.
pub trait Clock {
    /// The current tick.
    fn current_tick(&self) -> TickId;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_tick(&self) -> TickId {
        (**self).current_tick()
    }
}

/// Consumer of derived presentation state.
///
/// Implementations render frames or update a UI store. The engine calls
/// [`present`](PresentationSink::present) once per dispatched event, in
/// dispatch order.
pub trait PresentationSink<T: ?Sized> {
    /// Receive the state derived at `tick`.
    fn present(&mut self, tick: TickId, state: &T);
}

impl<T: ?Sized, F> PresentationSink<T> for F
where
    F: FnMut(TickId, &T),
{
    fn present(&mut self, tick: TickId, state: &T) {
        self(tick, state)
    }
}
