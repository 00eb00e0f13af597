use super::context::TickContext;

/// A pluggable simulation phase that runs each tick.
///
/// Object-safe so phases can be stored as `Box<dyn SimPhase>`.
pub trait SimPhase: Send {
    fn name(&self) -> &str;
    fn tick(&mut self, ctx: &mut TickContext);

    /// React to signals emitted by earlier phases during `tick()`.
    ///
    /// Called once per tick with the full signal buffer in `ctx.inbox`.
    /// Signals pushed here are **not** re-delivered (single-pass).
    /// Default: no-op.
    fn handle_signals(&mut self, ctx: &mut TickContext) {
        let _ = ctx;
    }
}
