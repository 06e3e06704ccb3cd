// self
use crate::{_prelude::*, obs::SessionOp};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by session operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(op: SessionOp, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("bearer_session.op", op = op.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning event inside the current span (no-op without `tracing`).
pub fn warn_event(op: SessionOp, message: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(op = op.as_str(), "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (op, message);
	}
}

/// Emits a debug event inside the current span (no-op without `tracing`).
pub fn debug_event(op: SessionOp, message: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(op = op.as_str(), "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (op, message);
	}
}
