// self
use crate::{
	_prelude::*,
	auth::SteamId,
	obs::FlowKind,
	openid::{Rejection, VerificationError},
};

/// Future returned by [`FlowSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Sign-in step future, unwrapped.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// `steam_openid.flow` span wrapping one sign-in capability call.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind`, tagged with the calling `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("steam_openid.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span for the synchronous redirect build.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Attaches the span to a verification or profile future.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
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

/// RAII guard returned by [`FlowSpan::entered`].
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}

pub(crate) fn log_rejection(reason: &Rejection) {
	#[cfg(feature = "tracing")]
	tracing::warn!(%reason, "OpenID callback rejected.");
	#[cfg(not(feature = "tracing"))]
	let _ = reason;
}

pub(crate) fn log_verification_error(error: &VerificationError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(%error, "Error verifying OpenID assertion.");
	#[cfg(not(feature = "tracing"))]
	let _ = error;
}

pub(crate) fn log_missing_profile(steam_id: &SteamId) {
	#[cfg(feature = "tracing")]
	tracing::debug!(%steam_id, "Profile endpoint returned no players.");
	#[cfg(not(feature = "tracing"))]
	let _ = steam_id;
}
