// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for assertion verification.
#[derive(Debug, Default)]
pub struct VerificationMetrics {
	attempts: AtomicU64,
	verified: AtomicU64,
	fast_path_rejections: AtomicU64,
	rejections: AtomicU64,
	primitive_failures: AtomicU64,
}
impl VerificationMetrics {
	/// Returns the total number of verification attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of callbacks that yielded a Steam ID.
	pub fn verified(&self) -> u64 {
		self.verified.load(Ordering::Relaxed)
	}

	/// Returns the number of callbacks refused before contacting the provider.
	pub fn fast_path_rejections(&self) -> u64 {
		self.fast_path_rejections.load(Ordering::Relaxed)
	}

	/// Returns the total number of rejected callbacks (fast path included).
	pub fn rejections(&self) -> u64 {
		self.rejections.load(Ordering::Relaxed)
	}

	/// Returns the number of times the relying-party primitive failed.
	pub fn primitive_failures(&self) -> u64 {
		self.primitive_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_verified(&self) {
		self.verified.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_fast_path_rejection(&self) {
		self.fast_path_rejections.fetch_add(1, Ordering::Relaxed);
		self.record_rejection();
	}

	pub(crate) fn record_rejection(&self) {
		self.rejections.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_primitive_failure(&self) {
		self.primitive_failures.fetch_add(1, Ordering::Relaxed);
	}
}
