// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for refresh and retry activity.
#[derive(Debug, Default)]
pub struct SessionMetrics {
	refresh_attempts: AtomicU64,
	refresh_successes: AtomicU64,
	refresh_failures: AtomicU64,
	coalesced_refreshes: AtomicU64,
	retries: AtomicU64,
}
impl SessionMetrics {
	/// Returns the number of `refresh_access_token` invocations.
	pub fn refresh_attempts(&self) -> u64 {
		self.refresh_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that produced a new access token.
	pub fn refresh_successes(&self) -> u64 {
		self.refresh_successes.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that ended in a logout.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failures.load(Ordering::Relaxed)
	}

	/// Returns how many 401 recoveries reused a token refreshed by a concurrent caller.
	pub fn coalesced_refreshes(&self) -> u64 {
		self.coalesced_refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of requests reissued after a refresh.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	pub(crate) fn record_refresh_attempt(&self) {
		self.refresh_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_success(&self) {
		self.refresh_successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_coalesced_refresh(&self) {
		self.coalesced_refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}
}
