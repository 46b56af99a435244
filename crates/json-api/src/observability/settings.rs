//! Process-global observability runtime settings.

use std::sync::atomic::{AtomicU64, Ordering};

const DEFAULT_SLOW_REQUEST_THRESHOLD_MS: u64 = 1_000;

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(DEFAULT_SLOW_REQUEST_THRESHOLD_MS);

pub(super) fn apply_runtime_config(slow_request_threshold_ms: u64) {
    SLOW_REQUEST_THRESHOLD_MS.store(slow_request_threshold_ms, Ordering::Relaxed);
}

pub(super) fn slow_request_threshold_ms() -> u64 {
    SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed)
}
