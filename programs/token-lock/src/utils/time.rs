//! Maturity arithmetic for vesting entries.
//! - delays are seconds relative to the activation timestamp
//! - maturity_k = activated_at + delay_k
//! - an entry is matured iff now >= maturity_k (inclusive at the boundary)

/// Absolute unix timestamp at which an entry matures, or `None` when the
/// offset lies beyond the representable clock range (such an entry never matures).
pub fn maturity_ts(activated_at: i64, delay_seconds: u64) -> Option<i64> {
    i64::try_from(delay_seconds)
        .ok()
        .and_then(|delay| activated_at.checked_add(delay))
}

/// True if an entry with `delay_seconds` has matured at `now`.
pub fn is_matured(activated_at: i64, delay_seconds: u64, now: i64) -> bool {
    match maturity_ts(activated_at, delay_seconds) {
        Some(at) => now >= at,
        None => false,
    }
}
