//! Human-readable order and tracking numbers

use jiff::Timestamp;
use rand::Rng;

/// `{prefix}-{last 6 digits of epoch ms}-{3 random digits}`.
///
/// Only probabilistically unique; order identity is the UUID.
pub fn order_number(prefix: &str, now: Timestamp, rng: &mut impl Rng) -> String {
    let stamp = now.as_millisecond().rem_euclid(1_000_000);
    let suffix: u16 = rng.gen_range(0..1_000);

    format!("{prefix}-{stamp:06}-{suffix:03}")
}

/// `TRK{last 8 digits of epoch ms}`.
pub fn tracking_number(now: Timestamp) -> String {
    format!("TRK{:08}", now.as_millisecond().rem_euclid(100_000_000))
}
