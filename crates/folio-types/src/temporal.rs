use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Commit timestamp: wall-clock milliseconds plus a logical counter.
///
/// The logical counter breaks ties between events issued within the same
/// millisecond, so a single issuer can hand out strictly increasing
/// timestamps with [`Timestamp::after`].
///
/// Ordering: `millis` then `logical` (total order).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub millis: u64,
    /// Logical counter for events at the same millisecond.
    pub logical: u32,
}

impl Timestamp {
    pub fn new(millis: u64, logical: u32) -> Self {
        Self { millis, logical }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self {
            millis: wall_clock_ms(),
            logical: 0,
        }
    }

    /// The zero timestamp.
    pub const fn zero() -> Self {
        Self {
            millis: 0,
            logical: 0,
        }
    }

    /// A timestamp for "now" that is strictly after `previous`.
    ///
    /// If the wall clock has not advanced past `previous` (same millisecond,
    /// or a clock step backwards) the logical counter is bumped instead.
    pub fn after(previous: &Self) -> Self {
        let now_ms = wall_clock_ms();
        if now_ms > previous.millis {
            Self {
                millis: now_ms,
                logical: 0,
            }
        } else {
            Self {
                millis: previous.millis,
                logical: previous.logical + 1,
            }
        }
    }

    /// The wall-clock cutoff `retention` before now, in milliseconds.
    pub fn cutoff_ms(retention: Duration) -> u64 {
        wall_clock_ms().saturating_sub(retention.as_millis() as u64)
    }

    /// RFC 3339 rendering of the wall-clock component.
    pub fn to_rfc3339(&self) -> String {
        match chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.millis as i64) {
            Some(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            None => format!("{}ms", self.millis),
        }
    }
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.millis
            .cmp(&other.millis)
            .then(self.logical.cmp(&other.logical))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms.{})", self.millis, self.logical)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.millis, self.logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_millis_first() {
        assert!(Timestamp::new(100, 5) < Timestamp::new(200, 0));
    }

    #[test]
    fn ordering_logical_second() {
        assert!(Timestamp::new(100, 1) < Timestamp::new(100, 2));
    }

    #[test]
    fn after_is_strictly_greater() {
        let mut prev = Timestamp::now();
        for _ in 0..1000 {
            let next = Timestamp::after(&prev);
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn after_future_timestamp_bumps_logical() {
        let future = Timestamp::new(u64::MAX / 2, 3);
        let next = Timestamp::after(&future);
        assert_eq!(next, Timestamp::new(u64::MAX / 2, 4));
    }

    #[test]
    fn now_produces_reasonable_timestamp() {
        // After 2020-01-01.
        assert!(Timestamp::now().millis > 1_577_836_800_000);
    }

    #[test]
    fn rfc3339_rendering() {
        let ts = Timestamp::new(0, 0);
        assert_eq!(ts.to_rfc3339(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn display_format() {
        assert_eq!(Timestamp::new(1000, 5).to_string(), "1000.5");
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::new(1_234_567_890, 42);
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
