//! Limits and unit constants

use static_assertions::const_assert_eq;

/// Most handles a single multi-object wait accepts
pub const MAXIMUM_WAIT_OBJECTS: usize = nt_platform::types::MAXIMUM_WAIT_OBJECTS;

/// Kernel time unit is 100ns
pub const NANOS_PER_TICK: u64 = 100;
pub const TICKS_PER_MILLISECOND: i64 = 10_000;
pub const TICKS_PER_SECOND: i64 = 1000 * TICKS_PER_MILLISECOND;

/// Preferred node value meaning "no preference"
pub const ANY_NODE: i32 = -1;

const_assert_eq!(TICKS_PER_MILLISECOND as u64 * NANOS_PER_TICK, 1_000_000);
const_assert_eq!(TICKS_PER_SECOND, 10_000_000);

/// Backend the platform layer was built with
pub fn platform_mode() -> &'static str {
    nt_platform::config::platform_mode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_mode() {
        assert_eq!(platform_mode(), "mock");
        assert_eq!(MAXIMUM_WAIT_OBJECTS, 64);
    }
}
