use std::fmt::Debug;

/// Source of wall clock time, in milliseconds since the Unix epoch.
///
/// Expiry decisions of the data container go through this trait so tests can
/// drive the clock explicitly.
pub trait TimeService: Send + Sync + Debug {
    fn wall_clock_time(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTimeService;

impl TimeService for DefaultTimeService {
    fn wall_clock_time(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::TimeService;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that only moves when told to.
    #[derive(Debug, Default)]
    pub struct ControlledTimeService {
        now: AtomicI64,
    }

    impl ControlledTimeService {
        pub fn new(now: i64) -> Self {
            Self {
                now: AtomicI64::new(now),
            }
        }

        pub fn advance(&self, millis: i64) {
            self.now.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl TimeService for ControlledTimeService {
        fn wall_clock_time(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }
    }
}
