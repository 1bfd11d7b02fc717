use std::time::Duration;
use typed_builder::TypedBuilder;

/// Expiry policy attached to a cache value.
///
/// Both durations are in milliseconds, `-1` (or any negative value) meaning
/// infinite. Values of the immortal family always report `-1`/`-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TypedBuilder)]
pub struct EmbeddedMetadata {
    #[builder(default = -1)]
    lifespan: i64,
    #[builder(default = -1)]
    max_idle: i64,
}

impl EmbeddedMetadata {
    pub fn immortal() -> Self {
        Self::builder().build()
    }

    pub fn lifespan(&self) -> i64 {
        self.lifespan
    }

    pub fn max_idle(&self) -> i64 {
        self.max_idle
    }

    pub fn lifespan_duration(&self) -> Option<Duration> {
        to_duration(self.lifespan)
    }

    pub fn max_idle_duration(&self) -> Option<Duration> {
        to_duration(self.max_idle)
    }

    pub fn is_immortal(&self) -> bool {
        self.lifespan < 0 && self.max_idle < 0
    }
}

impl Default for EmbeddedMetadata {
    fn default() -> Self {
        Self::immortal()
    }
}

fn to_duration(millis: i64) -> Option<Duration> {
    u64::try_from(millis).ok().map(Duration::from_millis)
}
