use crate::container::base_container::EvictionListener;
use crate::container::container_config::DataContainerConfig;
use crate::container::entries::CacheEntry;
use crate::container::moka_data_container::MokaDataContainer;
use crate::marshall::{BincodeObjectMarshaller, ExternalizerRegistry};
use crate::time_service::test_utils::ControlledTimeService;
use moka::notification::RemovalCause;
use std::sync::{Arc, Mutex};

pub(crate) type RemovedEntries = Arc<Mutex<Vec<(CacheEntry<String, String>, RemovalCause)>>>;

pub(crate) struct DataContainerTestBuilder {
    max_size: u64,
    now: i64,
    record_removals: bool,
}

pub(crate) struct DataContainerTestContext {
    pub(crate) container: MokaDataContainer<String, String>,
    pub(crate) clock: Arc<ControlledTimeService>,
    pub(crate) removed: RemovedEntries,
}

impl DataContainerTestBuilder {
    pub(crate) fn new() -> Self {
        Self {
            max_size: 2,
            now: 10_000,
            record_removals: false,
        }
    }

    pub(crate) fn max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub(crate) fn record_removals(mut self) -> Self {
        self.record_removals = true;
        self
    }

    pub(crate) fn build(self) -> DataContainerTestContext {
        let registry = Arc::new(
            ExternalizerRegistry::with_default_externalizers(Arc::new(
                BincodeObjectMarshaller::<String>::with_type_name("string"),
            ))
            .unwrap(),
        );
        let clock = Arc::new(ControlledTimeService::new(self.now));
        let removed: RemovedEntries = Arc::new(Mutex::new(Vec::new()));
        let listener: Option<EvictionListener<String, String>> = if self.record_removals {
            let removed = removed.clone();
            Some(Arc::new(move |entry: CacheEntry<String, String>, cause: RemovalCause| {
                removed.lock().unwrap().push((entry, cause));
            }))
        } else {
            None
        };

        let container = MokaDataContainer::with_options(
            DataContainerConfig::new(self.max_size),
            registry,
            clock.clone(),
            listener,
        );
        DataContainerTestContext {
            container,
            clock,
            removed,
        }
    }
}
