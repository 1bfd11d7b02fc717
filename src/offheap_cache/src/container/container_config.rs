#[derive(Debug, Clone)]
pub struct DataContainerConfig {
    /// Maximum number of values held before the least recently used is evicted.
    pub max_size: u64,
}

impl DataContainerConfig {
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }
}
