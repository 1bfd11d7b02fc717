mod base_container;
mod container_config;
pub mod entries;
pub mod entry_factory;
mod moka_data_container;

pub use base_container::{DataContainerTrait, EvictionListener};
pub use container_config::DataContainerConfig;
pub use moka_data_container::MokaDataContainer;

#[cfg(test)]
mod test_utils;
