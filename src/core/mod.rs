//! Core loading types.

mod builder;
mod global;
mod loader;

pub use builder::{BASE_PROPERTY, ConfigLoaderBuilder, HOME_PROPERTY, discover_base_dir};
pub use global::{get_property, initialize, initialize_with, is_initialized, properties};
pub use loader::{
    CONFIG_PROPERTY, ConfigLoader, ConfigOverride, DEFAULT_FILE_NAME, LoadOrigin,
    LoadedProperties,
};
