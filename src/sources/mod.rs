//! Adapters that take a raw snapshot for the validator.

mod config_source;
mod env;
mod file;
mod map;

pub use config_source::ConfigSource;
pub use env::EnvSource;
pub use file::FileSource;
pub use map::MapSource;
