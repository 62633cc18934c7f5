pub mod desk_config;

pub use desk_config::{Delays, DeskConfig, LedgerConfig, MockConfig};
