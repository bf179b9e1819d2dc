//! CLI command implementations

pub mod cache;
pub mod config;
pub mod device;
pub mod dex;
pub mod push;

pub use cache::execute as cache;
pub use config::execute as config;
pub use config::init as config_init;
pub use device::{ensure_dir, wait_mount};
pub use dex::execute as dex;
pub use push::execute as push;
