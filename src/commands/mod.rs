pub mod config;
pub mod devices;
pub mod permissions;
pub mod scanner;

pub use config::*;
pub use devices::*;
pub use permissions::*;
pub use scanner::*;
