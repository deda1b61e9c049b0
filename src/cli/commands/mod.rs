//! CLI command implementations

pub mod affected;
pub mod config;
pub mod init;
pub mod list;

pub use affected::execute as affected;
pub use config::execute as config;
pub use init::execute as init;
pub use list::execute as list;
