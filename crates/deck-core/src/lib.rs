pub mod api;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod platform;
pub mod poller;
pub mod protocol;
pub mod session;
pub mod store;
