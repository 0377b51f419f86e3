pub mod config;
pub mod logging;

pub mod progress;
pub mod request;
pub mod session;
pub mod transfer;
pub mod url_model;
