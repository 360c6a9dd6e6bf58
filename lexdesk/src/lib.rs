pub mod cli;
pub mod config;
pub mod dispatch;
pub mod entries;
pub mod page;
pub mod runtime;
pub mod status;
pub mod surface;
pub mod tracking;
