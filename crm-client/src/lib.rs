mod api;
mod client;
mod credentials;
mod crm_url;
pub mod domain;
mod error;
pub mod mock;

pub(crate) use crm_url::*;

pub use api::*;
pub use client::*;
pub use credentials::*;
pub use error::*;
