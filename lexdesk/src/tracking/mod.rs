mod controller;
mod session;

pub use controller::*;
pub use session::*;
