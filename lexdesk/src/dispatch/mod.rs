mod analytics;
mod debounce;
mod search;
mod sequence;

pub use analytics::*;
pub use debounce::*;
pub use search::*;
pub use sequence::*;
