mod analytics;
mod ids;
mod search;
mod task_status;
mod time_entry;

pub use analytics::*;
pub use ids::*;
pub use search::*;
pub use task_status::*;
pub use time_entry::*;
