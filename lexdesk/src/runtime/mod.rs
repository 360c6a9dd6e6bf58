mod action_queue;
mod actions;
mod commands;
mod console;
mod event_loop;

pub use console::ConsoleSurface;
pub use event_loop::run_page;
