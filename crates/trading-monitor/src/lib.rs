//! Logging setup and run journal rendering.

mod journal;
mod logging;

pub use journal::render_journal;
pub use logging::setup_logging;
