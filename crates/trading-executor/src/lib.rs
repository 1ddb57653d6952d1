//! Session bootstrap and the crossover execution loop.

mod engine;
mod report;
mod session;

pub use engine::{Executor, ExecutorConfig};
pub use report::{RunReport, SymbolOutcome, SymbolReport};
pub use session::{RunError, Session};
