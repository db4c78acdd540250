pub mod config;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod retry;
pub mod tasks;

pub use config::*;
pub use error::*;
pub use orchestrator::*;
pub use progress::*;
pub use retry::*;
pub use tasks::*;
