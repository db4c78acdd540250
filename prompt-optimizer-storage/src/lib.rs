pub mod repositories;
pub mod statistics;
pub mod export;

pub use repositories::*;
pub use statistics::*;
pub use export::*;
