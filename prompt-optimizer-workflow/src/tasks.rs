pub mod variation;
pub mod responding;

pub use variation::*;
pub use responding::*;
