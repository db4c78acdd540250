pub mod tokenizer;
pub mod calculators;
pub mod scorer;
pub mod evaluator;
pub mod selector;
pub mod aggregators;

pub use calculators::*;
pub use scorer::*;
pub use evaluator::*;
pub use selector::*;
pub use aggregators::*;
