pub mod category;
pub mod profile;
pub mod settings;
pub mod candidate;
pub mod score;
pub mod selection;
pub mod request;
pub mod run;
pub mod record;

pub use category::*;
pub use profile::*;
pub use settings::*;
pub use candidate::*;
pub use score::*;
pub use selection::*;
pub use request::*;
pub use run::*;
pub use record::*;
