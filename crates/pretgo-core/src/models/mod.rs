pub mod candidate;
pub mod query;
pub mod selection;

pub use candidate::*;
pub use query::*;
pub use selection::*;
