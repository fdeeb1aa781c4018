pub mod ids;
pub mod types;
pub mod validate;

pub use ids::*;
pub use types::*;
