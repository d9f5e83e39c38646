mod defaults;
pub mod model;

pub use model::*;
