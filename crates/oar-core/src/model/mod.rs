pub mod operation;
pub mod resource;
pub mod types;

pub use operation::*;
pub use resource::*;
pub use types::{DocumentInfo, Statistics};
