pub mod ref_resolver;

pub use ref_resolver::{RefResolver, contains_ref};
