pub mod graph_builder;
pub mod identifier;
pub mod naming;
pub mod path_classifier;
pub mod schema_extractor;
pub mod statistics;

pub use graph_builder::{build_resources, describe_operation};
pub use identifier::infer_identifier;
pub use path_classifier::PathClassifier;
pub use schema_extractor::{UNWRAP_RULES, UnwrapRule, extract_instance_schema};
pub use statistics::collect_statistics;
