//! Resource-model analysis for OpenAPI and Swagger documents.
//!
//! A document is parsed into [`parse::document::Document`], its paths are
//! grouped into a forest of [`model::ResourceInfo`] values, and each
//! resource's instance schema can be rendered as a form or a table.
//! [`service::ResourceService`] ties the pieces together behind a cached
//! query surface.

pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod parse;
pub mod render;
pub mod resolve;
pub mod service;

pub use error::{ConfigError, FetchError, LoadError, ParseError, ServiceError};
pub use service::{ResourceService, ServiceOptions};
