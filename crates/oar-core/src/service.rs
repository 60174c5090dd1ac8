use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde_json::Value;
use url::Url;

use crate::analysis::{PathClassifier, build_resources, collect_statistics, describe_operation, extract_instance_schema};
use crate::config::OarConfig;
use crate::error::{LoadError, ParseError, ServiceError};
use crate::fetch::{fetch_document, is_remote};
use crate::model::{
    DocumentInfo, HttpMethod, ResourceInfo, ResourceOperation, Statistics, find_resource, top_level_resources,
};
use crate::parse::{self, document::Dialect, document::Document};
use crate::render::{FormOptions, FormSchema, TableOptions, TableSchema, to_form_schema, to_table_schema};
use crate::resolve::RefResolver;

/// Settings applied to every document a service loads.
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    pub extra_ignored_segments: Vec<String>,
    /// Fallback origin for relative server URLs.
    pub base_origin: Option<String>,
}

impl From<&OarConfig> for ServiceOptions {
    fn from(config: &OarConfig) -> Self {
        Self {
            extra_ignored_segments: config.analysis.extra_ignored_segments.clone(),
            base_origin: config.base_origin.clone(),
        }
    }
}

struct Loaded {
    document: Document,
    origin: Option<Url>,
    forest: OnceLock<Vec<ResourceInfo>>,
    statistics: OnceLock<Statistics>,
}

/// Query surface over one parsed document.
///
/// The resource forest and statistics are computed on first use and kept
/// until the next `parse_document`/`load_*` call replaces the document.
pub struct ResourceService {
    options: ServiceOptions,
    classifier: PathClassifier,
    loaded: Option<Loaded>,
}

impl Default for ResourceService {
    fn default() -> Self {
        Self::new(ServiceOptions::default())
    }
}

impl ResourceService {
    pub fn new(options: ServiceOptions) -> Self {
        let classifier = PathClassifier::with_extra_ignored(options.extra_ignored_segments.iter().cloned());
        Self {
            options,
            classifier,
            loaded: None,
        }
    }

    /// Parse an in-memory document, replacing any previous one.
    pub fn parse_document(&mut self, value: Value) -> Result<(), ParseError> {
        self.parse_document_with_origin(value, None)
    }

    /// Like [`Self::parse_document`], recording where the document came from.
    pub fn parse_document_with_origin(&mut self, value: Value, origin: Option<Url>) -> Result<(), ParseError> {
        let document = Document::from_value(value)?;
        self.replace(document, origin);
        Ok(())
    }

    /// Load a `.json` or YAML file.
    pub fn load_path(&mut self, path: &Path) -> Result<(), LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let document = if is_json {
            parse::from_json(&content)?
        } else {
            parse::from_yaml(&content)?
        };
        self.replace(document, None);
        Ok(())
    }

    /// Fetch and load a document from an http(s) URL.
    pub async fn load_url(&mut self, url: &str) -> Result<(), LoadError> {
        let (document, origin) = fetch_document(url).await?;
        self.replace(document, Some(origin));
        Ok(())
    }

    /// Load from a URL or a file path, whichever `input` is.
    pub async fn load(&mut self, input: &str) -> Result<(), LoadError> {
        if is_remote(input) {
            self.load_url(input).await
        } else {
            self.load_path(Path::new(input))
        }
    }

    fn replace(&mut self, document: Document, origin: Option<Url>) {
        log::debug!(
            "loaded `{}` ({}, {} paths)",
            document.info.title,
            document.dialect,
            document.paths.len()
        );
        self.loaded = Some(Loaded {
            document,
            origin,
            forest: OnceLock::new(),
            statistics: OnceLock::new(),
        });
    }

    fn state(&self) -> Result<&Loaded, ServiceError> {
        self.loaded.as_ref().ok_or(ServiceError::NotLoaded)
    }

    pub fn document(&self) -> Result<&Document, ServiceError> {
        Ok(&self.state()?.document)
    }

    pub fn document_info(&self) -> Result<DocumentInfo, ServiceError> {
        let state = self.state()?;
        let doc = &state.document;
        Ok(DocumentInfo {
            title: doc.info.title.clone(),
            version: doc.info.version.clone(),
            description: doc.info.description.clone(),
            dialect: doc.dialect,
            servers: self.server_urls(state),
        })
    }

    /// Every resource root, in discovery order.
    pub fn all_resources(&self) -> Result<&[ResourceInfo], ServiceError> {
        let state = self.state()?;
        Ok(state
            .forest
            .get_or_init(|| build_resources(&state.document, &self.classifier)))
    }

    /// Roots whose name is never used by a sub-resource.
    pub fn top_level_resources(&self) -> Result<Vec<&ResourceInfo>, ServiceError> {
        Ok(top_level_resources(self.all_resources()?))
    }

    /// The first resource named `name`, searching parents before children.
    pub fn resource(&self, name: &str) -> Result<Option<&ResourceInfo>, ServiceError> {
        Ok(find_resource(self.all_resources()?, name))
    }

    fn require_resource(&self, name: &str) -> Result<&ResourceInfo, ServiceError> {
        self.resource(name)?
            .ok_or_else(|| ServiceError::UnknownResource(name.to_string()))
    }

    /// The resolved instance schema of a resource; `None` when it has no
    /// readable GET response.
    pub fn resource_schema(&self, name: &str) -> Result<Option<Value>, ServiceError> {
        let resource = self.require_resource(name)?;
        let resolver = RefResolver::new(&self.state()?.document);
        Ok(extract_instance_schema(&resolver, resource))
    }

    /// Any operation of the document, resource or not.
    pub fn operation_info(&self, method: HttpMethod, path: &str) -> Result<Option<ResourceOperation>, ServiceError> {
        Ok(describe_operation(&self.state()?.document, method, path))
    }

    pub fn resource_statistics(&self) -> Result<&Statistics, ServiceError> {
        let state = self.state()?;
        let forest = self.all_resources()?;
        Ok(state
            .statistics
            .get_or_init(|| collect_statistics(&state.document, forest)))
    }

    /// A form for the resource; the identifier field is filled in from the
    /// resource when `options` leaves it unset.
    pub fn form_schema(&self, name: &str, options: &FormOptions) -> Result<FormSchema, ServiceError> {
        let resource = self.require_resource(name)?;
        let schema = self
            .resource_schema(name)?
            .ok_or_else(|| ServiceError::NoSchema(name.to_string()))?;
        let mut options = options.clone();
        if options.identifier_field.is_none() {
            options.identifier_field = Some(resource.identifier_field.clone());
        }
        Ok(to_form_schema(&schema, &options))
    }

    pub fn table_schema(&self, name: &str, options: &TableOptions) -> Result<TableSchema, ServiceError> {
        let resource = self.require_resource(name)?;
        let schema = self
            .resource_schema(name)?
            .ok_or_else(|| ServiceError::NoSchema(name.to_string()))?;
        let mut options = options.clone();
        if options.identifier_field.is_none() {
            options.identifier_field = Some(resource.identifier_field.clone());
        }
        Ok(to_table_schema(&schema, &options))
    }

    fn server_urls(&self, state: &Loaded) -> Vec<String> {
        let base = state.origin.clone().or_else(|| {
            self.options
                .base_origin
                .as_deref()
                .and_then(|o| match Url::parse(o) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        log::warn!("ignoring invalid base origin {o}: {e}");
                        None
                    }
                })
        });

        let doc = &state.document;
        let declared: Vec<String> = match doc.dialect {
            Dialect::Swagger2 => swagger2_server(doc, base.as_ref()).into_iter().collect(),
            Dialect::OpenApi30 | Dialect::OpenApi31 => {
                doc.servers.iter().map(|s| s.expanded_url()).collect()
            }
        };
        declared
            .into_iter()
            .map(|url| absolutize(&url, base.as_ref()))
            .collect()
    }
}

/// The single 2.0 server: `{scheme}://{host}{basePath}`, or just the base
/// path when no host is declared.
fn swagger2_server(doc: &Document, base: Option<&Url>) -> Option<String> {
    let base_path = doc.base_path.as_deref().unwrap_or("");
    match &doc.host {
        Some(host) => {
            let scheme = doc
                .schemes
                .first()
                .map(String::as_str)
                .or_else(|| base.map(Url::scheme))
                .unwrap_or("https");
            Some(format!("{scheme}://{host}{base_path}"))
        }
        None if base_path.is_empty() => None,
        None => Some(base_path.to_string()),
    }
}

fn absolutize(url: &str, base: Option<&Url>) -> String {
    if Url::parse(url).is_ok() {
        return url.to_string();
    }
    match base.map(|b| b.join(url)) {
        Some(Ok(joined)) => joined.to_string(),
        Some(Err(e)) => {
            log::warn!("cannot resolve server URL {url}: {e}");
            url.to_string()
        }
        None => url.to_string(),
    }
}
