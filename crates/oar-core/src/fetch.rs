use url::Url;

use crate::error::{FetchError, LoadError};
use crate::parse::{self, document::Document};

/// Fetch and parse a document from an http(s) URL.
///
/// The body may be JSON or YAML. The final URL (after redirects) is
/// returned so relative server URLs can be joined against it.
pub async fn fetch_document(url: &str) -> Result<(Document, Url), LoadError> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    log::debug!("fetching {parsed}");
    let client = reqwest::Client::new();
    let response = client
        .get(parsed)
        .header(
            reqwest::header::ACCEPT,
            "application/json, application/yaml;q=0.9, */*;q=0.5",
        )
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let origin = response.url().clone();
    let body = response.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;
    let document = parse::from_str(&body)?;
    Ok((document, origin))
}

/// Whether `input` names an http(s) URL rather than a file.
pub fn is_remote(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/openapi.json"));
        assert!(is_remote("http://localhost:8080/spec.yaml"));
        assert!(!is_remote("openapi.yaml"));
        assert!(!is_remote("./specs/https.yaml"));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let err = fetch_document("not a url").await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch(FetchError::InvalidUrl { .. })));
    }
}
