use crate::model::is_placeholder;

/// Path segments that never name a resource: API prefixes and cross-cutting
/// action words. A genuine resource called e.g. `search` is misclassified.
pub const IGNORED_SEGMENTS: &[&str] = &[
    "api", "search", "export", "import", "login", "logout", "register", "health", "metrics",
    "status", "ping", "version", "batch", "bulk", "count",
];

/// Turns path templates into resource chains.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    extra_ignored: Vec<String>,
}

impl PathClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A classifier that also ignores `extra` (compared case-insensitively).
    pub fn with_extra_ignored<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra_ignored: extra
                .into_iter()
                .map(|s| s.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// The resource chain of a path template.
    ///
    /// Examples:
    /// - `/users/{id}/posts` → `["users", "posts"]`
    /// - `/api/v2/orders/{orderId}` → `["orders"]`
    /// - `/auth/login` → `["auth"]`
    /// - `/health` → `[]`
    pub fn classify(&self, path: &str) -> Vec<String> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .filter(|s| !is_placeholder(s))
            .filter(|s| !self.is_ignored(s))
            .map(str::to_string)
            .collect()
    }

    fn is_ignored(&self, segment: &str) -> bool {
        let lower = segment.to_ascii_lowercase();
        is_version_marker(&lower)
            || IGNORED_SEGMENTS.contains(&lower.as_str())
            || self.extra_ignored.iter().any(|s| *s == lower)
    }
}

/// `v1`, `v2`, `v10`, ...
fn is_version_marker(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Number of non-empty segments in a path template.
pub fn segment_count(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

/// Placeholder names in a path template, in order: `/a/{x}/b/{y}` → `["x", "y"]`.
pub fn placeholders(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| is_placeholder(s))
        .map(|s| s[1..s.len() - 1].to_string())
        .collect()
}

/// Whether the last segment of the path is a placeholder.
pub fn ends_with_placeholder(path: &str) -> bool {
    path.split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .is_some_and(is_placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_nested() {
        let c = PathClassifier::new();
        assert_eq!(c.classify("/users/{id}/posts"), vec!["users", "posts"]);
        assert_eq!(c.classify("/users/{id}/posts/{postId}"), vec!["users", "posts"]);
    }

    #[test]
    fn test_classify_drops_version_and_prefix() {
        let c = PathClassifier::new();
        assert_eq!(c.classify("/api/v2/orders/{orderId}"), vec!["orders"]);
        assert_eq!(c.classify("/V1/items"), vec!["items"]);
        assert_eq!(c.classify("/vendors"), vec!["vendors"]);
    }

    #[test]
    fn test_classify_drops_action_words() {
        let c = PathClassifier::new();
        assert_eq!(c.classify("/auth/login"), vec!["auth"]);
        assert_eq!(c.classify("/users/search"), vec!["users"]);
        assert!(c.classify("/health").is_empty());
        assert!(c.classify("/").is_empty());
    }

    #[test]
    fn test_extra_ignored() {
        let c = PathClassifier::with_extra_ignored(["Internal"]);
        assert_eq!(c.classify("/internal/jobs"), vec!["jobs"]);
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(segment_count("/users/{id}/"), 2);
        assert_eq!(placeholders("/a/{x}/b/{y}"), vec!["x", "y"]);
        assert!(ends_with_placeholder("/users/{id}"));
        assert!(ends_with_placeholder("/users/{id}/"));
        assert!(!ends_with_placeholder("/users"));
    }
}
