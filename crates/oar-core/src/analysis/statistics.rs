use crate::model::{ResourceInfo, Statistics, top_level_resources};
use crate::parse::document::Document;

/// Aggregate counts for a document and the forest built from it.
///
/// `total_paths` covers every path in the document. The other counts cover
/// resources only, so operations on non-resource paths (`/auth/login`) are
/// not counted.
pub fn collect_statistics(document: &Document, forest: &[ResourceInfo]) -> Statistics {
    let mut stats = Statistics {
        total_paths: document.paths.len(),
        top_level_resources: top_level_resources(forest).len(),
        max_depth: forest.iter().map(depth).max().unwrap_or(0),
        ..Statistics::default()
    };

    for resource in forest.iter().flat_map(ResourceInfo::descendants) {
        stats.total_resources += 1;
        for op in &resource.operations {
            stats.total_operations += 1;
            *stats
                .method_counts
                .entry(op.method.as_str().to_string())
                .or_insert(0) += 1;
            for tag in &op.tags {
                *stats.tag_counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
    }

    log::debug!(
        "statistics: {} paths, {} resources, {} operations",
        stats.total_paths,
        stats.total_resources,
        stats.total_operations
    );
    stats
}

fn depth(resource: &ResourceInfo) -> usize {
    1 + resource.sub_resources.iter().map(depth).max().unwrap_or(0)
}
