//! Reducing a document to a single domain's paths.

use crate::domain::Endpoint;
use crate::spec::{ApiDocument, OrderedMap, PathItem};

/// Build a document containing exactly one domain's `(path, method)` pairs.
///
/// Every top-level field except `paths` is carried over from the original;
/// `paths` is rebuilt from the endpoint list, so the slice contains the
/// domain's pairs and nothing else. Duplicate endpoints for the same pair
/// overwrite identically, making re-slicing idempotent.
pub fn slice_for_domain(doc: &ApiDocument, endpoints: &[Endpoint]) -> ApiDocument {
    let mut paths: OrderedMap<PathItem> = OrderedMap::new();

    for endpoint in endpoints {
        if paths.get(&endpoint.path).is_none() {
            paths.insert(endpoint.path.clone(), PathItem::default());
        }
        if let Some(item) = paths.get_mut(&endpoint.path) {
            item.set_operation(endpoint.method, endpoint.operation.clone());
        }
    }

    ApiDocument {
        paths,
        rest: doc.rest.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::{partition_endpoints, Domain};
    use crate::spec::{ApiDocument, METHOD_ORDER};
    use std::collections::BTreeSet;

    fn sample_doc() -> ApiDocument {
        ApiDocument::from_json(
            r##"{
            "openapi": "3.1.0",
            "info": { "title": "Test", "version": "1.0.0" },
            "paths": {
                "/chats": {
                    "get": { "responses": {} },
                    "post": { "responses": {} }
                },
                "/chats/{id}": {
                    "get": { "responses": {} }
                },
                "/auth/login": {
                    "post": { "responses": {} }
                }
            }
        }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_slice_contains_exactly_the_domain_pairs() {
        let doc = sample_doc();
        let partitions = partition_endpoints(&doc);
        let endpoints = &partitions[&Domain::Chat];
        let slice = slice_for_domain(&doc, endpoints);

        let endpoint_paths: BTreeSet<&str> = endpoints.iter().map(|e| e.path.as_str()).collect();
        let slice_paths: BTreeSet<&str> = slice.paths.keys().collect();
        assert_eq!(slice_paths, endpoint_paths);

        // Every (path, method) in the slice maps back to exactly one endpoint.
        for (path, item) in slice.paths.iter() {
            for method in METHOD_ORDER {
                if item.operation(method).is_some() {
                    let matching = endpoints
                        .iter()
                        .filter(|e| e.path == path && e.method == method)
                        .count();
                    assert_eq!(matching, 1, "{method} {path}");
                }
            }
        }
    }

    #[test]
    fn test_slice_shares_other_top_level_fields() {
        let doc = sample_doc();
        let partitions = partition_endpoints(&doc);
        let slice = slice_for_domain(&doc, &partitions[&Domain::Auth]);
        assert_eq!(slice.rest, doc.rest);
        assert_eq!(slice.paths.len(), 1);
    }

    #[test]
    fn test_reslicing_is_idempotent() {
        let doc = sample_doc();
        let partitions = partition_endpoints(&doc);
        let endpoints = &partitions[&Domain::Chat];

        let once = slice_for_domain(&doc, endpoints);
        let resliced = partition_endpoints(&once);
        let twice = slice_for_domain(&once, &resliced[&Domain::Chat]);

        let a = serde_json::to_string(&once).unwrap();
        let b = serde_json::to_string(&twice).unwrap();
        assert_eq!(a, b);
    }
}
