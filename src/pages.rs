//! Route discovery - walking the pages directory.

use std::path::Path;

use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use crate::core::{BudgetError, Route};

/// Discover every route under the pages root.
///
/// Directories are traversed, not emitted. Files are visited in traversal
/// order. Two files that map to the same logical route (e.g. differing only
/// by extension) collapse into one entry, since the route is the measurement
/// key either way.
pub fn discover_routes(pages_root: &Path) -> Result<Vec<Route>, BudgetError> {
    // jwalk yields nothing for an unreadable root; probe it first so a
    // missing pages directory aborts the run instead of reporting an
    // empty table.
    std::fs::read_dir(pages_root).map_err(|source| BudgetError::Filesystem {
        path: pages_root.to_path_buf(),
        source,
    })?;

    let mut seen = FxHashSet::default();
    let mut routes = Vec::new();
    for entry in WalkDir::new(pages_root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let relative = path.strip_prefix(pages_root).unwrap_or(&path);
        let route = Route::from_page_file(relative);
        if seen.insert(route.clone()) {
            routes.push(route);
        }
    }
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "export {}\n").unwrap();
    }

    #[test]
    fn test_two_pages_two_routes() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "index.mjs");
        touch(temp.path(), "about.mjs");

        let mut routes: Vec<_> = discover_routes(temp.path())
            .unwrap()
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();
        routes.sort();
        assert_eq!(routes, vec!["/", "/about"]);
    }

    #[test]
    fn test_nested_pages() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "docs/index.mjs");
        touch(temp.path(), "docs/intro.mjs");

        let mut routes: Vec<_> = discover_routes(temp.path())
            .unwrap()
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();
        routes.sort();
        assert_eq!(routes, vec!["/docs", "/docs/intro"]);
    }

    #[test]
    fn test_duplicate_routes_collapse() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "about.mjs");
        touch(temp.path(), "about.html");

        let routes = discover_routes(temp.path()).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].as_str(), "/about");
    }

    #[test]
    fn test_missing_pages_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-such-dir");

        let err = discover_routes(&missing).unwrap_err();
        assert!(matches!(err, BudgetError::Filesystem { .. }));
    }

    #[test]
    fn test_directories_are_not_routes() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "blog/post.mjs");

        let routes = discover_routes(temp.path()).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].as_str(), "/blog/post");
    }
}
