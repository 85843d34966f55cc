//! Constant-directory exclusion filter
//!
//! Source subtrees configured as "constant" hold static pass-through content
//! (asset manifests, generated tables) that must never reach the transform.
//! A file matching here short-circuits the whole pipeline to an empty result.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::is_path_ancestor;

/// Decides whether a file lives under one of the configured constant roots.
///
/// Queries are memoized per containing directory. The cache lives as long as
/// this value, which the pipeline creates per run — it is never shared across
/// compiler runs.
#[derive(Debug)]
pub struct ConstantDirMatcher {
    roots: Vec<PathBuf>,
    memo: HashMap<PathBuf, bool>,
}

impl ConstantDirMatcher {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            memo: HashMap::new(),
        }
    }

    /// True iff `path` is nested under (or equal to) any constant root.
    pub fn is_constant(&mut self, path: &Path) -> bool {
        // The root-equal case is answered outside the memo: its result is
        // not a property of the containing directory
        if self.roots.iter().any(|root| root == path) {
            return true;
        }
        // Files sharing a directory share the answer, so the memoized
        // predicate is a function of the directory alone
        let dir = path.parent().unwrap_or(path).to_path_buf();
        if let Some(&hit) = self.memo.get(&dir) {
            return hit;
        }
        let hit = self.roots.iter().any(|root| is_path_ancestor(root, &dir));
        self.memo.insert(dir, hit);
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_file_under_constant_root() {
        let mut matcher = ConstantDirMatcher::new(vec![PathBuf::from("/app/src/constants")]);
        assert!(matcher.is_constant(Path::new("/app/src/constants/colors.js")));
        assert!(matcher.is_constant(Path::new("/app/src/constants/deep/table.js")));
    }

    #[test]
    fn rejects_sibling_with_shared_string_prefix() {
        let mut matcher = ConstantDirMatcher::new(vec![PathBuf::from("/app/src/constants")]);
        assert!(!matcher.is_constant(Path::new("/app/src/constantsExtra/colors.js")));
    }

    #[test]
    fn empty_root_list_matches_nothing() {
        let mut matcher = ConstantDirMatcher::new(Vec::new());
        assert!(!matcher.is_constant(Path::new("/app/src/pages/Home/index.jsx")));
    }

    #[test]
    fn root_query_does_not_leak_into_sibling_files() {
        // Querying the root path itself must not decide for every other
        // file in the root's parent directory
        let mut matcher = ConstantDirMatcher::new(vec![PathBuf::from("/app/src/constants")]);
        assert!(matcher.is_constant(Path::new("/app/src/constants")));
        assert!(!matcher.is_constant(Path::new("/app/src/index.jsx")));

        // Same pair in the opposite order
        let mut matcher = ConstantDirMatcher::new(vec![PathBuf::from("/app/src/constants")]);
        assert!(!matcher.is_constant(Path::new("/app/src/index.jsx")));
        assert!(matcher.is_constant(Path::new("/app/src/constants")));
    }

    #[test]
    fn memo_is_consistent_across_repeat_queries() {
        let mut matcher = ConstantDirMatcher::new(vec![PathBuf::from("/app/src/constants")]);
        let path = Path::new("/app/src/constants/colors.js");
        assert_eq!(matcher.is_constant(path), matcher.is_constant(path));

        // A second file in the same directory takes the memoized path
        assert!(matcher.is_constant(Path::new("/app/src/constants/fonts.js")));
    }
}
