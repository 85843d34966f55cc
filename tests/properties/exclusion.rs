//! Property tests for the constant-directory exclusion filter.

use std::path::PathBuf;

use proptest::prelude::*;

use minicomp::ConstantDirMatcher;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9]{0,7}").unwrap()
}

fn segments(max: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..=max)
}

fn to_path(segments: &[String]) -> PathBuf {
    let mut path = PathBuf::from("/");
    for s in segments {
        path.push(s);
    }
    path
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A file under a configured root always matches, for any
    /// nesting depth.
    #[test]
    fn property_nested_file_matches_ancestor_root(
        root in segments(4),
        nested in segments(4),
    ) {
        let mut matcher = ConstantDirMatcher::new(vec![to_path(&root)]);
        let mut full = root.clone();
        full.extend(nested);
        prop_assert!(matcher.is_constant(&to_path(&full)));
    }

    /// PROPERTY: Extending the last root segment with extra characters
    /// breaks segment alignment, so the path must not match even though the
    /// root is a string prefix of it.
    #[test]
    fn property_string_prefix_without_boundary_never_matches(
        root in segments(4),
        suffix in "[a-z0-9]{1,4}",
        file in segment(),
    ) {
        let mut sibling = root.clone();
        let last = sibling.last_mut().unwrap();
        last.push_str(&suffix);
        sibling.push(file);

        let mut matcher = ConstantDirMatcher::new(vec![to_path(&root)]);
        prop_assert!(!matcher.is_constant(&to_path(&sibling)));
    }

    /// PROPERTY: Matching is pure per path — repeated queries agree, with
    /// and without the memo warm.
    #[test]
    fn property_repeat_queries_agree(
        root in segments(3),
        path in segments(6),
    ) {
        let mut matcher = ConstantDirMatcher::new(vec![to_path(&root)]);
        let p = to_path(&path);
        let first = matcher.is_constant(&p);
        prop_assert_eq!(first, matcher.is_constant(&p));
    }
}
