//! Property tests for config rewriting and path math.

use std::path::PathBuf;

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use minicomp::config_rewrite::rewrite_using_components;
use minicomp::paths::{normalize_lexical, remove_ext};
use minicomp::USING_COMPONENTS;

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

    /// PROPERTY: Round trip — a reserved-prefix entry with an absolute
    /// value under the source root rewrites to a relative, extension-free
    /// path that resolves back to the original file (minus extension).
    #[test]
    fn property_rewrite_round_trips(
        dir in segments(4),
        component in segments(3),
        ext in prop_oneof![Just(".jsx"), Just(".js")],
    ) {
        let resource_dir = to_path(&dir);
        let mut absolute = resource_dir.clone();
        for s in &component {
            absolute.push(s);
        }
        let mut absolute_str = absolute.to_string_lossy().to_string();
        absolute_str.push_str(ext);

        let mut config = Map::new();
        config.insert(
            USING_COMPONENTS.to_string(),
            json!({ "c-comp": absolute_str }),
        );
        rewrite_using_components(&mut config, &resource_dir);

        let rewritten = config[USING_COMPONENTS]["c-comp"].as_str().unwrap().to_string();
        prop_assert!(!rewritten.starts_with('/'));
        prop_assert!(rewritten.starts_with('.'));
        prop_assert!(!rewritten.ends_with(ext));

        let resolved = normalize_lexical(&resource_dir.join(&rewritten));
        prop_assert_eq!(resolved, absolute);
    }

    /// PROPERTY: Non-reserved keys survive rewriting byte for byte.
    #[test]
    fn property_builtin_entries_untouched(
        key in "[a-b][a-z]{0,6}",
        value in "[a-z/:._-]{1,30}",
    ) {
        prop_assume!(!key.starts_with("c-"));
        let mut using = Map::new();
        using.insert(key.clone(), Value::String(value.clone()));
        let mut config = Map::new();
        config.insert(USING_COMPONENTS.to_string(), Value::Object(using));
        rewrite_using_components(&mut config, &PathBuf::from("/app/src"));

        prop_assert_eq!(config[USING_COMPONENTS][&key].clone(), Value::String(value));
    }

    /// PROPERTY: Extension stripping yields a prefix of its input, and a
    /// path whose final segment has no dot passes through unchanged.
    #[test]
    fn property_remove_ext_is_prefix(path in "[a-zA-Z0-9./_-]{0,60}") {
        let stripped = remove_ext(&path);
        prop_assert!(path.starts_with(&stripped));

        let last = path.rsplit('/').next().unwrap_or(&path);
        if !last.contains('.') {
            prop_assert_eq!(stripped, path.clone());
        }
    }
}
