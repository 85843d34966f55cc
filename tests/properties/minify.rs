//! Property tests for the lightweight minifiers.

use proptest::prelude::*;

use minicomp::minify::{minify_css, minify_js, minify_xml};

fn printable() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ -~\\n]{0,200}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 192,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Minification only deletes, so output never exceeds input.
    #[test]
    fn property_minify_is_monotonic(input in printable()) {
        prop_assert!(minify_js(&input).len() <= input.len());
        prop_assert!(minify_css(&input).len() <= input.len());
        prop_assert!(minify_xml(&input).len() <= input.len());
    }

    /// PROPERTY: Minifiers never panic on arbitrary printable input.
    #[test]
    fn property_minify_total(input in printable()) {
        let _ = minify_js(&input);
        let _ = minify_css(&input);
        let _ = minify_xml(&input);
    }

    /// PROPERTY: Stylesheet minification reaches a fixed point: a second
    /// pass changes nothing.
    #[test]
    fn property_minify_css_fixed_point(input in printable()) {
        let once = minify_css(&input);
        prop_assert_eq!(minify_css(&once), once.clone());
    }
}
