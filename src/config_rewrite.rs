//! Component configuration rewriting
//!
//! The transform reports `usingComponents` values as absolute (or
//! adapter-relative) module paths. The emitted JSON must be portable: custom
//! component entries are rewritten to extension-stripped paths relative to
//! the compiled file's directory, so the configuration resolves against
//! sibling artifacts wherever the output tree is mounted. Built-in platform
//! components (keys without the reserved prefix) pass through unchanged.

use std::path::Path;

use serde_json::{Map, Value};

use crate::paths::{relative_path, remove_ext, to_specifier};

/// Reserved lexical prefix marking a tag name as a custom component.
pub const CUSTOM_COMPONENT_PREFIX: &str = "c-";

/// Key of the component-reference object inside the configuration.
pub const USING_COMPONENTS: &str = "usingComponents";

/// Rewrite custom-component references in place.
///
/// `resource_dir` is the directory containing the source file being
/// compiled. Entries whose value is not a string are left untouched
/// (best effort, resolution failures surface later in the host build).
pub fn rewrite_using_components(config: &mut Map<String, Value>, resource_dir: &Path) {
    let Some(Value::Object(using)) = config.get_mut(USING_COMPONENTS) else {
        return;
    };

    for (key, value) in using.iter_mut() {
        if !key.starts_with(CUSTOM_COMPONENT_PREFIX) {
            continue;
        }
        let Value::String(path) = value else {
            continue;
        };
        *path = rewrite_reference(path, resource_dir);
    }
}

fn rewrite_reference(reference: &str, resource_dir: &Path) -> String {
    let anchored = if reference.starts_with('/') {
        to_specifier(&relative_path(resource_dir, Path::new(reference)))
    } else if reference.starts_with("./") || reference.starts_with("../") {
        reference.to_string()
    } else {
        format!("./{reference}")
    };
    remove_ext(&anchored)
}
