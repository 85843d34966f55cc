//! Dependency resolution and import glue generation
//!
//! Every module a file imports is classified either as a custom UI component
//! (it must re-enter this pipeline) or as a plain module (left to the host's
//! default resolution). Classification checks whether the import, resolved
//! against the importing file's directory, is a directory-boundary-aware
//! prefix of any rewritten `usingComponents` value.
//!
//! Recursive compilation is expressed as data: a [`DependencyDescriptor`] is
//! a typed "compile file X with options Y" value. The string glue consumed
//! by import-based host module graphs is rendered from the descriptors.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config_rewrite::USING_COMPONENTS;
use crate::error::CompileResult;
use crate::options::{ChildOptions, LoaderOptions};
use crate::paths::normalize_lexical;

/// Marker routing a chained import back through the component pipeline.
pub const COMPONENT_LOADER: &str = "minicomp/component-loader";

/// One imported module, classified.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyDescriptor {
    /// Module specifier as written in the source
    pub specifier: String,
    /// True iff this import names a custom UI component
    pub custom_component: bool,
    /// Lexically resolved absolute path, present for custom components;
    /// the host build graph deduplicates scheduled compilations by it
    pub resolved: Option<PathBuf>,
    /// Options the chained compilation inherits, present for custom
    /// components
    pub options: Option<ChildOptions>,
}

impl DependencyDescriptor {
    fn plain(specifier: &str) -> Self {
        Self {
            specifier: specifier.to_string(),
            custom_component: false,
            resolved: None,
            options: None,
        }
    }

    fn custom(specifier: &str, resolved: PathBuf, options: ChildOptions) -> Self {
        Self {
            specifier: specifier.to_string(),
            custom_component: true,
            resolved: Some(resolved),
            options: Some(options),
        }
    }
}

/// Classify every imported module of one file.
///
/// `config` is the rewritten configuration: its `usingComponents` values are
/// relative specifiers rooted at `resource_dir`. An import matching no entry
/// is conservatively a plain module, even if it happens to be a component
/// file.
pub fn classify_imports(
    imported: &[String],
    config: &Map<String, Value>,
    resource_dir: &Path,
    options: &LoaderOptions,
) -> Vec<DependencyDescriptor> {
    let component_paths = component_paths(config, resource_dir);

    imported
        .iter()
        .map(|specifier| {
            if !specifier.starts_with('.') {
                return DependencyDescriptor::plain(specifier);
            }
            let candidate = normalize_lexical(&resource_dir.join(specifier));
            if component_paths
                .iter()
                .any(|target| prefix_matches(&candidate, target))
            {
                DependencyDescriptor::custom(specifier, candidate, options.inherit())
            } else {
                DependencyDescriptor::plain(specifier)
            }
        })
        .collect()
}

/// Absolute paths of every custom component the configuration references.
fn component_paths(config: &Map<String, Value>, resource_dir: &Path) -> Vec<PathBuf> {
    let Some(Value::Object(using)) = config.get(USING_COMPONENTS) else {
        return Vec::new();
    };
    using
        .values()
        .filter_map(Value::as_str)
        .filter(|reference| reference.starts_with('.'))
        .map(|reference| normalize_lexical(&resource_dir.join(reference)))
        .collect()
}

/// True iff `candidate` equals `target` or is an ancestor prefix ending at a
/// path-segment or extension boundary (so `.../Repo` matches `.../Repo.jsx`
/// and `.../Repo/index`, but never `.../RepoList`).
fn prefix_matches(candidate: &Path, target: &Path) -> bool {
    let candidate = candidate.to_string_lossy();
    let target = target.to_string_lossy();
    match target.strip_prefix(&*candidate) {
        Some("") => true,
        Some(rest) => rest.starts_with('/') || rest.starts_with('.'),
        None => false,
    }
}

/// Render the import glue returned to the host module graph: a provenance
/// banner, then one statement per dependency. Custom components are routed
/// through a chained pipeline invocation carrying their inherited options.
pub fn render_glue(
    resource_path: &Path,
    dependencies: &[DependencyDescriptor],
) -> CompileResult<String> {
    let mut lines = Vec::with_capacity(dependencies.len() + 1);
    lines.push(format!(
        "/* Generated by the minicomp component pipeline, sourceFile: {}. */",
        resource_path.display()
    ));

    for dependency in dependencies {
        let request = match &dependency.options {
            Some(options) => format!(
                "{}?{}!{}",
                COMPONENT_LOADER,
                serde_json::to_string(options)?,
                dependency.specifier
            ),
            None => dependency.specifier.clone(),
        };
        lines.push(format!("import '{request}';"));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BuildMode, Platform};
    use serde_json::json;

    fn options() -> LoaderOptions {
        LoaderOptions::new(Platform::ali_miniapp(), "src/app.js", BuildMode::Build)
    }

    fn config(using: Value) -> Map<String, Value> {
        let mut config = Map::new();
        config.insert(USING_COMPONENTS.to_string(), using);
        config
    }

    #[test]
    fn import_matching_using_components_is_custom() {
        let config = config(json!({ "c-repo": "./components/Repo" }));
        let imported = vec!["./components/Repo".to_string()];

        let deps = classify_imports(
            &imported,
            &config,
            Path::new("/app/src/pages/Home"),
            &options(),
        );

        assert_eq!(deps.len(), 1);
        assert!(deps[0].custom_component);
        assert_eq!(
            deps[0].resolved.as_deref(),
            Some(Path::new("/app/src/pages/Home/components/Repo"))
        );
        assert_eq!(deps[0].options.as_ref().unwrap().entry_path, Path::new("src/app.js"));
    }

    #[test]
    fn bare_specifier_is_plain() {
        let config = config(json!({ "c-repo": "./components/Repo" }));
        let imported = vec!["rax-view".to_string()];

        let deps = classify_imports(&imported, &config, Path::new("/app/src"), &options());

        assert_eq!(deps, vec![DependencyDescriptor::plain("rax-view")]);
    }

    #[test]
    fn relative_import_without_matching_entry_is_plain() {
        let config = config(json!({ "c-repo": "./components/Repo" }));
        let imported = vec!["./helpers/format".to_string()];

        let deps = classify_imports(&imported, &config, Path::new("/app/src"), &options());

        assert!(!deps[0].custom_component);
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let config = config(json!({ "c-list": "./components/RepoList" }));
        let imported = vec!["./components/Repo".to_string()];

        let deps = classify_imports(&imported, &config, Path::new("/app/src"), &options());

        // "./components/Repo" is a string prefix of "./components/RepoList"
        // but not a path-boundary match
        assert!(!deps[0].custom_component);
    }

    #[test]
    fn extension_boundary_still_matches() {
        let config = config(json!({ "c-repo": "./components/Repo.jsx" }));
        let imported = vec!["./components/Repo".to_string()];

        let deps = classify_imports(&imported, &config, Path::new("/app/src"), &options());

        assert!(deps[0].custom_component);
    }

    #[test]
    fn parent_relative_import_resolves_before_matching() {
        let config = config(json!({ "c-logo": "../../shared/Logo" }));
        let imported = vec!["../../shared/Logo".to_string()];

        let deps = classify_imports(
            &imported,
            &config,
            Path::new("/app/src/pages/Home"),
            &options(),
        );

        assert!(deps[0].custom_component);
        assert_eq!(
            deps[0].resolved.as_deref(),
            Some(Path::new("/app/src/shared/Logo"))
        );
    }

    #[test]
    fn glue_contains_banner_and_one_statement_per_import() {
        let deps = vec![
            DependencyDescriptor::custom(
                "./component",
                PathBuf::from("/app/src/pages/Home/component"),
                options().inherit(),
            ),
            DependencyDescriptor::plain("rax-view"),
        ];

        let glue = render_glue(Path::new("/app/src/pages/Home/index.jsx"), &deps).unwrap();

        let lines: Vec<&str> = glue.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("/* Generated by the minicomp component pipeline"));
        assert!(lines[1].starts_with(&format!("import '{COMPONENT_LOADER}?")));
        assert!(lines[1].contains("\"entryPath\":\"src/app.js\""));
        assert!(lines[1].ends_with("!./component';"));
        assert_eq!(lines[2], "import 'rax-view';");
    }

    #[test]
    fn glue_for_no_dependencies_is_banner_only() {
        let glue = render_glue(Path::new("/app/src/index.jsx"), &[]).unwrap();
        assert_eq!(glue.lines().count(), 1);
    }
}
