//! Path math for source-to-output mapping
//!
//! Everything here is lexical: no function touches the file system, so
//! [`OutputPathSet`] derivation stays a pure function of its inputs.

use std::path::{Component, Path, PathBuf};

use crate::error::{CompileError, CompileResult};
use crate::options::Platform;

/// Strip the final extension from a specifier-style path string.
///
/// `./components/Repo.jsx` → `./components/Repo`. A dot inside a directory
/// segment is left alone, as is a dotless final segment.
pub fn remove_ext(path: &str) -> String {
    let last_slash = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[last_slash..].rfind('.') {
        // A leading dot names a hidden file, not an extension
        Some(0) => path.to_string(),
        Some(dot) => path[..last_slash + dot].to_string(),
        None => path.to_string(),
    }
}

/// True iff `root` is a path-segment-wise ancestor of (or equal to) `path`.
///
/// Segment-aligned so that `/a/b` does not match `/a/bc/file`.
pub fn is_path_ancestor(root: &Path, path: &Path) -> bool {
    let mut path_components = path.components();
    for root_component in root.components() {
        match path_components.next() {
            Some(c) if c == root_component => continue,
            _ => return false,
        }
    }
    true
}

/// Compute the relative path from `from_dir` to `to`, both absolute.
///
/// Mirrors `path.relative`: shared leading components are dropped, the
/// remainder of `from_dir` becomes `..` segments.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from_dir.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part);
    }
    result
}

/// Resolve `.` and `..` segments lexically, without touching the file
/// system. `..` at the root is dropped.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push("..");
                }
            }
            other => result.push(other),
        }
    }
    result
}

/// Render a path as a `./`-anchored, slash-separated module specifier.
pub fn to_specifier(path: &Path) -> String {
    let joined = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if joined.starts_with("../") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// The output locations for every artifact a compiled component may emit.
///
/// Derived deterministically from the resource path, the source root, the
/// output root, and the platform extension map. The resource's path relative
/// to the source root is mirrored under the output root with per-artifact
/// extensions substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPathSet {
    /// Compiled script (`.js`)
    pub code: PathBuf,
    /// Markup template (platform extension)
    pub template: PathBuf,
    /// Stylesheet (platform extension)
    pub style: PathBuf,
    /// JSON configuration (`.json`)
    pub config: PathBuf,
    /// Root of the auxiliary-asset subtree
    pub assets_root: PathBuf,
}

impl OutputPathSet {
    pub fn derive(
        resource_path: &Path,
        source_root: &Path,
        output_root: &Path,
        platform: &Platform,
    ) -> CompileResult<Self> {
        let relative = resource_path.strip_prefix(source_root).map_err(|_| {
            CompileError::OutsideSourceRoot {
                path: resource_path.to_path_buf(),
                root: source_root.to_path_buf(),
            }
        })?;

        let stem = output_root.join(relative).with_extension("");
        let with_ext = |ext: &str| {
            let mut s = stem.clone().into_os_string();
            s.push(ext);
            PathBuf::from(s)
        };

        Ok(Self {
            code: with_ext(".js"),
            template: with_ext(&platform.template_extension),
            style: with_ext(&platform.style_extension),
            config: with_ext(".json"),
            assets_root: output_root.join("assets"),
        })
    }
}
