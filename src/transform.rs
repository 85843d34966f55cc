//! Source transform adapter
//!
//! The JSX parser and code generator live outside this crate; they are
//! consumed through the [`SourceTransform`] trait. The adapter invokes the
//! service exactly once per file and registers every file dependency the
//! service reports with the host build graph, so edits to those files
//! invalidate this compilation.
//!
//! A transform failure is fatal for the file's build subtree and is never
//! retried.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CompileResult;
use crate::options::Platform;

/// What kind of compilation unit the service is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilationUnit {
    App,
    Page,
    Component,
}

/// Resource descriptor handed to the transform service alongside the raw
/// source text.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// Absolute path of the file being compiled
    pub resource_path: PathBuf,
    /// Root of the source tree (directory of the entry path)
    pub source_root: PathBuf,
    /// Root of the output tree
    pub output_root: PathBuf,
    /// Unit kind; the component pipeline always requests `Component`
    pub unit: CompilationUnit,
    /// Target platform descriptor
    pub platform: Platform,
}

/// Structured result of transforming one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformResult {
    /// Compiled script text
    pub code: String,
    /// Markup template text
    pub template: Option<String>,
    /// Stylesheet text
    pub style: Option<String>,
    /// Component configuration, serialized to JSON on emission. May carry a
    /// `usingComponents` object mapping short tag names to module paths.
    pub config: Map<String, Value>,
    /// Source map descriptor (JSON text), present in dev builds when the
    /// service produced one
    pub map: Option<String>,
    /// Files whose edits must invalidate this compilation
    pub dependencies: Vec<PathBuf>,
    /// Module specifiers this file imports, as written in the source
    pub imported: Vec<String>,
    /// Auxiliary assets discovered by the transform: path relative to the
    /// output root → contents
    pub assets: BTreeMap<String, String>,
    /// Named sub-templates to write as companion files next to a
    /// single-file package: file stem → contents
    pub sub_templates: BTreeMap<String, String>,
    /// Import statements to prepend inside a single-file package
    pub import_components: Vec<String>,
}

/// External source-transform service.
///
/// Implementations parse the component source and generate script, template,
/// style, and configuration. Semantic correctness of the UI code is their
/// concern, not this crate's.
pub trait SourceTransform {
    fn transform(&self, source: &str, request: &TransformRequest)
        -> CompileResult<TransformResult>;
}

/// Host build graph seam: receives file-dependency registrations so the
/// host's watch/invalidate machinery can track them.
pub trait BuildGraph {
    fn add_file_dependency(&mut self, path: &Path);
}

/// Build graph that discards registrations, for hosts without incremental
/// rebuild support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGraph;

impl BuildGraph for NullGraph {
    fn add_file_dependency(&mut self, _path: &Path) {}
}

/// Invoke the transform service once and register reported dependencies.
pub fn run_transform(
    service: &dyn SourceTransform,
    source: &str,
    request: &TransformRequest,
    graph: &mut dyn BuildGraph,
) -> CompileResult<TransformResult> {
    let result = service.transform(source, request)?;
    for dependency in &result.dependencies {
        graph.add_file_dependency(dependency);
    }
    Ok(result)
}
