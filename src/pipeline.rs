//! Per-file component compilation pipeline
//!
//! One [`Pipeline`] value corresponds to one compiler run: it holds the
//! loader options, the per-run constant-directory memo, and the set of
//! in-flight component paths used for cycle detection. The host build
//! orchestrator invokes [`Pipeline::compile_file`] once per source file and
//! schedules the returned children itself — recursion is data, not a direct
//! call, so sibling ordering is the host's choice.
//!
//! Per-file flow: exclusion filter → source transform → config rewrite →
//! dependency classification → mode processing → artifact emission.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config_rewrite::rewrite_using_components;
use crate::constant_dir::ConstantDirMatcher;
use crate::deps::{classify_imports, render_glue, DependencyDescriptor};
use crate::emit::{emit, Artifact};
use crate::error::CompileResult;
use crate::fs::{FileSystem, LocalFs};
use crate::mode;
use crate::options::LoaderOptions;
use crate::paths::{normalize_lexical, OutputPathSet};
use crate::transform::{
    run_transform, BuildGraph, CompilationUnit, SourceTransform, TransformRequest,
};

/// Result of compiling one source file.
#[derive(Debug)]
pub struct CompileOutput {
    /// Generated import glue for the host module graph; empty for excluded
    /// files
    pub glue: String,
    /// Every imported module, classified
    pub dependencies: Vec<DependencyDescriptor>,
    /// Artifacts written to the output tree, in write order
    pub artifacts: Vec<Artifact>,
    /// Resolved (extension-stripped) paths of custom components that still
    /// need compilation — already-in-flight paths are omitted, which bounds
    /// cyclic references
    pub children: Vec<PathBuf>,
    /// True iff the file was under a constant directory and short-circuited
    pub excluded: bool,
}

impl CompileOutput {
    fn excluded() -> Self {
        Self {
            glue: String::new(),
            dependencies: Vec::new(),
            artifacts: Vec::new(),
            children: Vec::new(),
            excluded: true,
        }
    }
}

/// The component compilation pipeline for one compiler run.
pub struct Pipeline {
    options: LoaderOptions,
    source_root: PathBuf,
    output_root: PathBuf,
    transform: Box<dyn SourceTransform>,
    fs: Box<dyn FileSystem>,
    constant_dirs: ConstantDirMatcher,
    in_flight: HashSet<PathBuf>,
}

impl Pipeline {
    /// Create a pipeline rooted at `project_root`, writing under
    /// `output_root`. The source root is the entry path's directory inside
    /// the project root.
    pub fn new(
        options: LoaderOptions,
        project_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        transform: Box<dyn SourceTransform>,
    ) -> Self {
        let project_root = project_root.into();
        let source_root = match options.entry_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => project_root.join(parent),
            _ => project_root,
        };
        let constant_dirs = ConstantDirMatcher::new(options.constant_dirs.clone());
        Self {
            options,
            source_root,
            output_root: output_root.into(),
            transform,
            fs: Box::new(LocalFs::new()),
            constant_dirs,
            in_flight: HashSet::new(),
        }
    }

    /// Replace the file system implementation (tests use an in-memory one).
    pub fn with_fs(mut self, fs: Box<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Compile one source file: transform, rewrite, post-process, emit.
    ///
    /// Returns the generated glue and the child components the host should
    /// schedule next. Fatal on transform rejection or write failure; no
    /// stage is retried.
    pub fn compile_file(
        &mut self,
        resource_path: &Path,
        graph: &mut dyn BuildGraph,
    ) -> CompileResult<CompileOutput> {
        if self.constant_dirs.is_constant(resource_path) {
            return Ok(CompileOutput::excluded());
        }
        self.in_flight.insert(in_flight_key(resource_path));

        let raw = self.fs.read_to_string(resource_path)?;
        let request = TransformRequest {
            resource_path: resource_path.to_path_buf(),
            source_root: self.source_root.clone(),
            output_root: self.output_root.clone(),
            unit: CompilationUnit::Component,
            platform: self.options.platform.clone(),
        };
        let mut result = run_transform(self.transform.as_ref(), &raw, &request, graph)?;

        let resource_dir = resource_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        rewrite_using_components(&mut result.config, &resource_dir);

        let dependencies =
            classify_imports(&result.imported, &result.config, &resource_dir, &self.options);
        let children = self.schedule(&dependencies);

        mode::process(&mut result, &raw, &self.options)?;

        let out = OutputPathSet::derive(
            resource_path,
            &self.source_root,
            &self.output_root,
            &self.options.platform,
        )?;
        let artifacts = emit(&result, &out, &self.options, self.fs.as_ref())?;

        let glue = render_glue(resource_path, &dependencies)?;
        Ok(CompileOutput {
            glue,
            dependencies,
            artifacts,
            children,
            excluded: false,
        })
    }

    /// Collect the custom-component paths not yet in flight this run.
    fn schedule(&mut self, dependencies: &[DependencyDescriptor]) -> Vec<PathBuf> {
        let mut children = Vec::new();
        for dependency in dependencies {
            let Some(resolved) = &dependency.resolved else {
                continue;
            };
            if self.in_flight.insert(in_flight_key(resolved)) {
                children.push(resolved.clone());
            }
        }
        children
    }
}

/// Cycle-detection key: lexically normalized, extension-stripped, so the
/// import target `.../component` and the file `.../component.jsx` collide.
fn in_flight_key(path: &Path) -> PathBuf {
    normalize_lexical(path).with_extension("")
}
