//! minicomp - component compilation pipeline for mini-program build targets
//!
//! minicomp takes declarative UI component sources (JSX-like files mixing
//! markup, logic, and style) and produces the multi-artifact bundle a
//! mini-program runtime requires: compiled script, markup template,
//! stylesheet, and JSON configuration — or one packaged file on single-file
//! targets.
//!
//! The JSX parser/code generator is an external collaborator consumed
//! through [`SourceTransform`]; this crate orchestrates transform
//! invocation, recursive custom-component dependency resolution, config
//! path rewriting, build/dev post-processing, and artifact emission. A host
//! build orchestrator invokes [`Pipeline::compile_file`] once per file and
//! schedules the returned children.

pub mod config_rewrite;
pub mod constant_dir;
pub mod deps;
pub mod emit;
pub mod error;
pub mod fs;
pub mod minify;
pub mod mode;
pub mod options;
pub mod paths;
pub mod pipeline;
pub mod transform;

// Re-exports for convenience
pub use config_rewrite::{CUSTOM_COMPONENT_PREFIX, USING_COMPONENTS};
pub use constant_dir::ConstantDirMatcher;
pub use deps::{DependencyDescriptor, COMPONENT_LOADER};
pub use emit::Artifact;
pub use error::{CompileError, CompileResult};
pub use fs::{FileSystem, LocalFs};
pub use mode::ScriptPass;
pub use options::{BuildMode, ChildOptions, LoaderOptions, Platform, UnitRewrite};
pub use paths::OutputPathSet;
pub use pipeline::{CompileOutput, Pipeline};
pub use transform::{
    BuildGraph, CompilationUnit, NullGraph, SourceTransform, TransformRequest, TransformResult,
};
