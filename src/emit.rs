//! Artifact emission
//!
//! Writes the finalized artifacts of one compiled component into the output
//! tree. Parent directories are created before every write (idempotent), and
//! each output path is owned by exactly one compiling file — the emitter
//! relies on that invariant but does not enforce it.
//!
//! Multi-file platforms get separate script/template/style/config files;
//! single-file platforms get one package combining markup, an embedded
//! script block, and a stylesheet reference link, with named sub-templates
//! written as companion files alongside it.

use std::path::{Path, PathBuf};

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::CompileResult;
use crate::fs::FileSystem;
use crate::minify::minify_asset;
use crate::options::{BuildMode, LoaderOptions};
use crate::paths::{relative_path, to_specifier, OutputPathSet};
use crate::transform::TransformResult;

/// One written output file, with a lazily computed content hash that host
/// incremental layers can compare across builds.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    path: PathBuf,
    content: String,
    hash: Option<String>,
}

impl Artifact {
    fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            hash: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Compute and cache the SHA-256 content hash.
    pub fn hash(&mut self) -> &str {
        if self.hash.is_none() {
            let mut hasher = Sha256::new();
            hasher.update(self.content.as_bytes());
            self.hash = Some(format!("sha256:{:x}", hasher.finalize()));
        }
        self.hash.as_deref().unwrap_or_default()
    }
}

/// Write every present artifact of `result` to its output location.
///
/// Returns the artifacts in the order written. Order between artifacts does
/// not affect correctness; directory creation always completes before the
/// corresponding write.
pub fn emit(
    result: &TransformResult,
    out: &OutputPathSet,
    options: &LoaderOptions,
    fs: &dyn FileSystem,
) -> CompileResult<Vec<Artifact>> {
    let mut written = Vec::new();
    let style = result.style.as_deref().map(|style| rewrite_units(style, options));

    if options.platform.single_file {
        match &result.template {
            Some(template) => {
                let package = assemble_package(result, template, style.as_deref(), out);
                write_artifact(&mut written, fs, &out.template, &package)?;
            }
            // No markup to package; the script still ships as its own file
            None => write_artifact(&mut written, fs, &out.code, &result.code)?,
        }

        for (stem, content) in &result.sub_templates {
            let companion = out
                .template
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{stem}{}", options.platform.template_extension));
            write_artifact(&mut written, fs, &companion, content)?;
        }
    } else {
        write_artifact(&mut written, fs, &out.code, &result.code)?;
        if let Some(template) = &result.template {
            write_artifact(&mut written, fs, &out.template, template)?;
        }
    }

    if let Some(style) = &style {
        write_artifact(&mut written, fs, &out.style, style)?;
    }

    let config = serialize_config(&result.config, options.mode)?;
    write_artifact(&mut written, fs, &out.config, &config)?;

    for (asset, content) in &result.assets {
        let target = out.assets_root.join(asset);
        let content = match options.mode {
            BuildMode::Build => minify_asset(content, &asset_extension(asset)),
            BuildMode::Dev => content.clone(),
        };
        write_artifact(&mut written, fs, &target, &content)?;
    }

    Ok(written)
}

/// Create the parent directory, then write; records the artifact.
fn write_artifact(
    written: &mut Vec<Artifact>,
    fs: &dyn FileSystem,
    path: &Path,
    content: &str,
) -> CompileResult<()> {
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent)?;
    }
    fs.write(path, content)?;
    written.push(Artifact::new(path, content));
    Ok(())
}

/// One packaged file: child-component imports, markup, embedded script,
/// stylesheet reference.
fn assemble_package(
    result: &TransformResult,
    template: &str,
    style: Option<&str>,
    out: &OutputPathSet,
) -> String {
    let mut package = String::new();
    for import in &result.import_components {
        package.push_str(import);
        package.push('\n');
    }
    package.push_str(template);
    package.push('\n');
    if !result.code.is_empty() {
        package.push_str(&format!("<script>\n{}\n</script>\n", result.code));
    }
    if style.is_some() {
        let template_dir = out.template.parent().unwrap_or_else(|| Path::new("."));
        let href = to_specifier(&relative_path(template_dir, &out.style));
        package.push_str(&format!("<style src=\"{href}\"></style>\n"));
    }
    package
}

fn rewrite_units(style: &str, options: &LoaderOptions) -> String {
    match &options.platform.unit_rewrite {
        Some(rule) => style.replace(&rule.from, &rule.to),
        None => style.to_string(),
    }
}

fn serialize_config(config: &serde_json::Map<String, Value>, mode: BuildMode) -> CompileResult<String> {
    let value = Value::Object(config.clone());
    Ok(match mode {
        BuildMode::Build => serde_json::to_string(&value)?,
        BuildMode::Dev => serde_json::to_string_pretty(&value)?,
    })
}

fn asset_extension(asset: &str) -> String {
    match asset.rsplit('/').next().and_then(|name| name.rfind('.')) {
        Some(dot) if dot > 0 => {
            let name = asset.rsplit('/').next().unwrap_or(asset);
            name[dot..].to_string()
        }
        _ => String::new(),
    }
}
