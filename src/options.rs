//! Loader options and target platform descriptors
//!
//! A [`LoaderOptions`] value is passed into every pipeline invocation and is
//! never mutated — recursive child compilations inherit the platform, entry
//! path, and constant-directory list through [`ChildOptions`], never the
//! per-file resource path.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::mode::ScriptPass;

/// Compilation profile, fixed for a whole compiler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Production: syntax downleveling, dead-code elimination, minification
    Build,
    /// Development: light transform, inline source maps
    Dev,
}

impl BuildMode {
    /// Value substituted for `process.env.NODE_ENV` before dead-code
    /// elimination runs.
    pub fn node_env(self) -> &'static str {
        match self {
            BuildMode::Build => "production",
            BuildMode::Dev => "development",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Build => write!(f, "build"),
            BuildMode::Dev => write!(f, "dev"),
        }
    }
}

/// Rewrite rule for platform-specific style units, e.g. `rpx` → `px` on
/// single-file targets whose runtime has no relative-size unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRewrite {
    pub from: String,
    pub to: String,
}

/// Target platform descriptor: artifact extensions and output layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    /// Platform identifier, e.g. `ali-miniapp`
    pub name: String,
    /// Markup template extension, with leading dot
    pub template_extension: String,
    /// Stylesheet extension, with leading dot
    pub style_extension: String,
    /// One packaged file per component instead of separate artifacts
    pub single_file: bool,
    /// Style unit rewrite applied on emission, if the target needs one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unit_rewrite: Option<UnitRewrite>,
}

impl Platform {
    /// Alibaba mini-app target: `.axml` templates, `.acss` styles,
    /// multi-file layout.
    pub fn ali_miniapp() -> Self {
        Self {
            name: "ali-miniapp".to_string(),
            template_extension: ".axml".to_string(),
            style_extension: ".acss".to_string(),
            single_file: false,
            unit_rewrite: None,
        }
    }

    /// WeChat mini-program target: `.wxml` templates, `.wxss` styles,
    /// multi-file layout.
    pub fn wechat_miniprogram() -> Self {
        Self {
            name: "wechat-miniprogram".to_string(),
            template_extension: ".wxml".to_string(),
            style_extension: ".wxss".to_string(),
            single_file: false,
            unit_rewrite: None,
        }
    }

    /// Quick-app target: one packaged `.ux` file per component, `rpx`
    /// rewritten to `px` since the runtime has no relative unit.
    pub fn quickapp() -> Self {
        Self {
            name: "quickapp".to_string(),
            template_extension: ".ux".to_string(),
            style_extension: ".css".to_string(),
            single_file: true,
            unit_rewrite: Some(UnitRewrite {
                from: "rpx".to_string(),
                to: "px".to_string(),
            }),
        }
    }
}

/// The subset of [`LoaderOptions`] a recursive child compilation inherits.
///
/// Serialized into the generated dependency glue so a host module graph can
/// re-enter the pipeline with identical settings. The per-file resource path
/// is deliberately absent: the host resolves it from the module specifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildOptions {
    pub entry_path: PathBuf,
    pub platform: Platform,
    pub constant_dir: Vec<PathBuf>,
}

/// Configuration passed into every pipeline invocation.
#[derive(Clone)]
pub struct LoaderOptions {
    /// Target platform descriptor
    pub platform: Platform,
    /// Logical root of the compiled app, relative to the project root
    /// (e.g. `src/app.js`); anchors source-to-output path mapping
    pub entry_path: PathBuf,
    /// Source subtrees excluded from compilation
    pub constant_dirs: Vec<PathBuf>,
    /// Compilation profile, fixed for the run
    pub mode: BuildMode,
    /// Externally supplied script passes, run in order before the
    /// mode-specific processing
    pub external_passes: Vec<Arc<dyn ScriptPass>>,
}

impl LoaderOptions {
    pub fn new(platform: Platform, entry_path: impl Into<PathBuf>, mode: BuildMode) -> Self {
        Self {
            platform,
            entry_path: entry_path.into(),
            constant_dirs: Vec::new(),
            mode,
            external_passes: Vec::new(),
        }
    }

    /// Add constant (never-compiled) directory roots.
    pub fn with_constant_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.constant_dirs = dirs;
        self
    }

    /// Append an external script pass.
    pub fn with_pass(mut self, pass: Arc<dyn ScriptPass>) -> Self {
        self.external_passes.push(pass);
        self
    }

    /// The option subset a child compilation inherits.
    pub fn inherit(&self) -> ChildOptions {
        ChildOptions {
            entry_path: self.entry_path.clone(),
            platform: self.platform.clone(),
            constant_dir: self.constant_dirs.clone(),
        }
    }
}

impl fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("platform", &self.platform)
            .field("entry_path", &self.entry_path)
            .field("constant_dirs", &self.constant_dirs)
            .field("mode", &self.mode)
            .field(
                "external_passes",
                &self
                    .external_passes
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
