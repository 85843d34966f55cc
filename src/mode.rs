//! Build-mode post-processing
//!
//! Selected once per compiler run and fixed: `build` substitutes the known
//! environment, runs the externally supplied script passes (the host
//! toolchain's downleveling and dead-code-elimination hooks), then minifies
//! every text artifact independently; `dev` runs the same passes without
//! minification and embeds an inline source map when the transform produced
//! a map descriptor, so debuggers trace back to the original source.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

use crate::error::CompileResult;
use crate::minify::{minify_css, minify_js, minify_xml};
use crate::options::{BuildMode, LoaderOptions};
use crate::transform::TransformResult;

/// One externally supplied script pass, run on the compiled script before
/// mode-specific processing. The host toolchain supplies downleveling and
/// dead-code-elimination through this seam.
pub trait ScriptPass: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, code: &str, mode: BuildMode) -> CompileResult<String>;
}

/// The environment expression substituted before the external passes run,
/// so env-conditional branches are prunable downstream.
const NODE_ENV_EXPR: &str = "process.env.NODE_ENV";

fn define_env(code: &str, mode: BuildMode) -> String {
    if code.contains(NODE_ENV_EXPR) {
        code.replace(NODE_ENV_EXPR, &format!("\"{}\"", mode.node_env()))
    } else {
        code.to_string()
    }
}

/// Apply mode-specific processing to a transform result, in place.
///
/// `raw_source` is the original file content; dev builds embed it in the
/// inline source map as `sourcesContent`.
pub fn process(
    result: &mut TransformResult,
    raw_source: &str,
    options: &LoaderOptions,
) -> CompileResult<()> {
    let mut code = define_env(&result.code, options.mode);
    for pass in &options.external_passes {
        code = pass.apply(&code, options.mode)?;
    }

    match options.mode {
        BuildMode::Build => {
            result.code = minify_js(&code);
            if let Some(style) = &result.style {
                result.style = Some(minify_css(style));
            }
            if let Some(template) = &result.template {
                result.template = Some(minify_xml(template));
            }
        }
        BuildMode::Dev => {
            result.code = match result.map.take() {
                Some(map) => attach_source_map(&code, raw_source, &map)?,
                None => code,
            };
        }
    }
    Ok(())
}

/// Append an inline `sourceMappingURL` carrying the map and the original
/// source text.
fn attach_source_map(code: &str, raw_source: &str, map: &str) -> CompileResult<String> {
    let mut map: Value = serde_json::from_str(map)?;
    if let Value::Object(entries) = &mut map {
        entries.insert(
            "sourcesContent".to_string(),
            Value::Array(vec![Value::String(raw_source.to_string())]),
        );
    }
    let encoded = BASE64.encode(serde_json::to_string(&map)?);
    Ok(format!(
        "{code}\n//# sourceMappingURL=data:application/json;charset=utf-8;base64,{encoded}\n"
    ))
}
