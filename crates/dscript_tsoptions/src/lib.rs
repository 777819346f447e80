//! dscript_tsoptions: tsconfig.json parsing.
//!
//! Only `compilerOptions.paths` matters to the loader: it must hold a
//! single `"*"` entry listing the directories searched for imports. The
//! directory holding the config file becomes the project base path.

use dscript_core::text::Position;
use dscript_diagnostics::{messages, ParseError};
use indexmap::IndexMap;
use serde::Deserialize;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

/// The search path used when no config file sets one.
pub const DEFAULT_SEARCH_PATH: &str = "*";

/// The tsconfig.json fields the loader reads. Everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    pub compiler_options: Option<CompilerOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Path aliases in file order.
    pub paths: Option<IndexMap<String, serde_json::Value>>,
}

/// Where imports are searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Directory the search paths are relative to.
    pub base_path: String,
    /// Directory prefixes, possibly ending in `*`.
    pub search_paths: Vec<String>,
}

impl ProjectConfig {
    /// The configuration of a project without a config file.
    pub fn with_base_path(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            search_paths: vec![DEFAULT_SEARCH_PATH.to_string()],
        }
    }
}

/// Drop the lines that are `//` comments. JSON has no comments, but
/// tsconfig.json files usually carry some.
pub fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the content of the config file found at `config_path`.
pub fn parse_tsconfig(content: &str, config_path: &str) -> Result<ProjectConfig, ParseError> {
    let stripped = strip_line_comments(content);
    let config: TsConfig = serde_json::from_str(&stripped).map_err(|err| invalid_config(config_path, &err.to_string()))?;

    let mut project = ProjectConfig::with_base_path(dscript_tspath::get_directory_path(config_path));

    let Some(paths) = config.compiler_options.and_then(|options| options.paths) else {
        return Ok(project);
    };
    if paths.len() != 1 {
        return Err(invalid_paths(config_path));
    }
    let Some(serde_json::Value::Array(dirs)) = paths.get(DEFAULT_SEARCH_PATH) else {
        return Err(invalid_paths(config_path));
    };

    let search_paths = dirs
        .iter()
        .map(|dir| dir.as_str().map(str::to_string).ok_or_else(|| invalid_paths(config_path)))
        .collect::<Result<Vec<_>, _>>()?;
    if !search_paths.is_empty() {
        project.search_paths = search_paths;
    }
    Ok(project)
}

fn invalid_config(path: &str, reason: &str) -> ParseError {
    ParseError::from_message(&messages::INVALID_CONFIG, Position::start(), &[path, reason])
}

fn invalid_paths(path: &str) -> ParseError {
    ParseError::from_message(&messages::INVALID_CONFIG_PATHS, Position::start(), &[path])
}
