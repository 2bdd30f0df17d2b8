use crate::logging::LogLevel;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "fragment.config.json";
pub const DEFAULT_RUNTIME_MODULE: &str = "fragment-runtime";
pub const DEFAULT_TAG_NAME: &str = "_";

/// Contents of `fragment.config.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerConfig {
    /// Module the tag is imported from and runtime helpers are added to.
    pub runtime_module: String,
    /// Exported name that designates the template tag.
    pub tag_name: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Write compiled files here; print to stdout when unset.
    pub out_dir: Option<String>,
    pub log_level: LogLevel,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
            tag_name: DEFAULT_TAG_NAME.to_string(),
            include: vec!["src/**/*.js".to_string()],
            exclude: vec!["node_modules/**".to_string()],
            out_dir: None,
            log_level: LogLevel::default(),
        }
    }
}

impl CompilerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: CompilerConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load `fragment.config.json` from `dir` if present, else the defaults.
    pub fn discover(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fill_missing_fields_with_defaults() {
        let config: CompilerConfig =
            serde_json::from_str(r#"{ "runtimeModule": "@app/runtime", "logLevel": "info" }"#)
                .unwrap();
        assert_eq!(config.runtime_module, "@app/runtime");
        assert_eq!(config.tag_name, "_");
        assert_eq!(config.include, vec!["src/**/*.js"]);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.out_dir, None);
    }

    #[test]
    fn should_read_out_dir_and_globs() {
        let config: CompilerConfig = serde_json::from_str(
            r#"{ "include": ["lib/*.ts"], "exclude": [], "outDir": "dist", "tagName": "html" }"#,
        )
        .unwrap();
        assert_eq!(config.include, vec!["lib/*.ts"]);
        assert!(config.exclude.is_empty());
        assert_eq!(config.out_dir.as_deref(), Some("dist"));
        assert_eq!(config.tag_name, "html");
    }

    #[test]
    fn should_report_missing_file() {
        let err = CompilerConfig::load(Path::new("/nonexistent/fragment.config.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read"));
    }

    #[test]
    fn should_fall_back_to_defaults_without_file() {
        let config = CompilerConfig::discover(Path::new("/nonexistent-dir")).unwrap();
        assert_eq!(config, CompilerConfig::default());
    }
}
