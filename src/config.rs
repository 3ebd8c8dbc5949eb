use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_SOURCE_ROOT: &str = ".";
pub const DEFAULT_SOURCE_EXTENSION: &str = ".java";

/// Optional `jcc2c.toml` file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConvertSection {
    /// Source roots listed in the `<sources>` block
    #[serde(default)]
    pub sources: Vec<String>,
    /// Suffix appended to class names to guess their source file
    #[serde(default)]
    pub extension: Option<String>,
}

/// Settings that drive a single report conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub source_roots: Vec<String>,
    pub source_extension: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            source_roots: vec![DEFAULT_SOURCE_ROOT.to_string()],
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn with_source_roots(source_roots: Vec<String>) -> Self {
        let mut options = Self::default();
        if !source_roots.is_empty() {
            options.source_roots = source_roots;
        }
        options
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(ref extension) = self.convert.extension {
            if !extension.starts_with('.') || extension.len() < 2 {
                anyhow::bail!(
                    "Invalid source extension '{}': expected something like '.java'",
                    extension
                );
            }
        }

        Ok(())
    }

    /// Resolve conversion options; source roots given on the command line win
    pub fn options(&self, cli_source_roots: Vec<String>) -> ConvertOptions {
        let source_roots = if !cli_source_roots.is_empty() {
            cli_source_roots
        } else {
            self.convert.sources.clone()
        };

        let mut options = ConvertOptions::with_source_roots(source_roots);
        if let Some(ref extension) = self.convert.extension {
            options.source_extension = extension.clone();
        }
        options
    }
}
