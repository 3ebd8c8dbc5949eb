//! JaCoCo to Cobertura conversion
//!
//! Provides:
//! - Counter aggregation (line/branch rates, complexity)
//! - Method line-range inference from method start lines
//! - Package/class/method/line converters
//! - Report-level conversion and rendering

mod counters;
mod elements;
mod lines;
mod root;

pub use counters::*;
pub use elements::*;
pub use lines::*;
pub use root::*;

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::config::ConvertOptions;
use crate::xml::Element;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" ?>"#;

/// Convert JaCoCo XML content into a Cobertura `<coverage>` element
pub fn convert_str(content: &str, options: &ConvertOptions) -> Result<Element> {
    let report = Element::parse(content).context("Error parsing JaCoCo XML")?;
    convert_root(&report, options)
}

/// Read a whole JaCoCo report from `reader` and convert it
pub fn convert_reader<R: Read>(mut reader: R, options: &ConvertOptions) -> Result<Element> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("Failed to read coverage report")?;
    convert_str(&content, options)
}

/// Convert a JaCoCo report file
pub fn convert_path(path: &Path, options: &ConvertOptions) -> Result<Element> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read coverage report: {}", path.display()))?;
    convert_str(&content, options)
}

/// Render a `<coverage>` element as a complete Cobertura document
pub fn render(coverage: &Element) -> Result<String> {
    let body = coverage.to_pretty_string()?;
    Ok(format!("{}\n{}\n", XML_DECLARATION, body))
}
