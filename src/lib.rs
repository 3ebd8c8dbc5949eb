//! jcc2c - JaCoCo to Cobertura coverage report converter
//!
//! Translates JaCoCo XML reports into the Cobertura XML format:
//! - Line, branch and complexity rates derived from JaCoCo counters
//! - Method line ranges inferred from method start lines
//! - Per-line hits and condition coverage from instruction/branch counters

pub mod config;
pub mod convert;
pub mod xml;

pub use config::{Config, ConvertOptions};
pub use convert::{convert_path, convert_reader, convert_str, render};
pub use xml::Element;
