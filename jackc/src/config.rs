//! Compiler configuration.
use serde::Deserialize;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::{constants::SOURCE_EXTENSION, error::JackResult};

/// Options controlling how source files are found and compiled.
///
/// Loaded from an optional YAML file. Missing keys take their default value.
///
/// ```yaml
/// extension: jack
/// library: lib/os.txt
/// output_dir: build
/// fail_fast: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConf {
    /// Extension of source files, without the leading dot.
    pub extension: String,
    /// Library descriptor to predeclare. The bundled standard
    /// library is used when not set.
    pub library: Option<PathBuf>,
    /// Directory to write output to. Output is written next
    /// to each source file when not set.
    pub output_dir: Option<PathBuf>,
    /// Stop a batch at the first file that fails to compile.
    pub fail_fast: bool,
}

impl CompilerConf {
    pub fn from_file(path: impl AsRef<Path>) -> JackResult<Self> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn from_yaml_str(text: &str) -> JackResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Whether the path has the configured source extension.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.extension.as_str())
    }
}

impl Default for CompilerConf {
    fn default() -> Self {
        Self {
            extension: SOURCE_EXTENSION.to_string(),
            library: None,
            output_dir: None,
            fail_fast: false,
        }
    }
}
