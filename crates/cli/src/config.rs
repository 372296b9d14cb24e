use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElemKind {
    F32,
    F64,
}

impl FromStr for ElemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "f32" => Ok(ElemKind::F32),
            "f64" => Ok(ElemKind::F64),
            _ => Err(format!("unknown element type `{s}`, expected `f32` or `f64`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BenchOptions {
    #[serde(default = "BenchOptions::default_len")]
    #[validate(range(min = 1, max = 1_073_741_824))]
    pub len: usize,
    #[serde(default = "BenchOptions::default_iterations")]
    #[validate(range(min = 1, max = 1_000_000))]
    pub iterations: u32,
    #[serde(default = "BenchOptions::default_offset")]
    #[validate(range(max = 63))]
    pub offset: usize,
    #[serde(default = "BenchOptions::default_elem")]
    pub elem: ElemKind,
}

impl BenchOptions {
    fn default_len() -> usize {
        1 << 20
    }
    fn default_iterations() -> u32 {
        100
    }
    fn default_offset() -> usize {
        0
    }
    fn default_elem() -> ElemKind {
        ElemKind::F32
    }
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            len: Self::default_len(),
            iterations: Self::default_iterations(),
            offset: Self::default_offset(),
            elem: Self::default_elem(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read the configuration file: {0}.")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse the TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid options: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Parses `config`, a path to a TOML file or an inline TOML string.
pub fn parse(config: Option<&str>) -> Result<BenchOptions, ConfigError> {
    let Some(config) = config else {
        return Ok(BenchOptions::default());
    };
    let path = Path::new(config);
    let options = if path.is_file() {
        toml::from_str(&std::fs::read_to_string(path)?)?
    } else {
        toml::from_str(config)?
    };
    Ok(options)
}

/// Parses `config`, lets `apply` override fields, then validates the result.
pub fn load(
    config: Option<&str>,
    apply: impl FnOnce(BenchOptions) -> BenchOptions,
) -> Result<BenchOptions, ConfigError> {
    let options = apply(parse(config)?);
    options.validate()?;
    Ok(options)
}
