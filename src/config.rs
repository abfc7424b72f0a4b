use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CodemodResult;

// -----------------------------------------------------------------------------
// Dialect
// -----------------------------------------------------------------------------

/// Parser dialect. `babel` is plain JavaScript with JSX enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Babel,
    Ts,
    #[default]
    Tsx,
}

impl Dialect {
    pub fn is_typescript(self) -> bool {
        matches!(self, Dialect::Ts | Dialect::Tsx)
    }

    /// Infer the dialect from a file extension. Unknown extensions yield `None`.
    pub fn for_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("ts") | Some("mts") | Some("cts") => Some(Dialect::Ts),
            Some("tsx") => Some(Dialect::Tsx),
            Some("js") | Some("jsx") | Some("mjs") | Some("cjs") => Some(Dialect::Babel),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Print options (pass-through to the serializer)
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Single,
    Double,
    /// Leave the emitter's own choice
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    None,
    #[default]
    Es5,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintOptions {
    pub quote: QuoteStyle,
    pub trailing_comma: TrailingComma,
    pub tab_width: u8,
    pub print_width: u16,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            quote: QuoteStyle::Auto,
            trailing_comma: TrailingComma::Es5,
            tab_width: 2,
            print_width: 80,
        }
    }
}

// -----------------------------------------------------------------------------
// Transform options
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Parser dialect. When unset it is inferred from the file extension,
    /// falling back to `tsx`.
    pub dialect: Option<Dialect>,
    pub print_options: PrintOptions,
    /// Turn malformed matches into a hard error instead of skipping them.
    pub strict: bool,
}

impl TransformOptions {
    pub fn from_json(json: &str) -> CodemodResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build options from a loose key/value config, the shape hosts usually
    /// hand over. Unknown keys are ignored.
    pub fn from_config(mut config: HashMap<String, serde_json::Value>) -> CodemodResult<Self> {
        let mut options = Self::default();
        if let Some(v) = config.remove("parser") {
            options.dialect = Some(serde_json::from_value(v)?);
        }
        if let Some(v) = config.remove("printOptions") {
            options.print_options = serde_json::from_value(v)?;
        }
        if let Some(v) = config.remove("strict") {
            options.strict = serde_json::from_value(v)?;
        }
        Ok(options)
    }
}
