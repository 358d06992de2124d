//! Structured error types for the Folio paginator.
//!
//! Geometry and template failures are fatal for the whole pagination call:
//! either a complete report comes back or nothing does.

use std::fmt;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Which template slot of a page failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSlot {
    Header,
    Footer,
}

impl fmt::Display for TemplateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSlot::Header => write!(f, "header"),
            TemplateSlot::Footer => write!(f, "footer"),
        }
    }
}

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// A non-positive or non-finite dimension somewhere in the geometry chain.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Page height minus vertical margins leaves no room for content.
    #[error("Page has no usable height ({usable_height:.2}); check page height and top/bottom margins")]
    EmptyGeometry { usable_height: f64 },

    /// A header or footer template produced no renderable instance.
    #[error("Could not instantiate {slot} template for page {page_number}")]
    TemplateInstantiation {
        slot: TemplateSlot,
        page_number: usize,
    },

    /// A caller-measured block carries an unusable height or margin.
    #[error("Block {index} is invalid: {reason}")]
    InvalidBlock { index: usize, reason: String },

    /// JSON input failed to parse as a valid report definition.
    #[error("Failed to parse report definition: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A renderer adapter failed to produce a surface.
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report definition schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::ParseError { source: e, hint }
    }
}
