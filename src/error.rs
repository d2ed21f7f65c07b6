use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillError {
    #[error("Config directory not found at {0}. Run 'gstbill init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    #[error("Bill file not found: {0}")]
    BillNotFound(PathBuf),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Unknown theme '{0}'. Available themes: blue, green, orange, purple")]
    UnknownTheme(String),

    #[error("Invalid {option} '{value}'. Expected one of: {expected}")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("No billable items. Add at least one item with a name, quantity and price.")]
    NoBillableItems,

    #[error("Shop profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("No shop details in bill and no default shop profile set")]
    NoShopDetails,

    #[error("PDF backend failed: {0}")]
    PdfBackend(String),

    #[error("Nothing to print: no rendered invoice content")]
    NothingToPrint,

    #[error("Print failed: {0}")]
    Print(String),

    #[error("Failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillError>;

impl From<lopdf::Error> for BillError {
    fn from(e: lopdf::Error) -> Self {
        BillError::PdfBackend(e.to_string())
    }
}
