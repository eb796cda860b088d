use flexlay_layout::{LayoutError, TreeError};
use thiserror::Error;

/// Every failure the umbrella crate and the command line can report.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tree operation failed: {0}")]
    Tree(#[from] TreeError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
