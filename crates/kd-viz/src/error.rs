//! Errors raised while preparing a figure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizError {
    /// The tree cannot be drawn (empty, inconsistent or not 3-D).
    #[error(transparent)]
    Tree(#[from] kd_tree::Error),

    /// The output location cannot be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The exported image could not be encoded or written.
    #[error("cannot write image: {0}")]
    Image(#[from] image::ImageError),

    /// The window closed before the export step finished.
    #[error("window closed before the figure was written")]
    ExportInterrupted,

    /// A style or render option is out of range.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
