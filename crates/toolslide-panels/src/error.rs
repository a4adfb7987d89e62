//! Panel error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Content panel at index {index} has no id")]
    MissingId { index: usize },

    #[error("Duplicate content panel id: {0}")]
    DuplicateId(String),
}
