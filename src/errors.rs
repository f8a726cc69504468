use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackfillError {
  #[error("{0}")]
  ArgumentFormat(String),
  #[error("{0}")]
  Range(String),
  #[error("{0}")]
  Precondition(String),
  #[error("{0}")]
  ExternalTool(String),
}
