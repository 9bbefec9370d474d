use std::io;

use thiserror::Error;

/// Rejected user input. The Display text is what the user gets to read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Both the task and its due date are still empty.")]
    MissingTextAndDate,

    #[error("Enter the task first, don't forget!")]
    MissingText,

    #[error("Enter the due date first, don't forget!")]
    MissingDate,

    #[error("'{0}' is not a valid date, use YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("A task cannot be empty!")]
    EmptyText,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown filter '{0}', expected all, completed or pending")]
pub struct UnknownFilter(pub String);

#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("cannot create log directory: {0}")]
    Directory(#[from] io::Error),

    #[error("cannot open log file: {0}")]
    File(#[from] tracing_appender::rolling::InitError),
}
