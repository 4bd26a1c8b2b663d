use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ExplorerError {
    String(String),
    Io(std::io::Error),
    Csv(csv::Error),
    FieldNotFound(String),
    EmptyGroup,
}

impl Error for ExplorerError {}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExplorerError::String(s) => write!(f, "{s}"),
            ExplorerError::Io(e) => write!(f, "I/O error: {e}"),
            ExplorerError::Csv(e) => write!(f, "CSV error: {e}"),
            ExplorerError::FieldNotFound(name) => write!(f, "No such data field: {name}"),
            ExplorerError::EmptyGroup => write!(f, "Target group has no compounds"),
        }
    }
}

impl From<String> for ExplorerError {
    fn from(err: String) -> Self {
        ExplorerError::String(err)
    }
}

impl From<std::io::Error> for ExplorerError {
    fn from(err: std::io::Error) -> Self {
        ExplorerError::Io(err)
    }
}

impl From<csv::Error> for ExplorerError {
    fn from(err: csv::Error) -> Self {
        ExplorerError::Csv(err)
    }
}
