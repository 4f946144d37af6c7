use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ChompError {
    ParseError(String),
}

impl Error for ChompError {}

impl fmt::Display for ChompError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChompError::ParseError(msg) => write!(fmt, "{}", msg),
        }
    }
}
