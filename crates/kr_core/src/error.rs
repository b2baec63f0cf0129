use std::fmt;

#[derive(Debug)]
pub enum RouletteError {
    InvalidParameter(String),
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for RouletteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouletteError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            RouletteError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            RouletteError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for RouletteError {}

impl From<serde_json::Error> for RouletteError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            RouletteError::DeserializationError(err.to_string())
        } else {
            RouletteError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, RouletteError>;
