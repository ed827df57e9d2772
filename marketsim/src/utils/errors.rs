use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Empty sample: {0}")]
    EmptySample(String),
    #[error("Error while parsing: {0}")]
    ParsingError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;

impl From<SimulationError> for String {
    fn from(e: SimulationError) -> Self {
        e.to_string()
    }
}
