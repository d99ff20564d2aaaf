use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("failed to parse: {0}")]
    ParseError(String),
    #[error("repeat minimum {min} exceeds maximum {max}")]
    InvalidRepeat { min: usize, max: usize },
    #[error("range start {lo:#x} exceeds range end {hi:#x}")]
    InvalidRange { lo: u32, hi: u32 },
    #[error("{0:#x} is not a unicode scalar value")]
    InvalidChar(u32),
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Error {
        Error::ParseError(format!("{:?}", err))
    }
}
