use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid parameter {name}: expected {expected}, found {found}")]
    InvalidParameter { name: String, expected: String, found: String },
}

pub type Result<T> = core::result::Result<T, Error>;
