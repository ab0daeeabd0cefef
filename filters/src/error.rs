use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ml scorer unavailable while mode is not off")]
    MlScorerMissing,
}

pub type Result<T> = core::result::Result<T, Error>;
