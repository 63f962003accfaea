//! Error types and helpers.
use {
    crate::{io::StreamError, persist::Direction},
    core::str::Utf8Error,
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("Protocol mismatch: expected {expected:?}, got {actual:?}")]
    ProtocolMismatch { expected: String, actual: String },
    #[error("Sequence length {len} would overflow the 32-bit length prefix")]
    LengthOverflow { len: usize },
    #[error(
        "Encoded sequence length exceeded preallocation limit of {limit} bytes (needed {needed} \
         bytes)"
    )]
    PreallocationSizeLimit { needed: usize, limit: usize },
    #[error(transparent)]
    InvalidUtf8(#[from] Utf8Error),
    #[error("Invalid bool encoding: {0}")]
    InvalidBool(u8),
    #[error("Invalid record: {0}")]
    Validation(String),
    #[error("Operation requires a {expected:?} context")]
    WrongDirection { expected: Direction },
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Puzzle {0:?} is already registered")]
    DuplicateRegistration(String),
    #[error("Unknown puzzle type {0:?}")]
    UnknownType(String),
}

pub type Result<T> = core::result::Result<T, Error>;
pub type PersistResult<T> = core::result::Result<T, PersistError>;

#[cold]
pub fn protocol_mismatch(expected: &str, actual: &str) -> PersistError {
    PersistError::ProtocolMismatch {
        expected: expected.to_owned(),
        actual: actual.to_owned(),
    }
}

#[cold]
pub const fn length_overflow(len: usize) -> PersistError {
    PersistError::LengthOverflow { len }
}

#[cold]
pub const fn preallocation_size_limit(needed: usize, limit: usize) -> PersistError {
    PersistError::PreallocationSizeLimit { needed, limit }
}

#[cold]
pub const fn invalid_bool(byte: u8) -> PersistError {
    PersistError::InvalidBool(byte)
}

#[cold]
pub fn validation(msg: impl Into<String>) -> PersistError {
    PersistError::Validation(msg.into())
}

#[cold]
pub const fn wrong_direction(expected: Direction) -> PersistError {
    PersistError::WrongDirection { expected }
}

#[cold]
pub fn duplicate_registration(name: &str) -> RegistryError {
    RegistryError::DuplicateRegistration(name.to_owned())
}

#[cold]
pub fn unknown_type(name: &str) -> RegistryError {
    RegistryError::UnknownType(name.to_owned())
}
