//! Core library for Roster, a small student records manager.
//!
//! The [`FormController`] owns the form state (record list, draft and edit target) and talks
//! to a [`RecordStore`](store::RecordStore) on behalf of whatever front end drives it.

use thiserror::Error;

pub mod config;
pub mod controller;
pub mod fs;
pub mod notify;
pub mod store;
pub mod student;

#[cfg(test)]
pub(crate) mod testing;

pub use config::StoreConfig;
pub use controller::{FormController, FormState, Outcome};
pub use student::{Gender, Student, StudentId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse configuration {0}")]
    ParseConfig(#[from] toml::de::Error),
    #[error("Unable to serialize configuration {0}")]
    SerializeConfig(#[from] toml::ser::Error),
    #[error("Configuration setting `{0}` is not set")]
    MissingSetting(&'static str),
    #[error("Unable to locate a home directory")]
    NoHome,
    #[error("Unable to build HTTP client {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Invalid header value {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
