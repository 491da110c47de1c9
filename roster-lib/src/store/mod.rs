//! Access to the table holding the authoritative student records.
//!
//! A [`RecordStore`] owns persistence and id assignment. Callers only ever see the four
//! operations below and a single [`StoreError`] kind carrying a human readable message.

use async_trait::async_trait;
use thiserror::Error;

use crate::student::{Student, StudentId};

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every record, in the store's own order.
    async fn list_all(&self) -> StoreResult<Vec<Student>>;

    /// Insert a new record. The store assigns its id.
    async fn insert(&self, student: &Student) -> StoreResult<()>;

    async fn update_by_id(&self, id: &StudentId, student: &Student) -> StoreResult<()>;

    async fn delete_by_id(&self, id: &StudentId) -> StoreResult<()>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    async fn list_all(&self) -> StoreResult<Vec<Student>> {
        (**self).list_all().await
    }

    async fn insert(&self, student: &Student) -> StoreResult<()> {
        (**self).insert(student).await
    }

    async fn update_by_id(&self, id: &StudentId, student: &Student) -> StoreResult<()> {
        (**self).update_by_id(id, student).await
    }

    async fn delete_by_id(&self, id: &StudentId) -> StoreResult<()> {
        (**self).delete_by_id(id).await
    }
}
