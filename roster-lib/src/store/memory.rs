use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    store::{RecordStore, StoreError, StoreResult},
    student::{Student, StudentId},
};

/// A [`RecordStore`] kept entirely in memory.
///
/// Ids are handed out sequentially starting at `1` and records are listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Table>>,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Student>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `students`. Each one is assigned a fresh id.
    pub fn with_students(students: impl IntoIterator<Item = Student>) -> Self {
        let store = Self::new();
        {
            let mut table = store.inner.write();
            for student in students {
                table.push(student);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().rows.is_empty()
    }
}

impl Table {
    fn push(&mut self, student: Student) -> StudentId {
        self.next_id = self.next_id.saturating_add(1);
        let id = StudentId::new(self.next_id.to_string());
        self.rows.push(Student {
            id: Some(id.clone()),
            ..student
        });
        id
    }

    fn position(&self, id: &StudentId) -> StoreResult<usize> {
        self.rows
            .iter()
            .position(|s| s.id.as_ref() == Some(id))
            .ok_or_else(|| StoreError::new(format!("no student with id {id}")))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<Student>> {
        Ok(self.inner.read().rows.clone())
    }

    async fn insert(&self, student: &Student) -> StoreResult<()> {
        let id = self.inner.write().push(student.without_id());
        debug!("Inserted student {id}");
        Ok(())
    }

    async fn update_by_id(&self, id: &StudentId, student: &Student) -> StoreResult<()> {
        let mut table = self.inner.write();
        let index = table.position(id)?;
        if let Some(row) = table.rows.get_mut(index) {
            *row = Student {
                id: Some(id.clone()),
                ..student.clone()
            };
        }
        debug!("Updated student {id}");
        Ok(())
    }

    async fn delete_by_id(&self, id: &StudentId) -> StoreResult<()> {
        let mut table = self.inner.write();
        let index = table.position(id)?;
        table.rows.remove(index);
        debug!("Deleted student {id}");
        Ok(())
    }
}
