//! Test doubles for the controller's collaborators.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    notify::{Confirmation, ConfirmationPrompt, NotificationSink, Warning},
    store::{MemoryStore, RecordStore, StoreError, StoreResult},
    student::{Student, StudentId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListAll,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListAll,
    Insert(Student),
    UpdateById(StudentId, Student),
    DeleteById(StudentId),
}

/// Wraps a [`MemoryStore`], recording every call and failing the operations it's told to.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    inner: MemoryStore,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<Op, String>>,
}

impl ScriptedStore {
    pub fn with_students(students: impl IntoIterator<Item = Student>) -> Self {
        Self {
            inner: MemoryStore::with_students(students),
            ..Default::default()
        }
    }

    /// Make every subsequent call of `op` fail with `message`.
    pub fn fail(&self, op: Op, message: &str) {
        self.failures.lock().insert(op, message.to_string());
    }

    pub fn recover(&self, op: Op) {
        self.failures.lock().remove(&op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, op: Op, call: Call) -> StoreResult<()> {
        self.calls.lock().push(call);
        match self.failures.lock().get(&op) {
            Some(message) => Err(StoreError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn list_all(&self) -> StoreResult<Vec<Student>> {
        self.record(Op::ListAll, Call::ListAll)?;
        self.inner.list_all().await
    }

    async fn insert(&self, student: &Student) -> StoreResult<()> {
        self.record(Op::Insert, Call::Insert(student.clone()))?;
        self.inner.insert(student).await
    }

    async fn update_by_id(&self, id: &StudentId, student: &Student) -> StoreResult<()> {
        self.record(Op::Update, Call::UpdateById(id.clone(), student.clone()))?;
        self.inner.update_by_id(id, student).await
    }

    async fn delete_by_id(&self, id: &StudentId) -> StoreResult<()> {
        self.record(Op::Delete, Call::DeleteById(id.clone()))?;
        self.inner.delete_by_id(id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().last().cloned()
    }
}

impl NotificationSink for RecordingSink {
    fn success(&self, message: &str) {
        self.notifications
            .lock()
            .push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notifications
            .lock()
            .push(Notification::Error(message.to_string()));
    }
}

/// Always gives the same answer, counting how often it was asked.
#[derive(Debug)]
pub struct FixedPrompt {
    answer: Confirmation,
    asked: Mutex<Vec<Warning>>,
}

impl FixedPrompt {
    pub fn new(answer: Confirmation) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.lock().len()
    }

    pub fn last_warning(&self) -> Option<Warning> {
        self.asked.lock().last().copied()
    }
}

#[async_trait]
impl ConfirmationPrompt for FixedPrompt {
    async fn confirm(&self, warning: &Warning) -> Confirmation {
        self.asked.lock().push(*warning);
        self.answer
    }
}
