//! The form controller: the only piece of Roster holding decision logic.
//!
//! It owns the listed records, the draft being edited and the id of the record under edit, and
//! mediates between user actions and the [`RecordStore`]. Every successful mutation is followed
//! by a full reload of the record list rather than patching it in place, so the view always
//! mirrors the store.

use tracing::{debug, warn};

use crate::{
    notify::{ConfirmationPrompt, DELETE_WARNING, NotificationSink},
    store::RecordStore,
    student::{Student, StudentId},
};

/// Everything a view needs to render the form and the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Records in the order the store returned them.
    pub records: Vec<Student>,
    pub draft: Student,
    /// `None` while creating a new record, otherwise the id of the record being edited.
    pub edit_target: Option<StudentId>,
}

impl FormState {
    fn reset(&mut self) {
        self.draft = Student::default();
        self.edit_target = None;
    }
}

/// How a controller operation ended. Failures have already been reported to the
/// [`NotificationSink`] by the time this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    /// The user declined the confirmation prompt.
    Declined,
    /// Nothing to act on, no store call was made.
    Skipped,
}

pub struct FormController<S, N, P> {
    store: S,
    notifier: N,
    prompt: P,
    state: FormState,
}

impl<S, N, P> FormController<S, N, P>
where
    S: RecordStore,
    N: NotificationSink,
    P: ConfirmationPrompt,
{
    pub fn new(store: S, notifier: N, prompt: P) -> Self {
        Self {
            store,
            notifier,
            prompt,
            state: FormState::default(),
        }
    }

    // Presentation

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn records(&self) -> &[Student] {
        &self.state.records
    }

    pub fn draft(&self) -> &Student {
        &self.state.draft
    }

    pub fn edit_target(&self) -> Option<&StudentId> {
        self.state.edit_target.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.state.edit_target.is_some()
    }

    /// Label for the form's submit button
    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() { "Update" } else { "Add" }
    }

    /// Look up a listed record by id.
    pub fn find(&self, id: &StudentId) -> Option<&Student> {
        self.state
            .records
            .iter()
            .find(|s| s.id.as_ref() == Some(id))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // Draft fields

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.draft.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.state.draft.email = email.into();
    }

    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) {
        self.state.draft.phone_number = phone_number.into();
    }

    pub fn set_gender(&mut self, gender: impl Into<String>) {
        self.state.draft.gender = gender.into();
    }

    // Operations

    /// Replace the record list with the store's current contents. On failure the list is
    /// left untouched.
    pub async fn load_all(&mut self) -> Outcome {
        match self.store.list_all().await {
            Ok(records) => {
                debug!("Loaded {} students", records.len());
                self.state.records = records;
                Outcome::Completed
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to fetch students {}", err.message));
                Outcome::Failed
            }
        }
    }

    /// Send the draft to the store: an update when a record is being edited, an insert
    /// otherwise. Field contents are sent as they are.
    pub async fn submit(&mut self) -> Outcome {
        let result = match &self.state.edit_target {
            Some(id) => {
                debug!("Updating student {id}");
                self.store
                    .update_by_id(id, &self.state.draft)
                    .await
                    .map(|()| "Student updated successfully")
                    .map_err(|err| format!("Failed to update student {}", err.message))
            }
            None => {
                debug!("Creating student");
                self.store
                    .insert(&self.state.draft.without_id())
                    .await
                    .map(|()| "Student created successfully")
                    .map_err(|err| format!("Failed to create {}", err.message))
            }
        };

        match result {
            Ok(message) => {
                self.notifier.success(message);
                self.load_all().await;
                self.reset_form();
                Outcome::Completed
            }
            Err(message) => {
                self.notifier.error(&message);
                Outcome::Failed
            }
        }
    }

    /// Load a listed record into the draft for editing.
    pub fn begin_edit(&mut self, student: &Student) {
        self.state.draft = student.clone();
        // A record without an id can't be updated, so it never becomes the edit target
        self.state.edit_target = student.id.clone();
        debug!("Editing student {:?}", self.state.edit_target);
    }

    /// Abandon the current edit and return to a blank draft.
    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    pub fn reset_form(&mut self) {
        self.state.reset();
    }

    /// Delete the record with `id` after asking the user to confirm.
    pub async fn delete_record(&mut self, id: &StudentId) -> Outcome {
        if id.trim().is_empty() {
            warn!("Refusing to delete a student without an id");
            return Outcome::Skipped;
        }

        if !self.prompt.confirm(&DELETE_WARNING).await.is_confirmed() {
            debug!("Deletion of student {id} declined");
            return Outcome::Declined;
        }

        match self.store.delete_by_id(id).await {
            Ok(()) => {
                self.notifier.success("Student deleted successfully");
                self.load_all().await;
                // The record being edited no longer exists
                if self.state.edit_target.as_ref() == Some(id) {
                    self.reset_form();
                }
                Outcome::Completed
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to delete student {}", err.message));
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        notify::Confirmation,
        testing::{Call, FixedPrompt, Notification, Op, RecordingSink, ScriptedStore},
    };

    type Controller = FormController<ScriptedStore, RecordingSink, FixedPrompt>;

    fn student(name: &str, email: &str, phone: &str, gender: &str) -> Student {
        Student {
            id: None,
            name: name.into(),
            email: email.into(),
            phone_number: phone.into(),
            gender: gender.into(),
        }
    }

    fn controller(students: Vec<Student>, answer: Confirmation) -> Controller {
        FormController::new(
            ScriptedStore::with_students(students),
            RecordingSink::default(),
            FixedPrompt::new(answer),
        )
    }

    /// A controller over a store holding Ann (id 1), Bo (id 2) and Cy (id 3), already loaded.
    async fn loaded(answer: Confirmation) -> Controller {
        let mut controller = controller(
            vec![
                student("Ann", "a@x.com", "111", "Female"),
                student("Bo", "b@x.com", "222", "Male"),
                student("Cy", "c@x.com", "333", "other"),
            ],
            answer,
        );
        assert_eq!(controller.load_all().await, Outcome::Completed);
        controller.store().clear_calls();
        controller
    }

    fn listed(controller: &Controller, id: &str) -> Student {
        controller.find(&id.into()).cloned().unwrap()
    }

    #[tokio::test]
    async fn test_initial_state() {
        let controller = controller(Vec::new(), Confirmation::Confirmed);

        assert!(controller.records().is_empty());
        assert_eq!(controller.draft(), &Student::default());
        assert_eq!(controller.edit_target(), None);
        assert_eq!(controller.submit_label(), "Add");
    }

    #[tokio::test]
    async fn test_load_all_replaces_records() {
        let mut controller = controller(
            vec![student("Ann", "a@x.com", "111", "Female")],
            Confirmation::Confirmed,
        );

        assert_eq!(controller.load_all().await, Outcome::Completed);

        let expected = Student {
            id: Some("1".into()),
            ..student("Ann", "a@x.com", "111", "Female")
        };
        assert_eq!(controller.records(), [expected]);
        assert!(controller.notifier().notifications().is_empty());
    }

    #[tokio::test]
    async fn test_load_all_twice_is_stable() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        let first = controller.records().to_vec();

        controller.load_all().await;

        assert_eq!(controller.records(), first);
    }

    #[tokio::test]
    async fn test_load_all_failure_keeps_records() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        controller.store().fail(Op::ListAll, "connection refused");

        assert_eq!(controller.load_all().await, Outcome::Failed);

        assert_eq!(controller.records().len(), 3);
        assert_eq!(
            controller.notifier().last(),
            Some(Notification::Error(
                "Failed to fetch students connection refused".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_create() {
        let mut controller = controller(Vec::new(), Confirmation::Confirmed);
        controller.set_name("Bo");
        controller.set_email("b@x.com");
        controller.set_phone_number("222");
        controller.set_gender("Male");

        assert_eq!(controller.submit().await, Outcome::Completed);

        assert_eq!(
            controller.store().calls(),
            [
                Call::Insert(student("Bo", "b@x.com", "222", "Male")),
                Call::ListAll
            ]
        );
        assert_eq!(
            controller.notifier().notifications(),
            [Notification::Success("Student created successfully".into())]
        );
        assert_eq!(controller.records().len(), 1);
        assert_eq!(controller.draft(), &Student::default());
        assert_eq!(controller.edit_target(), None);
    }

    #[tokio::test]
    async fn test_create_accepts_empty_fields() {
        let mut controller = controller(Vec::new(), Confirmation::Confirmed);

        assert_eq!(controller.submit().await, Outcome::Completed);

        assert_eq!(
            controller.store().calls().first(),
            Some(&Call::Insert(Student::default()))
        );
    }

    #[tokio::test]
    async fn test_create_failure_keeps_draft() {
        let mut controller = controller(Vec::new(), Confirmation::Confirmed);
        controller.store().fail(Op::Insert, "duplicate key");
        controller.set_name("Bo");

        assert_eq!(controller.submit().await, Outcome::Failed);

        assert_eq!(controller.draft().name, "Bo");
        assert_eq!(
            controller.notifier().last(),
            Some(Notification::Error("Failed to create duplicate key".into()))
        );
        // No reload after a failed insert
        assert_eq!(controller.store().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_begin_edit_then_cancel() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        let cy = listed(&controller, "3");

        controller.begin_edit(&cy);

        assert_eq!(controller.draft(), &cy);
        assert_eq!(controller.edit_target(), Some(&"3".into()));
        assert_eq!(controller.submit_label(), "Update");

        controller.cancel_edit();

        assert_eq!(controller.draft(), &Student::default());
        assert_eq!(controller.edit_target(), None);
        assert!(controller.store().calls().is_empty());
    }

    #[tokio::test]
    async fn test_begin_edit_without_id() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        controller.begin_edit(&listed(&controller, "1"));

        let unsaved = student("Dee", "d@x.com", "444", "female");
        controller.begin_edit(&unsaved);

        assert_eq!(controller.draft(), &unsaved);
        assert_eq!(controller.edit_target(), None);
    }

    #[tokio::test]
    async fn test_update() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        let bo = listed(&controller, "2");
        controller.begin_edit(&bo);
        controller.set_email("bo@x.com");

        assert_eq!(controller.submit().await, Outcome::Completed);

        let sent = Student {
            email: "bo@x.com".into(),
            ..bo
        };
        assert_eq!(
            controller.store().calls(),
            [Call::UpdateById("2".into(), sent), Call::ListAll]
        );
        assert_eq!(listed(&controller, "2").email, "bo@x.com");
        assert_eq!(
            controller.notifier().last(),
            Some(Notification::Success("Student updated successfully".into()))
        );
        assert_eq!(controller.draft(), &Student::default());
        assert_eq!(controller.edit_target(), None);
    }

    #[tokio::test]
    async fn test_update_failure_keeps_state() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        let before = controller.records().to_vec();
        controller.begin_edit(&listed(&controller, "2"));
        controller.set_name("Robert");
        controller.store().fail(Op::Update, "network timeout");

        assert_eq!(controller.submit().await, Outcome::Failed);

        assert_eq!(
            controller.notifier().last(),
            Some(Notification::Error(
                "Failed to update student network timeout".into()
            ))
        );
        assert_eq!(controller.records(), before);
        assert_eq!(controller.draft().name, "Robert");
        assert_eq!(controller.edit_target(), Some(&"2".into()));

        // The retained draft can be resubmitted once the store recovers
        controller.store().recover(Op::Update);
        assert_eq!(controller.submit().await, Outcome::Completed);
        assert_eq!(listed(&controller, "2").name, "Robert");
    }

    #[tokio::test]
    async fn test_delete_empty_id_is_skipped() {
        let mut controller = loaded(Confirmation::Confirmed).await;

        assert_eq!(controller.delete_record(&"".into()).await, Outcome::Skipped);

        assert_eq!(controller.prompt.times_asked(), 0);
        assert!(controller.store().calls().is_empty());
        assert_eq!(controller.records().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_declined() {
        let mut controller = loaded(Confirmation::Declined).await;
        controller.begin_edit(&listed(&controller, "1"));
        let before = controller.state().clone();

        assert_eq!(controller.delete_record(&"1".into()).await, Outcome::Declined);

        assert_eq!(controller.prompt.times_asked(), 1);
        assert_eq!(controller.state(), &before);
        assert!(controller.store().calls().is_empty());
        assert!(controller.notifier().notifications().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        controller.begin_edit(&listed(&controller, "1"));

        assert_eq!(controller.delete_record(&"2".into()).await, Outcome::Completed);

        assert_eq!(controller.prompt.last_warning(), Some(DELETE_WARNING));
        assert_eq!(
            controller.store().calls(),
            [Call::DeleteById("2".into()), Call::ListAll]
        );
        assert!(controller.find(&"2".into()).is_none());
        assert_eq!(
            controller.notifier().last(),
            Some(Notification::Success("Student deleted successfully".into()))
        );
        // Editing a different record is unaffected
        assert_eq!(controller.edit_target(), Some(&"1".into()));
        assert_eq!(controller.draft().name, "Ann");
    }

    #[tokio::test]
    async fn test_delete_record_under_edit_resets_form() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        controller.begin_edit(&listed(&controller, "3"));

        assert_eq!(controller.delete_record(&"3".into()).await, Outcome::Completed);

        assert_eq!(controller.draft(), &Student::default());
        assert_eq!(controller.edit_target(), None);
        assert_eq!(controller.records().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_state() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        controller.begin_edit(&listed(&controller, "3"));
        controller.store().fail(Op::Delete, "permission denied");
        let before = controller.state().clone();

        assert_eq!(controller.delete_record(&"3".into()).await, Outcome::Failed);

        assert_eq!(controller.state(), &before);
        assert_eq!(
            controller.notifier().last(),
            Some(Notification::Error(
                "Failed to delete student permission denied".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_delete_then_failed_reload_keeps_stale_list() {
        let mut controller = loaded(Confirmation::Confirmed).await;
        controller.store().fail(Op::ListAll, "offline");

        assert_eq!(controller.delete_record(&"1".into()).await, Outcome::Completed);

        assert_eq!(
            controller.notifier().notifications(),
            [
                Notification::Success("Student deleted successfully".into()),
                Notification::Error("Failed to fetch students offline".into()),
            ]
        );
        assert_eq!(controller.records().len(), 3);
    }
}
