//! Contracts for the user facing side effects the controller triggers: transient
//! notifications and blocking yes/no confirmations.

use async_trait::async_trait;

/// Receives transient success and failure messages. Delivery is fire and forget.
pub trait NotificationSink: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, warning: &Warning) -> Confirmation;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Warning {
    pub title: &'static str,
    pub text: &'static str,
}

/// Shown before a record is deleted.
pub const DELETE_WARNING: Warning = Warning {
    title: "Are you sure?",
    text: "You will not be able to recover this file!",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}
