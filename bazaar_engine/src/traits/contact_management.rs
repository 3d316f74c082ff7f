use thiserror::Error;

use crate::{
    db_types::{Contact, NewContact},
    helpers::FieldErrors,
};

#[derive(Debug, Clone, Error)]
pub enum ContactApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not all required arguments were provided. {0}")]
    MissingArguments(String),
    #[error("Invalid contact details. {0}")]
    ValidationError(FieldErrors),
}

impl From<sqlx::Error> for ContactApiError {
    fn from(e: sqlx::Error) -> Self {
        ContactApiError::DatabaseError(e.to_string())
    }
}

/// Delivery contacts. Every call is scoped to the owning user, so one user can never read or touch another's records.
#[allow(async_fn_in_trait)]
pub trait ContactManagement {
    async fn fetch_contacts(&self, user_id: i64) -> Result<Vec<Contact>, ContactApiError>;

    async fn fetch_contact(&self, user_id: i64, contact_id: i64) -> Result<Option<Contact>, ContactApiError>;

    async fn has_contacts(&self, user_id: i64) -> Result<bool, ContactApiError>;

    async fn insert_contact(&self, user_id: i64, contact: NewContact) -> Result<Contact, ContactApiError>;

    /// Overwrites the stored contact with `contact.id`, provided it belongs to `contact.user_id`.
    async fn save_contact(&self, contact: Contact) -> Result<Option<Contact>, ContactApiError>;

    /// Deletes those of `ids` that belong to the user, returning the number deleted.
    async fn delete_contacts(&self, user_id: i64, ids: &[i64]) -> Result<u64, ContactApiError>;
}
