use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Contact, ContactUpdate, NewContact},
    helpers::{parse_id_list, validate_contact},
    traits::{ContactApiError, ContactManagement},
};

/// Delivery contacts. Every operation is scoped to the calling user.
pub struct ContactsApi<B> {
    db: B,
}

impl<B: Debug> Debug for ContactsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContactsApi ({:?})", self.db)
    }
}

impl<B> ContactsApi<B>
where B: ContactManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn contacts(&self, user_id: i64) -> Result<Vec<Contact>, ContactApiError> {
        self.db.fetch_contacts(user_id).await
    }

    /// Creates a contact from the submitted fields. Absent required fields are reported before anything is validated.
    pub async fn add_contact(&self, user_id: i64, fields: ContactUpdate) -> Result<Contact, ContactApiError> {
        let contact = fields
            .into_new_contact()
            .map_err(|missing| ContactApiError::MissingArguments(missing.join(", ")))?;
        validate_contact(&contact).map_err(ContactApiError::ValidationError)?;
        let contact = self.db.insert_contact(user_id, contact).await?;
        debug!("📇️ User #{user_id} added contact #{}", contact.id);
        Ok(contact)
    }

    /// Applies a partial update to one of the user's contacts and re-validates the result.
    pub async fn update_contact(
        &self,
        user_id: i64,
        contact_id: i64,
        update: ContactUpdate,
    ) -> Result<Contact, ContactApiError> {
        let mut contact = self
            .db
            .fetch_contact(user_id, contact_id)
            .await?
            .ok_or_else(|| ContactApiError::MissingArguments(format!("id (no contact #{contact_id} on file)")))?;
        update.apply_to(&mut contact);
        validate_contact(&NewContact::from(&contact)).map_err(ContactApiError::ValidationError)?;
        let saved = self
            .db
            .save_contact(contact)
            .await?
            .ok_or_else(|| ContactApiError::MissingArguments(format!("id (no contact #{contact_id} on file)")))?;
        debug!("📇️ User #{user_id} updated contact #{contact_id}");
        Ok(saved)
    }

    /// Deletes the user's contacts listed in the comma-separated `items`. Ids belonging to other users are ignored, so
    /// the count can be zero.
    pub async fn delete_contacts(&self, user_id: i64, items: &str) -> Result<u64, ContactApiError> {
        let ids = parse_id_list(items);
        if ids.is_empty() {
            return Err(ContactApiError::MissingArguments("items".into()));
        }
        let deleted = self.db.delete_contacts(user_id, &ids).await?;
        debug!("📇️ User #{user_id} deleted {deleted} contacts");
        Ok(deleted)
    }
}
