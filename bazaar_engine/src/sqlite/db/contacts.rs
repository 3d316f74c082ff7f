use log::debug;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{Contact, NewContact};

pub async fn fetch_contacts(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Contact>, sqlx::Error> {
    let contacts =
        sqlx::query_as("SELECT * FROM contacts WHERE user_id = $1 ORDER BY id").bind(user_id).fetch_all(conn).await?;
    Ok(contacts)
}

pub async fn fetch_contact(
    user_id: i64,
    contact_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Contact>, sqlx::Error> {
    let contact = sqlx::query_as("SELECT * FROM contacts WHERE id = $1 AND user_id = $2")
        .bind(contact_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(contact)
}

pub async fn count_contacts(user_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count =
        sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE user_id = $1").bind(user_id).fetch_one(conn).await?;
    Ok(count)
}

pub async fn insert_contact(
    user_id: i64,
    contact: NewContact,
    conn: &mut SqliteConnection,
) -> Result<Contact, sqlx::Error> {
    let contact: Contact = sqlx::query_as(
        r#"
            INSERT INTO contacts (user_id, country, region, zip, city, street, house, building, apartment, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(contact.country)
    .bind(contact.region)
    .bind(contact.zip)
    .bind(contact.city)
    .bind(contact.street)
    .bind(contact.house)
    .bind(contact.building)
    .bind(contact.apartment)
    .bind(contact.phone)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Contact #{} saved for user #{user_id}", contact.id);
    Ok(contact)
}

/// Overwrites every field of the contact. Matches on both the id and the owner, so `None` means the contact does not
/// exist or belongs to someone else.
pub async fn update_contact(contact: Contact, conn: &mut SqliteConnection) -> Result<Option<Contact>, sqlx::Error> {
    let updated = sqlx::query_as(
        r#"
            UPDATE contacts SET
                country = $1, region = $2, zip = $3, city = $4, street = $5,
                house = $6, building = $7, apartment = $8, phone = $9
            WHERE id = $10 AND user_id = $11
            RETURNING *;
        "#,
    )
    .bind(contact.country)
    .bind(contact.region)
    .bind(contact.zip)
    .bind(contact.city)
    .bind(contact.street)
    .bind(contact.house)
    .bind(contact.building)
    .bind(contact.apartment)
    .bind(contact.phone)
    .bind(contact.id)
    .bind(contact.user_id)
    .fetch_optional(conn)
    .await?;
    Ok(updated)
}

pub async fn delete_contacts(user_id: i64, ids: &[i64], conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new("DELETE FROM contacts WHERE user_id = ");
    builder.push_bind(user_id).push(" AND id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}
