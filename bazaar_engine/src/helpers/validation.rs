use std::{collections::BTreeMap, fmt::Display, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::db_types::{Contact, NewContact};

pub const MAX_ZIP_LENGTH: usize = 10;

/// Optional `8` or `+7` prefix, optional (parenthesised) area code, then 7-10 digits, dashes or spaces. The pattern is
/// searched for anywhere in the input rather than anchored.
const PHONE_PATTERN: &str = r"((8|\+7)[\- ]?)?(\(?\d{3}\)?[\- ]?)?[\d\- ]{7,10}";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

pub fn is_valid_zip(zip: &str) -> bool {
    zip.chars().count() <= MAX_ZIP_LENGTH
}

/// Field-level validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// `Ok(())` when no errors were collected, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self.0.iter().map(|(field, msgs)| format!("{field}: {}", msgs.join(" "))).collect::<Vec<_>>();
        write!(f, "{}", parts.join("; "))
    }
}

fn check_contact_fields(phone: &str, zip: &str, required: &[(&str, &str)]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for (name, value) in required {
        if value.trim().is_empty() {
            errors.add(*name, "This field may not be blank.");
        }
    }
    if !is_valid_zip(zip) {
        errors.add("zip", format!("Ensure this field has no more than {MAX_ZIP_LENGTH} characters."));
    }
    if !phone.trim().is_empty() && !is_valid_phone(phone) {
        errors.add("phone", "Invalid phone number.");
    }
    errors.into_result()
}

/// Validates a contact that is about to be stored, either a brand new one or the result of applying an update.
pub fn validate_contact(contact: &NewContact) -> Result<(), FieldErrors> {
    check_contact_fields(&contact.phone, &contact.zip, &[
        ("country", &contact.country),
        ("region", &contact.region),
        ("zip", &contact.zip),
        ("city", &contact.city),
        ("street", &contact.street),
        ("house", &contact.house),
        ("phone", &contact.phone),
    ])
}

impl From<&Contact> for NewContact {
    fn from(c: &Contact) -> Self {
        Self {
            country: c.country.clone(),
            region: c.region.clone(),
            zip: c.zip.clone(),
            city: c.city.clone(),
            street: c.street.clone(),
            house: c.house.clone(),
            building: c.building.clone(),
            apartment: c.apartment.clone(),
            phone: c.phone.clone(),
        }
    }
}
