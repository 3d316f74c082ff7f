//! Input validation shared by the engine APIs.
mod id_list;
mod validation;

pub use id_list::parse_id_list;
pub use validation::{is_valid_phone, is_valid_zip, validate_contact, FieldErrors, MAX_ZIP_LENGTH};
