//! Draft editors behind the admin console's modals.
//!
//! A draft is a local copy of an entity being edited. It is validated
//! before anything is sent, merged with its list fields into one payload on
//! submit, and thrown away once the server accepted it.

mod category;
mod product;
mod slug;
mod tags;
mod upload;
mod validation;

pub use category::CategoryEditor;
pub use product::{category_options, CategoryOption, ProductEditor};
pub use slug::derive_slug;
pub use tags::{KeyInput, KeyOutcome, TagList};
pub use upload::{upload_each, UploadOutcome, UploadReport};
pub use validation::FieldErrors;
