//! Core domain models and logic for folio
//!
//! This crate contains:
//! - Domain models (ContentItem, NewContent, ContentPatch, User)
//! - Collaborator traits (ContentStore, MediaStore, AuthProvider)
//! - Display mapping and category filtering for the public page
//! - Media classification and login form validation

pub mod content;
pub mod display;
pub mod error;
pub mod login;
pub mod media;
pub mod store;

pub use content::{ContentItem, ContentPatch, ContentType, NewContent, parse_tags};
pub use display::{Category, CategoryFilter, DisplayItem, categories, legacy_items, to_display};
pub use error::{CoreError, Result};
pub use login::{FieldErrors, LoginField, LoginForm, friendly_auth_message, validate_login};
pub use media::{accepts_mime, file_extension, is_video_url, upload_path};
pub use store::{AuthProvider, ContentStore, Credentials, MediaStore, Session, User};
