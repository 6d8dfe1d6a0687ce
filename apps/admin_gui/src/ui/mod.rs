//! UI layer for the admin GUI: app shell, toolbar, table, dialogs, form and toasts.

pub mod add_form;
pub mod app;
pub mod header;
pub mod modals;
pub mod table;
pub mod toasts;

pub use app::{CategoriesAdminApp, PersistedListPreferences, PREFERENCES_STORAGE_KEY};
