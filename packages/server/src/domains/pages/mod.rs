//! Facebook Page credentials managed from the setup screen.

pub mod models;

pub use models::{NewPageCredential, PageCredential, PgPageCredentialStore};
