pub mod page_credential;

pub use page_credential::{NewPageCredential, PageCredential, PgPageCredentialStore};
