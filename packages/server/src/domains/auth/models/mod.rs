pub mod admin_user;
pub mod session;

pub use admin_user::{normalize_email, AdminUser, PgAdminUserStore, ADMIN_ROLE};
pub use session::{LoginAttempts, Session, LOCKOUT_MINUTES, MAX_FAILED_ATTEMPTS};
