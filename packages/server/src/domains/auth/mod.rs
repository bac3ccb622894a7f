//! Auth domain - dashboard sign-in for admin accounts
//!
//! Responsibilities:
//! - Email + bcrypt password verification against `authorized_users`
//! - Lockout after repeated failures
//! - Session/JWT token management

pub mod jwt;
pub mod login;
pub mod models;
pub mod session_store;

pub use jwt::{Claims, IssuedToken, JwtService, SESSION_TTL_HOURS};
pub use login::{login, logout, AuthError, LoginSuccess};
pub use models::{AdminUser, LoginAttempts, PgAdminUserStore, Session};
pub use session_store::MemorySessionStore;
