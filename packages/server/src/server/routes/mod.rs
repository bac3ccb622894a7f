// HTTP routes
pub mod auth;
pub mod comments;
pub mod health;
pub mod pages;
pub mod posts;
pub mod proxy;
pub mod topics;

pub use auth::*;
pub use comments::*;
pub use health::*;
pub use pages::*;
pub use posts::*;
pub use proxy::*;
pub use topics::*;
