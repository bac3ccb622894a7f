// Pagecast - API Core
//
// Backend for a small admin dashboard that publishes to Facebook Pages:
// Page credentials, immediate and scheduled posts, pre-written comments and
// Apify-backed topic search.
//
// Business logic lives in domains/*; shared infrastructure in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
