// Business domains
pub mod auth;
pub mod comments;
pub mod pages;
pub mod posts;
pub mod publishing;
pub mod topics;
