pub mod api;
pub mod auth;
pub mod booking;
pub mod catalog;
pub mod fetch;
pub mod session;
pub mod wizard;
