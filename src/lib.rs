//! websec - terminal client for the WebSec vulnerability scanning service
//!
//! The backend does all scanning and reporting. This crate holds the session,
//! guards the views, talks to the REST API through a typed client and follows
//! running scans by polling their progress.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod guard;
pub mod home;
pub mod notify;
pub mod poller;
pub mod render;
pub mod router;
pub mod session;
pub mod validation;
