//! Integration tests for Blogsmith
//!
//! Each test drives the real router with the provider and the image
//! redirector mocked.

mod auth;
mod blog;
mod health;
