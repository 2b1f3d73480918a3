//! Integration tests for Quill server
//!
//! Each test boots the full router against a fresh in-memory database.

mod api_tests;
mod web_tests;
