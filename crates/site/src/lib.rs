//! Awalan Design site library.
//!
//! The public site's form backend and the admin area: contact and newsletter
//! intake, admin authentication, and the read-only dashboard. Built as a
//! library so the integration tests can drive the same router as the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
