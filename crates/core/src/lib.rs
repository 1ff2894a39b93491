//! Awalan Core - Shared domain types.
//!
//! This crate provides the types used across the Awalan Design components:
//! - `site` - Public website backend and admin area
//! - `cli` - Command-line tools for migrations and admin management
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no database
//! access, no HTTP clients. Every type here validates on construction, so a
//! value that exists is a value that is well-formed.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, phone numbers, services and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
