//! Core types for the Awalan site.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod service;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use service::{ServiceKind, ServiceKindError};
pub use status::{ContactStatus, ContactStatusError};
