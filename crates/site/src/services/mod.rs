//! Business logic services.

pub mod auth;
pub mod email;
pub mod intake;
pub mod unsubscribe;
pub mod validation;

pub use email::{EmailNotifier, LogNotifier, Notifier, NotifyError};
pub use intake::{ContactReceipt, IntakeError, IntakeService, IntakeStage};
pub use unsubscribe::UnsubscribeSigner;
