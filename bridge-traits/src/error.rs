//! Errors reported by host bridge implementations.

use thiserror::Error;

use crate::channel::SubscriptionHandle;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host refused or failed to perform the operation.
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// `unregister` was given a handle the channel does not know.
    #[error("No handler registered for subscription {0}")]
    NotRegistered(SubscriptionHandle),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
