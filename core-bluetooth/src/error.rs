//! # Bluetooth Policy Error Types

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors surfaced by listener lifecycle operations.
///
/// Event handling itself never fails: malformed or irrelevant events are
/// dropped.
#[derive(Error, Debug)]
pub enum BluetoothError {
    /// `stop` was called on a listener that is not registered.
    #[error("{listener} listener is not registered")]
    NotListening { listener: &'static str },

    /// `start` was called on a listener that is already registered.
    #[error("{listener} listener is already registered")]
    AlreadyListening { listener: &'static str },

    /// The event channel rejected a register or unregister call.
    #[error("Event channel error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, BluetoothError>;
