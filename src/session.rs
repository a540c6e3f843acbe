//! Communication session management
//!
//! This module defines the trait for tunneling messages between the game
//! engine and the attached frontend. The tunnel abstraction keeps the
//! engine independent of how the frontend is wired up (an in-process
//! renderer, a WebSocket, a test recorder).

use super::{SyncMessage, UpdateMessage};

/// Trait for sending messages through a communication tunnel
///
/// The game has a single local operator, so there is exactly one tunnel
/// at a time; the engine never enumerates or addresses clients.
pub trait Tunnel {
    /// Sends an update message to the frontend
    ///
    /// Update messages notify the frontend about incremental changes
    /// to its current view.
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a state synchronization message to the frontend
    ///
    /// Sync messages carry the complete view model for the active screen,
    /// typically sent when the frontend attaches or reattaches.
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to send
    fn send_state(&self, state: &SyncMessage);

    /// Closes the communication tunnel
    ///
    /// This method should be called when the frontend detaches or
    /// when the communication is no longer needed.
    fn close(self);
}
