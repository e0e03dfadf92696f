//! State-change notification.

/// Receives a notification after every change to the round state.
///
/// No payload is passed; the receiver re-reads [`crate::Game::state`].
pub trait Observer {
    /// Called after the state changed.
    fn state_changed(&mut self);
}

impl<F: FnMut()> Observer for F {
    fn state_changed(&mut self) {
        self();
    }
}
