//! Screen state holders for hosts that render notes.
//!
//! # Responsibility
//! - Hold per-screen state and apply user commands to it.
//! - Call use cases for commands that touch storage.
//!
//! # Invariants
//! - State only changes through `process`.
//! - Commands that end a screen return `EditorEvent::Finished`; the host
//!   decides where to go next.

pub mod blocks;
pub mod create;
pub mod edit;
pub mod notes_list;

/// One-shot signal emitted by a state holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The screen is done and should be closed.
    Finished,
}
