//! Domain model for notes.
//!
//! # Responsibility
//! - Define the note shape shared by the store, use cases and state holders.
//! - Convert between inline markup text and content blocks.
//!
//! # Invariants
//! - A note's content order is the order users see it in.
//! - Storage identity (`NoteId`) is assigned by the store, never by callers.

pub mod markup;
pub mod note;
