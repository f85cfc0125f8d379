//! Flutter-facing bindings over `notes_core`.

pub mod api;
