//! Data layer: row access, row/domain mapping and the notes repository.
//!
//! # Responsibility
//! - Isolate SQL details from use cases and state holders.
//! - Own the image lifecycle tied to note saves and deletes.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage and file errors.

pub mod error;
pub mod mapper;
pub mod notes_dao;
pub mod notes_repo;
