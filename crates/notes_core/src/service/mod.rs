//! Use cases over the notes repository.
//!
//! # Responsibility
//! - Wrap exactly one repository call per use case.
//! - Stamp save timestamps and default flags so callers cannot forget them.

pub mod use_cases;
