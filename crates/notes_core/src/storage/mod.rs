//! App-private file storage.
//!
//! # Responsibility
//! - Own the private image directory notes point into.
//! - Copy externally referenced images in and delete orphaned ones.
//!
//! # Invariants
//! - Only files inside the private image directory are ever deleted.

pub mod image_files;
