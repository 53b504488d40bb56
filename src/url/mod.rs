//! URL handling module for Sumi-Mirror
//!
//! This module decides which link targets belong to the mirrored site and
//! rewrites path-absolute links into the absolute form the stores use.

mod scope;

pub use scope::Scope;
