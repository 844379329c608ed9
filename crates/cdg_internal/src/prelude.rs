//! Prelude module for `cdg_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use cdg_internal::prelude::*;
//!
//! let project = Project::new();
//! let font = BuiltinFont::default();
//! ```

// Re-export everything from cdg_types::prelude
#[doc(inline)]
pub use cdg_types::prelude::*;

// Re-export the entire cdg_types module for advanced usage
#[doc(inline)]
pub use cdg_types;
