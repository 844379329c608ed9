#![allow(clippy::single_component_path_imports)]

//! `cdg-rs` authors CD+Graphics (CD+G) karaoke streams: a timeline of
//! bitmap, palette, text, and scroll clips goes in, a conformant 300
//! packets/second `.cdg` subcode stream comes out.
//!
//! This crate is a thin re-export of [`cdg_internal`]; the encoding
//! pipeline itself lives in `cdg_types`.

pub use cdg_internal::*;
