//! Insurance claims reporting engine.
//!
//! The [`data`] layer loads the claims table once and derives every view a
//! dashboard shows from it. Presentation lives in the binary.

pub mod data;
