//! References into the commit history.
//!
//! History is linear, so the only reference is HEAD.

pub mod head;

pub use head::HeadFile;
