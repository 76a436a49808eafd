//! Provider implementations

#[cfg(feature = "gemini")]
pub mod gemini;
