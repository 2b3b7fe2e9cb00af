//! Frame sources and image codecs.
//!
//! Frames are addressed by [`crate::FrameRef`] and resolved to files through per-collection
//! name patterns. Decoding always yields straight-alpha RGBA8.

pub(crate) mod decode;
pub(crate) mod source;
