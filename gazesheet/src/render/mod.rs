//! Pixel work on already-classified frames: tile normalization, sheet compositing and slicing.

pub(crate) mod composite;
pub(crate) mod normalize;
pub(crate) mod slice;
