//! Project configuration.
//!
//! A single JSON project file declares the frame collections and any number of named sheets.
//! Loading a sheet resolves its paths against the project directory and validates it before any
//! image is touched.

pub(crate) mod model;
pub(crate) mod validate;
