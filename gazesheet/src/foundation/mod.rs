//! Core value types, the error taxonomy and small numeric helpers shared by every module.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
