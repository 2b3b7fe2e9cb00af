//! Sheet builds.
//!
//! A build resolves every unique frame once through a per-run [`crate::FrameCache`], then
//! composites single-threaded in flattened-index order. Per-frame problems end up in the
//! [`crate::BuildReport`] instead of aborting the run.

pub(crate) mod build;
pub(crate) mod cache;
pub(crate) mod output;
pub(crate) mod process;
pub(crate) mod report;
