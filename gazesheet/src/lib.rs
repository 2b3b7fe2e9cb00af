//! Gazesheet assembles directional sprite sheets from numbered video frames.
//!
//! A project file maps gaze directions (`up`, `down_left`, `blink`, ...) to ordered lists of
//! source frames. Building a sheet turns those frames into one fixed-grid RGBA image plus an
//! index table telling a game engine which cells belong to which direction.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: [`ProjectConfig::sheet`] validates a sheet and derives its [`SheetLayout`].
//! 2. **Process**: every distinct [`FrameRef`] is loaded, background-classified
//!    ([`BackgroundClassifier`]) and resampled to the tile size, once per run ([`FrameCache`]).
//! 3. **Composite**: tiles are placed at `(i mod cols, i div cols)` of a transparent canvas.
//! 4. **Index**: [`DirectionIndexTable`] is derived from the same layout, so its ranges always
//!    match the pixels.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs give byte-identical sheets, with or without parallelism.
//! - **Per-frame isolation**: a missing or broken frame leaves one transparent cell and a
//!   [`BuildWarning`]; only configuration problems abort a build.
//! - **Straight RGBA8** end-to-end: no premultiplication anywhere in the pipeline.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod classify;
mod config;
mod foundation;
mod layout;
mod render;
mod session;

pub use assets::decode::{decode_image, encode_png};
pub use assets::source::{FramePattern, FrameSource, SourceDir, SourceSurvey, resolve_path};
pub use classify::remote::DEFAULT_ENDPOINT;
pub use classify::{
    BackgroundClassifier, CheckerKeyClassifier, CheckerKeyParams, Classified, ClassifierConfig,
    HttpSegmentationService, LumaKeyClassifier, LumaKeyParams, RemoteClassifier, RemoteParams,
    SegmentationService,
};
pub use config::model::{
    GridDef, IndexFormat, OutputDef, ProjectConfig, ProjectDef, SheetDef, SheetOutput, SheetSpec,
    SourceDef,
};
pub use foundation::core::{Direction, FrameRef, GridShape, IndexRange};
pub use foundation::error::{SheetError, SheetResult};
pub use layout::grid::{DirectionRun, MAX_CANVAS_BYTES, SheetLayout, Slot};
pub use layout::index::{DirectionIndexTable, check_lockstep};
pub use render::composite::{cell_is_transparent, composite_sheet};
pub use render::normalize::normalize_tile;
pub use render::slice::{SlicedTile, slice_sheet};
pub use session::build::{SheetBuild, SheetBuilder, build_sheet};
pub use session::cache::{CachedFrame, FrameCache, FrameFailure};
pub use session::output::{WrittenOutputs, render_index, save_png, write_outputs};
pub use session::process::{Threading, process_frame};
pub use session::report::{BuildReport, BuildWarning, WarningKind};
