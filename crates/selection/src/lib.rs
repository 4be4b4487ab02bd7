//! Region selection and geometry transplantation for the three-layer cell
//! grid.
//!
//! The crate is organised bottom-up:
//!
//! - [`mask`] / [`model`]: per-layer selection masks and the selection model
//! - [`combine`]: replace / add / subtract / intersect
//! - [`raster`]: lasso rasterization and the bounded flood fill
//! - [`tools`]: rectangle, lasso, magic wand, tile footprint and move drags
//! - [`transplant`]: extraction, the floating overlay, submit and cancel
//! - [`clipboard`]: versioned clipboard payloads
//! - [`session`]: the interaction state machine driving all of the above
//!
//! Grid, tile database, renderer and change history are reached only
//! through the traits in `level-core`.
pub mod clipboard;
pub mod combine;
pub mod error;
pub mod mask;
pub mod model;
pub mod raster;
pub mod session;
pub mod snapshot;
pub mod tools;
pub mod transplant;

pub use clipboard::{BincodeCodec, CLIPBOARD_VERSION, ClipboardCodec};
pub use combine::SelectionOperator;
pub use error::{CodecError, SelectionError};
pub use mask::{LayerSelection, OutlineEdge};
pub use model::{LayerCandidates, LayerMask, SelectionModel};
pub use session::{EditEnv, SelectionSession};
pub use snapshot::SessionSnapshot;
pub use tools::{SelectionTool, ToolDrag};
pub use transplant::{CellBuffer, TransplantEngine};
