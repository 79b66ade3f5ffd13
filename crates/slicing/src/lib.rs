//! Interactive volumetric slicing: an oriented clip box (or a single cut
//! line) applied consistently to the globe and to every scene object, with
//! draggable handles for resizing.
//!
//! The [`Slicer`] coordinator selects a tool for the requested mode, the
//! box tool maintains the six-plane clip volume, and [`DragHandleSet`]
//! turns pointer movement into metric face moves.

pub mod box_tool;
pub mod coordinator;
pub mod handles;
pub mod line_tool;
pub mod tool;
pub mod volume;

pub use box_tool::{BoxSliceTool, BoxToolParams};
pub use coordinator::{PointCollectionTool, ShapeKind, SliceOptions, Slicer};
pub use handles::{
    CursorStyle, DragEvent, DragHandleSet, HandlePlacement, HandleSpec, OppositeRef,
};
pub use line_tool::{LineSliceTool, LineToolParams};
pub use tool::{GeometrySnapshot, SliceMode, SliceTool};
pub use volume::{MIN_BOX_SIZE_M, Side, SliceCorners, SliceVolume};
