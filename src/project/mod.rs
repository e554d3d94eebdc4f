//! Project files: the data model shared by the editor, the runtime and bundles.

pub mod sheet;
pub mod types;

pub use sheet::{parse_clause, parse_event};
pub use types::{ClauseData, EventData, FrameData, ObjectData, Params, ProjectData};
