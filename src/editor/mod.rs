//! Project editor state, independent of any front end.

pub mod model;

pub use model::{param_fields, ClauseRole, EditorState, ACTION_TYPES, CONDITION_TYPES, PROPERTY_FIELDS};
