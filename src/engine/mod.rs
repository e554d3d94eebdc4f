//! Fusion-style event engine: frames of objects driven by condition/action rows.

pub mod actions;
pub mod bundle;
pub mod conditions;
pub mod events;
pub mod frame;
pub mod input;
pub mod object;
pub mod registry;
pub mod runtime;

pub use bundle::{build_bundle, load_bundle, GameBundle};
pub use events::{Action, Condition, Event, FrameSignals};
pub use frame::Frame;
pub use input::{InputState, Key};
pub use object::{EngineObject, ObjectKind};
pub use registry::{CorePlugin, ExamplePlugin, Plugin, Registry};
pub use runtime::Engine;
