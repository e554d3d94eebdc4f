//! Event-sheet rows: conditions, actions, and the signals actions raise.

use super::frame::Frame;
use super::input::InputState;
use std::fmt;

/// A test evaluated against the current frame every tick.
pub trait Condition: fmt::Debug + Send {
    fn check(&self, frame: &Frame, input: &InputState) -> bool;

    /// Short human-readable form for logs and the play screen.
    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// An effect applied to the current frame when a row fires.
pub trait Action: fmt::Debug + Send {
    fn execute(&self, frame: &mut Frame, signals: &mut FrameSignals);

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// Requests that reach past the current frame, applied by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSignals {
    /// Frame to switch to at the start of the next tick (last request wins)
    pub goto: Option<String>,
    pub quit: bool,
}

/// One row of the event sheet.
#[derive(Debug, Default)]
pub struct Event {
    pub conditions: Vec<Box<dyn Condition>>,
    pub actions: Vec<Box<dyn Action>>,
}

impl Event {
    pub fn new(conditions: Vec<Box<dyn Condition>>, actions: Vec<Box<dyn Action>>) -> Self {
        Self {
            conditions,
            actions,
        }
    }

    /// Run every action in order if all conditions hold. A row without
    /// conditions always fires. Returns whether it fired.
    pub fn run(&self, frame: &mut Frame, input: &InputState, signals: &mut FrameSignals) -> bool {
        if !self.conditions.iter().all(|c| c.check(frame, input)) {
            return false;
        }
        for action in &self.actions {
            action.execute(frame, signals);
        }
        true
    }
}
