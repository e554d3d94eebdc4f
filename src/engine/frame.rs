//! A frame (scene/level): objects plus the event sheet that drives them.

use super::events::{Event, FrameSignals};
use super::input::InputState;
use super::object::EngineObject;
use crate::math::Color;

#[derive(Debug)]
pub struct Frame {
    pub name: String,
    pub bg_color: Color,
    /// Draw order: later objects are drawn on top
    pub objects: Vec<EngineObject>,
    pub events: Vec<Event>,
}

impl Frame {
    pub fn new(name: &str, bg_color: Color) -> Self {
        Self {
            name: name.to_string(),
            bg_color,
            objects: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn add_object(&mut self, obj: EngineObject) {
        self.objects.push(obj);
    }

    /// Remove the first object with this name. Returns it if found.
    pub fn remove_object(&mut self, name: &str) -> Option<EngineObject> {
        let index = self.objects.iter().position(|o| o.name == name)?;
        Some(self.objects.remove(index))
    }

    pub fn object(&self, name: &str) -> Option<&EngineObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut EngineObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    /// Advance objects, then evaluate the event sheet top to bottom.
    ///
    /// Actions take effect immediately, so later rows see what earlier rows did.
    pub fn update(&mut self, dt: f32, input: &InputState) -> FrameSignals {
        for obj in &mut self.objects {
            obj.update(dt);
        }

        let mut signals = FrameSignals::default();
        let events = std::mem::take(&mut self.events);
        for event in &events {
            event.run(self, input, &mut signals);
        }
        // Actions cannot add rows, so the sheet is restored as-is
        self.events = events;
        signals
    }
}
