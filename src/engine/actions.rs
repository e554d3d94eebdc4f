//! Built-in actions.

use super::events::{Action, FrameSignals};
use super::frame::Frame;
use super::registry::{number_param, required_param};
use crate::core::Result;
use crate::math::Color;
use crate::project::Params;

/// Recolors an object. An unparseable color leaves the object unchanged.
#[derive(Debug, Clone)]
pub struct ChangeObjectColor {
    pub obj_name: String,
    pub color: Option<Color>,
}

impl ChangeObjectColor {
    pub fn from_params(params: &Params) -> Result<Box<dyn Action>> {
        let obj_name = required_param(params, "ChangeObjectColor", &["obj_name"])?;
        let text = params.get_any(&["color_str", "color"]).unwrap_or("");
        let color = Color::parse(text).ok();
        if color.is_none() {
            log::warn!("ChangeObjectColor: `{}` is not a color; action does nothing", text);
        }
        Ok(Box::new(ChangeObjectColor {
            obj_name: obj_name.to_string(),
            color,
        }))
    }
}

impl Action for ChangeObjectColor {
    fn execute(&self, frame: &mut Frame, _signals: &mut FrameSignals) {
        if let (Some(obj), Some(color)) = (frame.object_mut(&self.obj_name), self.color) {
            obj.color = color;
            obj.animation = None;
        }
    }
}

#[derive(Debug, Clone)]
pub struct DestroyObject {
    pub obj_name: String,
}

impl DestroyObject {
    pub fn from_params(params: &Params) -> Result<Box<dyn Action>> {
        Ok(Box::new(DestroyObject {
            obj_name: required_param(params, "DestroyObject", &["obj_name"])?.to_string(),
        }))
    }
}

impl Action for DestroyObject {
    fn execute(&self, frame: &mut Frame, _signals: &mut FrameSignals) {
        if frame.remove_object(&self.obj_name).is_some() {
            log::debug!("Destroyed `{}` in frame `{}`", self.obj_name, frame.name);
        }
    }
}

/// Requests a frame switch, applied at the start of the next tick.
#[derive(Debug, Clone)]
pub struct GoToFrame {
    pub frame_name: String,
}

impl GoToFrame {
    pub fn from_params(params: &Params) -> Result<Box<dyn Action>> {
        Ok(Box::new(GoToFrame {
            frame_name: required_param(params, "GoToFrame", &["frame_name"])?.to_string(),
        }))
    }
}

impl Action for GoToFrame {
    fn execute(&self, _frame: &mut Frame, signals: &mut FrameSignals) {
        signals.goto = Some(self.frame_name.clone());
    }
}

#[derive(Debug, Clone)]
pub struct SetCounterValue {
    pub counter_name: String,
    pub value: f64,
}

impl SetCounterValue {
    pub fn from_params(params: &Params) -> Result<Box<dyn Action>> {
        Ok(Box::new(SetCounterValue {
            counter_name: required_param(params, "SetCounterValue", &["counter_name"])?
                .to_string(),
            value: number_param(params, "SetCounterValue", &["value"])?,
        }))
    }
}

impl Action for SetCounterValue {
    fn execute(&self, frame: &mut Frame, _signals: &mut FrameSignals) {
        if let Some(obj) = frame.object_mut(&self.counter_name) {
            obj.set_counter_value(self.value);
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddToCounter {
    pub counter_name: String,
    pub value: f64,
}

impl AddToCounter {
    pub fn from_params(params: &Params) -> Result<Box<dyn Action>> {
        Ok(Box::new(AddToCounter {
            counter_name: required_param(params, "AddToCounter", &["counter_name"])?.to_string(),
            value: number_param(params, "AddToCounter", &["value"])?,
        }))
    }
}

impl Action for AddToCounter {
    fn execute(&self, frame: &mut Frame, _signals: &mut FrameSignals) {
        if let Some(obj) = frame.object_mut(&self.counter_name) {
            if let Some(current) = obj.counter_value() {
                obj.set_counter_value(current + self.value);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SetText {
    pub obj_name: String,
    pub text: String,
}

impl SetText {
    pub fn from_params(params: &Params) -> Result<Box<dyn Action>> {
        Ok(Box::new(SetText {
            obj_name: required_param(params, "SetText", &["obj_name"])?.to_string(),
            text: params.get("text").unwrap_or("").to_string(),
        }))
    }
}

impl Action for SetText {
    fn execute(&self, frame: &mut Frame, _signals: &mut FrameSignals) {
        if let Some(obj) = frame.object_mut(&self.obj_name) {
            obj.set_text(&self.text);
        }
    }
}

/// Moves an object by a fixed offset each time the row fires.
#[derive(Debug, Clone)]
pub struct MoveObject {
    pub obj_name: String,
    pub dx: f32,
    pub dy: f32,
}

impl MoveObject {
    pub fn from_params(params: &Params) -> Result<Box<dyn Action>> {
        Ok(Box::new(MoveObject {
            obj_name: required_param(params, "MoveObject", &["obj_name"])?.to_string(),
            dx: number_param(params, "MoveObject", &["dx"])? as f32,
            dy: number_param(params, "MoveObject", &["dy"])? as f32,
        }))
    }
}

impl Action for MoveObject {
    fn execute(&self, frame: &mut Frame, _signals: &mut FrameSignals) {
        if let Some(obj) = frame.object_mut(&self.obj_name) {
            obj.x += self.dx;
            obj.y += self.dy;
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuitGame;

impl QuitGame {
    pub fn from_params(_params: &Params) -> Result<Box<dyn Action>> {
        Ok(Box::new(QuitGame))
    }
}

impl Action for QuitGame {
    fn execute(&self, _frame: &mut Frame, signals: &mut FrameSignals) {
        signals.quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::object::EngineObject;
    use crate::project::ClauseData;

    fn frame() -> Frame {
        let mut frame = Frame::new("Level1", Color::BLACK);
        frame.add_object(EngineObject::active("Player", 0.0, 0.0, 50.0, 50.0, Color::RED));
        frame.add_object(EngineObject::counter("Score", 0.0, 0.0, 5.0, 24, Color::WHITE));
        frame.add_object(EngineObject::text("Label", 0.0, 0.0, "Hi", 24, Color::WHITE));
        frame
    }

    fn run(action: Box<dyn Action>, frame: &mut Frame) -> FrameSignals {
        let mut signals = FrameSignals::default();
        action.execute(frame, &mut signals);
        signals
    }

    #[test]
    fn test_change_color_accepts_both_param_spellings() {
        let mut f = frame();
        run(
            ChangeObjectColor::from_params(
                &ClauseData::new("ChangeObjectColor")
                    .with("obj_name", "Player")
                    .with("color_str", "(0,255,0)")
                    .params,
            )
            .unwrap(),
            &mut f,
        );
        assert_eq!(f.object("Player").unwrap().color, Color::GREEN);

        run(
            ChangeObjectColor::from_params(
                &ClauseData::new("ChangeObjectColor")
                    .with("obj_name", "Player")
                    .with("color", "BLUE")
                    .params,
            )
            .unwrap(),
            &mut f,
        );
        assert_eq!(f.object("Player").unwrap().color, Color::BLUE);
    }

    #[test]
    fn test_change_color_with_bad_color_is_noop() {
        let mut f = frame();
        run(
            ChangeObjectColor::from_params(
                &ClauseData::new("ChangeObjectColor")
                    .with("obj_name", "Player")
                    .with("color_str", "not a color")
                    .params,
            )
            .unwrap(),
            &mut f,
        );
        assert_eq!(f.object("Player").unwrap().color, Color::RED);
    }

    #[test]
    fn test_destroy_object() {
        let mut f = frame();
        let destroy = DestroyObject::from_params(
            &ClauseData::new("DestroyObject").with("obj_name", "Player").params,
        )
        .unwrap();
        run(destroy, &mut f);
        assert!(f.object("Player").is_none());
        assert_eq!(f.objects.len(), 2);
    }

    #[test]
    fn test_goto_and_quit_raise_signals() {
        let mut f = frame();
        let signals = run(
            GoToFrame::from_params(&ClauseData::new("GoToFrame").with("frame_name", "Menu").params)
                .unwrap(),
            &mut f,
        );
        assert_eq!(signals.goto.as_deref(), Some("Menu"));
        assert!(!signals.quit);

        let signals = run(QuitGame::from_params(&Params::default()).unwrap(), &mut f);
        assert!(signals.quit);
    }

    #[test]
    fn test_counter_actions() {
        let mut f = frame();
        run(
            SetCounterValue::from_params(
                &ClauseData::new("SetCounterValue")
                    .with("counter_name", "Score")
                    .with("value", "")
                    .params,
            )
            .unwrap(),
            &mut f,
        );
        assert_eq!(f.object("Score").unwrap().counter_value(), Some(0.0));

        let add = AddToCounter::from_params(
            &ClauseData::new("AddToCounter")
                .with("counter_name", "Score")
                .with("value", "2.5")
                .params,
        )
        .unwrap();
        run(add, &mut f);
        assert_eq!(f.object("Score").unwrap().counter_value(), Some(2.5));

        // Not a counter: nothing happens
        let set_player = SetCounterValue::from_params(
            &ClauseData::new("SetCounterValue")
                .with("counter_name", "Player")
                .with("value", "9")
                .params,
        )
        .unwrap();
        run(set_player, &mut f);
        assert!(f.object("Player").unwrap().counter_value().is_none());
    }

    #[test]
    fn test_set_text_and_move() {
        let mut f = frame();
        run(
            SetText::from_params(
                &ClauseData::new("SetText")
                    .with("obj_name", "Label")
                    .with("text", "Game Over")
                    .params,
            )
            .unwrap(),
            &mut f,
        );
        assert_eq!(
            f.object("Label").unwrap().display_text().as_deref(),
            Some("Game Over")
        );

        run(
            MoveObject::from_params(
                &ClauseData::new("MoveObject")
                    .with("obj_name", "Player")
                    .with("dx", "5")
                    .with("dy", "-2")
                    .params,
            )
            .unwrap(),
            &mut f,
        );
        let player = f.object("Player").unwrap();
        assert_eq!((player.x, player.y), (5.0, -2.0));
    }
}
