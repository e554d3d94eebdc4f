//! The runtime: owns the frames of a loaded project and steps the current one.

use super::events::Event;
use super::frame::Frame;
use super::input::{InputState, Key};
use super::registry::Registry;
use crate::core::{EngineConfig, EngineError, Result};
use crate::math::Color;
use crate::project::{ClauseData, EventData, FrameData, ProjectData};
use indexmap::IndexMap;

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    registry: Registry,
    /// Frames in project order
    frames: IndexMap<String, Frame>,
    current: Option<String>,
    /// Jump requested by `GoToFrame`, applied at the start of the next step
    pending_jump: Option<String>,
    input: InputState,
    /// Sub-step time accumulator (milliseconds)
    accumulated_ms: u64,
    running: bool,
    tick_count: u64,
}

impl Engine {
    pub fn new(config: EngineConfig, registry: Registry) -> Self {
        let input = InputState::new(config.input_hold_ticks);
        Self {
            config,
            registry,
            frames: IndexMap::new(),
            current: None,
            pending_jump: None,
            input,
            accumulated_ms: 0,
            running: false,
            tick_count: 0,
        }
    }

    /// Replace all frames with the ones described by `project`.
    ///
    /// A frame whose name repeats an earlier one replaces it, keeping the
    /// earlier position. Clauses of unregistered types are dropped with a
    /// warning unless `strict_project` is set, in which case loading fails.
    pub fn load_project(&mut self, project: &ProjectData) -> Result<()> {
        let mut frames = IndexMap::new();
        for frame_data in &project.frames {
            let frame = self.build_frame(frame_data)?;
            if frames.insert(frame.name.clone(), frame).is_some() {
                log::warn!("Duplicate frame `{}`; the later one wins", frame_data.name);
            }
        }
        log::info!("Loaded project with {} frame(s)", frames.len());

        self.frames = frames;
        self.current = None;
        self.pending_jump = None;
        self.accumulated_ms = 0;
        self.running = false;
        Ok(())
    }

    fn build_frame(&self, data: &FrameData) -> Result<Frame> {
        let mut frame = Frame::new(&data.name, Color::from_array(data.bg_color));
        for obj in &data.objects {
            frame.add_object(self.registry.build_object(obj)?);
        }
        for event in &data.events {
            frame.events.push(self.build_event(&data.name, event)?);
        }
        Ok(frame)
    }

    fn build_event(&self, frame_name: &str, data: &EventData) -> Result<Event> {
        let mut event = Event::default();
        for clause in &data.conditions {
            if self.skip_unknown(frame_name, clause, self.registry.has_condition(&clause.kind))? {
                continue;
            }
            event.conditions.push(self.registry.build_condition(clause)?);
        }
        for clause in &data.actions {
            if self.skip_unknown(frame_name, clause, self.registry.has_action(&clause.kind))? {
                continue;
            }
            event.actions.push(self.registry.build_action(clause)?);
        }
        Ok(event)
    }

    /// Whether an unregistered clause should be skipped. Errors in strict mode.
    fn skip_unknown(&self, frame_name: &str, clause: &ClauseData, known: bool) -> Result<bool> {
        if known {
            return Ok(false);
        }
        if self.config.strict_project {
            return Err(EngineError::UnknownType {
                kind: "clause",
                name: clause.kind.clone(),
            });
        }
        log::warn!(
            "Frame `{}`: skipping unknown clause type `{}`",
            frame_name,
            clause.kind
        );
        Ok(true)
    }

    /// Switch frames immediately. Unknown names are ignored.
    pub fn change_frame(&mut self, name: &str) -> bool {
        if !self.frames.contains_key(name) {
            log::warn!("GoToFrame: no frame named `{}`", name);
            return false;
        }
        log::debug!("Entering frame `{}`", name);
        self.current = Some(name.to_string());
        true
    }

    /// Start running at `frame`, or at the first frame if none is given.
    pub fn start(&mut self, frame: Option<&str>) -> Result<()> {
        let name = match frame {
            Some(name) if self.frames.contains_key(name) => name.to_string(),
            Some(name) => return Err(EngineError::UnknownFrame(name.to_string())),
            None => self
                .frames
                .keys()
                .next()
                .cloned()
                .ok_or_else(|| EngineError::UnknownFrame("(project has no frames)".into()))?,
        };
        log::info!("Starting at frame `{}`", name);
        self.current = Some(name);
        self.pending_jump = None;
        self.accumulated_ms = 0;
        self.running = true;
        Ok(())
    }

    /// Advance by real elapsed time. Internally steps in fixed
    /// `1000 / fps` ms increments. Returns the number of steps taken.
    pub fn advance(&mut self, dt_ms: u64) -> u32 {
        if !self.running {
            return 0;
        }

        // Clamp so a long pause does not replay seconds of simulation
        let dt_ms = dt_ms.min(self.config.max_frame_time_ms);
        self.accumulated_ms += dt_ms;

        let tick_ms = self.config.tick_ms();
        let mut steps = 0;
        while self.accumulated_ms >= tick_ms {
            self.accumulated_ms -= tick_ms;
            self.step();
            steps += 1;

            if !self.running {
                break;
            }
        }
        steps
    }

    /// One fixed simulation step.
    pub fn step(&mut self) {
        if let Some(target) = self.pending_jump.take() {
            if self.current.as_deref() != Some(target.as_str()) {
                self.change_frame(&target);
            }
        }

        let dt = self.config.tick_ms() as f32 / 1000.0;
        let frame = self
            .current
            .as_ref()
            .and_then(|name| self.frames.get_mut(name));
        if let Some(frame) = frame {
            let signals = frame.update(dt, &self.input);
            if signals.goto.is_some() {
                self.pending_jump = signals.goto;
            }
            if signals.quit {
                log::info!("QuitGame in frame `{}`", frame.name);
                self.running = false;
            }
        }

        self.input.tick();
        self.tick_count += 1;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Register a key press from the front end.
    pub fn press_key(&mut self, key: Key) {
        self.input.press(key);
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.as_ref().and_then(|name| self.frames.get(name))
    }

    pub fn current_frame_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn pending_jump(&self) -> Option<&str> {
        self.pending_jump.as_deref()
    }

    pub fn frame(&self, name: &str) -> Option<&Frame> {
        self.frames.get(name)
    }

    pub fn frame_names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ObjectData;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default(), Registry::with_default_plugins())
    }

    fn two_frame_project() -> ProjectData {
        let mut menu = FrameData::new("Menu", [0, 0, 0]);
        menu.events.push(EventData::new(
            vec![ClauseData::new("KeyPressed").with("key", "K_SPACE")],
            vec![ClauseData::new("GoToFrame").with("frame_name", "Level1")],
        ));
        let mut level = FrameData::new("Level1", [0, 0, 255]);
        level
            .objects
            .push(ObjectData::new("CounterObject", "Ticks", 0.0, 0.0));
        level.events.push(EventData::new(
            vec![],
            vec![ClauseData::new("AddToCounter")
                .with("counter_name", "Ticks")
                .with("value", "1")],
        ));
        ProjectData {
            frames: vec![menu, level],
        }
    }

    #[test]
    fn test_start_defaults_to_first_frame() {
        let mut engine = engine();
        engine.load_project(&two_frame_project()).unwrap();
        engine.start(None).unwrap();
        assert_eq!(engine.current_frame_name(), Some("Menu"));
        assert!(engine.is_running());
    }

    #[test]
    fn test_start_unknown_frame_fails() {
        let mut engine = engine();
        engine.load_project(&two_frame_project()).unwrap();
        assert!(matches!(
            engine.start(Some("Credits")),
            Err(EngineError::UnknownFrame(_))
        ));

        let mut empty = self::engine();
        empty.load_project(&ProjectData::default()).unwrap();
        assert!(empty.start(None).is_err());
    }

    #[test]
    fn test_goto_applies_on_next_step() {
        let mut engine = engine();
        engine.load_project(&two_frame_project()).unwrap();
        engine.start(None).unwrap();
        engine.press_key(Key::Space);

        engine.step();
        assert_eq!(engine.current_frame_name(), Some("Menu"));
        assert_eq!(engine.pending_jump(), Some("Level1"));

        engine.input_mut().release_all();
        engine.step();
        assert_eq!(engine.current_frame_name(), Some("Level1"));
        let ticks = engine.frame("Level1").unwrap().object("Ticks").unwrap();
        assert_eq!(ticks.counter_value(), Some(1.0));
    }

    #[test]
    fn test_frames_keep_state_on_reentry() {
        let mut engine = engine();
        engine.load_project(&two_frame_project()).unwrap();
        engine.start(Some("Level1")).unwrap();
        engine.step();
        engine.step();
        assert!(engine.change_frame("Menu"));
        engine.step();
        assert!(engine.change_frame("Level1"));
        let ticks = engine.frame("Level1").unwrap().object("Ticks").unwrap();
        assert_eq!(ticks.counter_value(), Some(2.0));
    }

    #[test]
    fn test_change_frame_ignores_unknown() {
        let mut engine = engine();
        engine.load_project(&two_frame_project()).unwrap();
        engine.start(None).unwrap();
        assert!(!engine.change_frame("Nowhere"));
        assert_eq!(engine.current_frame_name(), Some("Menu"));
    }

    #[test]
    fn test_advance_steps_in_fixed_increments() {
        let mut engine = engine();
        engine.load_project(&two_frame_project()).unwrap();
        engine.start(Some("Level1")).unwrap();

        assert_eq!(engine.advance(10), 0);
        assert_eq!(engine.advance(10), 1);
        // Clamped to max_frame_time_ms (100) -> 6 steps of 16ms, 4ms left over
        assert_eq!(engine.advance(5_000), 6);
        assert_eq!(engine.tick_count(), 7);
    }

    #[test]
    fn test_quit_stops_engine() {
        let mut frame = FrameData::new("Only", [0, 0, 0]);
        frame
            .events
            .push(EventData::new(vec![], vec![ClauseData::new("QuitGame")]));
        let mut engine = engine();
        engine
            .load_project(&ProjectData {
                frames: vec![frame],
            })
            .unwrap();
        engine.start(None).unwrap();
        assert_eq!(engine.advance(100), 1);
        assert!(!engine.is_running());
        assert_eq!(engine.advance(100), 0);
    }

    #[test]
    fn test_duplicate_frames_replace_in_place() {
        let mut project = two_frame_project();
        project.frames.push(FrameData::new("Menu", [9, 9, 9]));
        let mut engine = engine();
        engine.load_project(&project).unwrap();
        let names: Vec<&str> = engine.frame_names().collect();
        assert_eq!(names, vec!["Menu", "Level1"]);
        assert_eq!(engine.frame("Menu").unwrap().bg_color, Color::rgb(9, 9, 9));
    }

    #[test]
    fn test_unknown_clause_skipped_or_rejected() {
        let mut project = two_frame_project();
        project.frames[0].events.push(EventData::new(
            vec![ClauseData::new("MoonIsFull")],
            vec![ClauseData::new("QuitGame")],
        ));

        let mut lenient = engine();
        lenient.load_project(&project).unwrap();
        let row = &lenient.frame("Menu").unwrap().events[1];
        assert!(row.conditions.is_empty());
        assert_eq!(row.actions.len(), 1);

        let config = EngineConfig {
            strict_project: true,
            ..EngineConfig::default()
        };
        let mut strict = Engine::new(config, Registry::with_default_plugins());
        assert!(matches!(
            strict.load_project(&project),
            Err(EngineError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_bad_params_fail_load() {
        let mut project = two_frame_project();
        project.frames[0]
            .events
            .push(EventData::new(vec![], vec![ClauseData::new("GoToFrame")]));
        assert!(matches!(
            engine().load_project(&project),
            Err(EngineError::InvalidParam { .. })
        ));
    }
}
