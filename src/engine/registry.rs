//! Type-name registry for conditions, actions and object kinds.
//!
//! Projects refer to everything by name (`"KeyPressed"`, `"CounterObject"`).
//! Plugins fill a [`Registry`] with builder functions for those names, and the
//! runtime asks the registry to turn project data into live engine values.

use super::actions::*;
use super::conditions::*;
use super::events::{Action, Condition};
use super::object::EngineObject;
use crate::core::{EngineError, Result};
use crate::math::Color;
use crate::project::{ClauseData, ObjectData, Params};
use indexmap::IndexMap;

pub type ConditionBuilder = fn(&Params) -> Result<Box<dyn Condition>>;
pub type ActionBuilder = fn(&Params) -> Result<Box<dyn Action>>;
pub type ObjectBuilder = fn(&ObjectData) -> Result<EngineObject>;

/// Object kind used when a project names one nobody registered.
pub const FALLBACK_OBJECT_TYPE: &str = "ActiveObject";

/// A bundle of condition, action and object types.
pub trait Plugin {
    fn name(&self) -> &str;
    fn register(&self, registry: &mut Registry);
}

#[derive(Debug, Default)]
pub struct Registry {
    conditions: IndexMap<String, ConditionBuilder>,
    actions: IndexMap<String, ActionBuilder>,
    objects: IndexMap<String, ObjectBuilder>,
    plugins: Vec<String>,
}

impl Registry {
    /// An empty registry. Most callers want [`Registry::with_default_plugins`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_plugins() -> Self {
        let mut registry = Self::new();
        registry.load_plugin(&CorePlugin);
        registry.load_plugin(&ExamplePlugin);
        registry
    }

    pub fn load_plugin(&mut self, plugin: &dyn Plugin) {
        log::info!("Loading plugin: {}", plugin.name());
        plugin.register(self);
        self.plugins.push(plugin.name().to_string());
    }

    pub fn plugin_names(&self) -> &[String] {
        &self.plugins
    }

    pub fn register_condition(&mut self, name: &str, builder: ConditionBuilder) {
        if self.conditions.insert(name.to_string(), builder).is_some() {
            log::warn!("Condition type `{}` re-registered; replacing", name);
        }
    }

    pub fn register_action(&mut self, name: &str, builder: ActionBuilder) {
        if self.actions.insert(name.to_string(), builder).is_some() {
            log::warn!("Action type `{}` re-registered; replacing", name);
        }
    }

    pub fn register_object(&mut self, name: &str, builder: ObjectBuilder) {
        if self.objects.insert(name.to_string(), builder).is_some() {
            log::warn!("Object type `{}` re-registered; replacing", name);
        }
    }

    pub fn condition_types(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    pub fn action_types(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn object_types(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn has_condition(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn build_condition(&self, clause: &ClauseData) -> Result<Box<dyn Condition>> {
        let builder = self
            .conditions
            .get(&clause.kind)
            .ok_or_else(|| EngineError::UnknownType {
                kind: "condition",
                name: clause.kind.clone(),
            })?;
        builder(&clause.params)
    }

    pub fn build_action(&self, clause: &ClauseData) -> Result<Box<dyn Action>> {
        let builder = self
            .actions
            .get(&clause.kind)
            .ok_or_else(|| EngineError::UnknownType {
                kind: "action",
                name: clause.kind.clone(),
            })?;
        builder(&clause.params)
    }

    /// Build an object. Unknown kinds become plain active objects.
    pub fn build_object(&self, data: &ObjectData) -> Result<EngineObject> {
        if let Some(builder) = self.objects.get(&data.kind) {
            return builder(data);
        }
        log::warn!(
            "Unknown object type `{}` for `{}`; using {}",
            data.kind,
            data.name,
            FALLBACK_OBJECT_TYPE
        );
        match self.objects.get(FALLBACK_OBJECT_TYPE) {
            Some(builder) => builder(data),
            None => build_active_object(data),
        }
    }
}

/// Conditions, actions and object kinds every project relies on.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn name(&self) -> &str {
        "CorePlugin"
    }

    fn register(&self, registry: &mut Registry) {
        registry.register_condition("KeyPressed", KeyPressed::from_params);
        registry.register_condition("ObjectCollision", ObjectCollision::from_params);
        registry.register_condition("Always", Always::from_params);

        registry.register_action("ChangeObjectColor", ChangeObjectColor::from_params);
        registry.register_action("DestroyObject", DestroyObject::from_params);
        registry.register_action("GoToFrame", GoToFrame::from_params);
        registry.register_action("MoveObject", MoveObject::from_params);
        registry.register_action("QuitGame", QuitGame::from_params);

        registry.register_object("ActiveObject", build_active_object);
    }
}

/// Counters and text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExamplePlugin;

impl Plugin for ExamplePlugin {
    fn name(&self) -> &str {
        "ExamplePlugin"
    }

    fn register(&self, registry: &mut Registry) {
        registry.register_condition("CompareCounter", CompareCounter::from_params);

        registry.register_action("SetCounterValue", SetCounterValue::from_params);
        registry.register_action("AddToCounter", AddToCounter::from_params);
        registry.register_action("SetText", SetText::from_params);

        registry.register_object("TextObject", build_text_object);
        registry.register_object("CounterObject", build_counter_object);
    }
}

fn build_active_object(data: &ObjectData) -> Result<EngineObject> {
    let obj = EngineObject::active(
        &data.name,
        data.x as f32,
        data.y as f32,
        data.w as f32,
        data.h as f32,
        object_color(data),
    );
    Ok(with_data_animation(obj, data))
}

fn build_text_object(data: &ObjectData) -> Result<EngineObject> {
    let obj = EngineObject::text(
        &data.name,
        data.x as f32,
        data.y as f32,
        &data.text,
        data.font_size,
        object_color(data),
    );
    Ok(with_data_animation(obj, data))
}

fn build_counter_object(data: &ObjectData) -> Result<EngineObject> {
    let obj = EngineObject::counter(
        &data.name,
        data.x as f32,
        data.y as f32,
        data.initial_value,
        data.font_size,
        object_color(data),
    );
    Ok(with_data_animation(obj, data))
}

/// A bad color string should not keep a whole project from loading.
fn object_color(data: &ObjectData) -> Color {
    Color::parse(&data.color).unwrap_or_else(|err| {
        log::warn!("Object `{}`: {}; using red", data.name, err);
        Color::RED
    })
}

fn with_data_animation(obj: EngineObject, data: &ObjectData) -> EngineObject {
    if data.anim_colors.is_empty() {
        return obj;
    }
    let colors: Vec<Color> = data
        .anim_colors
        .iter()
        .filter_map(|c| Color::parse(c).ok())
        .collect();
    obj.with_animation(colors, data.anim_speed as f32)
}

/// A parameter that must be present under one of `keys`.
pub(crate) fn required_param<'a>(
    params: &'a Params,
    clause: &str,
    keys: &[&str],
) -> Result<&'a str> {
    params
        .get_any(keys)
        .ok_or_else(|| EngineError::invalid_param(clause, keys[0], "missing"))
}

/// A numeric parameter; absent or empty reads as 0.
pub(crate) fn number_param(params: &Params, clause: &str, keys: &[&str]) -> Result<f64> {
    match params.get_any(keys).map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(text) => text
            .parse::<f64>()
            .map_err(|_| EngineError::invalid_param(clause, keys[0], format!("`{}` is not a number", text))),
    }
}
