//! Built-in conditions.

use super::events::Condition;
use super::frame::Frame;
use super::input::{InputState, Key};
use super::registry::{number_param, required_param};
use crate::core::Result;
use crate::project::Params;

/// Holds while a key is down. Unknown key names never hold.
#[derive(Debug, Clone)]
pub struct KeyPressed {
    pub key: Option<Key>,
}

impl KeyPressed {
    pub fn from_params(params: &Params) -> Result<Box<dyn Condition>> {
        let name = required_param(params, "KeyPressed", &["key"])?;
        let key = Key::parse(name);
        if key.is_none() {
            log::warn!("KeyPressed: unknown key `{}` will never match", name);
        }
        Ok(Box::new(KeyPressed { key }))
    }
}

impl Condition for KeyPressed {
    fn check(&self, _frame: &Frame, input: &InputState) -> bool {
        self.key.is_some_and(|k| input.is_held(k))
    }
}

/// Holds while two named objects overlap. Missing objects never collide.
#[derive(Debug, Clone)]
pub struct ObjectCollision {
    pub obj_a: String,
    pub obj_b: String,
}

impl ObjectCollision {
    pub fn from_params(params: &Params) -> Result<Box<dyn Condition>> {
        Ok(Box::new(ObjectCollision {
            obj_a: required_param(params, "ObjectCollision", &["obj_a", "obj_name_a"])?
                .to_string(),
            obj_b: required_param(params, "ObjectCollision", &["obj_b", "obj_name_b"])?
                .to_string(),
        }))
    }
}

impl Condition for ObjectCollision {
    fn check(&self, frame: &Frame, _input: &InputState) -> bool {
        match (frame.object(&self.obj_a), frame.object(&self.obj_b)) {
            (Some(a), Some(b)) => a.rect().intersects(&b.rect()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn parse(op: &str) -> Option<Self> {
        match op.trim() {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            _ => None,
        }
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }
}

/// Compares a counter object's value against a constant, e.g. `Score >= 10`.
#[derive(Debug, Clone)]
pub struct CompareCounter {
    pub counter_name: String,
    /// `None` for an unrecognised operator, which never holds
    pub op: Option<CompareOp>,
    pub value: f64,
}

impl CompareCounter {
    pub fn from_params(params: &Params) -> Result<Box<dyn Condition>> {
        let counter_name = required_param(params, "CompareCounter", &["counter_name"])?;
        let op_text = required_param(params, "CompareCounter", &["operator"])?;
        let op = CompareOp::parse(op_text);
        if op.is_none() {
            log::warn!("CompareCounter: unknown operator `{}` will never match", op_text);
        }
        Ok(Box::new(CompareCounter {
            counter_name: counter_name.to_string(),
            op,
            value: number_param(params, "CompareCounter", &["value"])?,
        }))
    }
}

impl Condition for CompareCounter {
    fn check(&self, frame: &Frame, _input: &InputState) -> bool {
        let Some(op) = self.op else {
            return false;
        };
        frame
            .object(&self.counter_name)
            .and_then(|o| o.counter_value())
            .is_some_and(|v| op.apply(v, self.value))
    }
}

/// Always holds.
#[derive(Debug, Clone)]
pub struct Always;

impl Always {
    pub fn from_params(_params: &Params) -> Result<Box<dyn Condition>> {
        Ok(Box::new(Always))
    }
}

impl Condition for Always {
    fn check(&self, _frame: &Frame, _input: &InputState) -> bool {
        true
    }
}
