//! Typed module tree consumed by the backend.
//!
//! Upstream passes (parsing, inference, specialization, escape analysis,
//! destructor placement) hand the backend a fully resolved module, serialized
//! as JSON. Every referenced name is declared and every operator has a
//! matching method on its left operand's type.

pub mod expressions;
pub mod statements;

use serde::{Deserialize, Serialize};

pub use expressions::{BinaryOperator, Expression};
pub use statements::{GuardedBlock, Statement};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
  pub functions: Vec<Function>,
}

impl Module {
  pub fn new(functions: Vec<Function>) -> Self {
    Self { functions }
  }

  pub fn from_json(src: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(src)
  }

  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
  pub name: String,
  #[serde(rename = "type")]
  pub ty: String,
}

impl Param {
  pub fn new(
    name: &str,
    ty: &str,
  ) -> Self {
    Self {
      name: name.to_string(),
      ty: ty.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
  pub name: String,
  #[serde(default)]
  pub params: Vec<Param>,
  #[serde(default = "void_type")]
  pub returns: String,
  pub body: Vec<Statement>,
}

fn void_type() -> String {
  "void".to_string()
}

impl Function {
  pub fn new(
    name: &str,
    params: Vec<Param>,
    returns: &str,
    body: Vec<Statement>,
  ) -> Self {
    Self {
      name: name.to_string(),
      params,
      returns: returns.to_string(),
      body,
    }
  }
}
