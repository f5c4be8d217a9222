use serde::{Deserialize, Serialize};

use crate::Expression;

/// One arm of a conditional chain. The trailing arm of an `if`/`else` has
/// no condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardedBlock {
  #[serde(default)]
  pub condition: Option<Expression>,
  pub body: Vec<Statement>,
}

impl GuardedBlock {
  pub fn when(
    condition: Expression,
    body: Vec<Statement>,
  ) -> Self {
    Self {
      condition: Some(condition),
      body,
    }
  }

  pub fn otherwise(body: Vec<Statement>) -> Self {
    Self { condition: None, body }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
  Assign {
    target: String,
    value: Expression,
  },
  If {
    branches: Vec<GuardedBlock>,
  },
  While {
    condition: Expression,
    body: Vec<Statement>,
  },
  For {
    var: String,
    source: Expression,
    body: Vec<Statement>,
  },
  Return {
    #[serde(default)]
    value: Option<Expression>,
  },
  Expr {
    expr: Expression,
  },
}

impl Statement {
  pub fn assign(
    target: &str,
    value: Expression,
  ) -> Self {
    Statement::Assign {
      target: target.to_string(),
      value,
    }
  }

  pub fn if_chain(branches: Vec<GuardedBlock>) -> Self {
    Statement::If { branches }
  }

  pub fn while_loop(
    condition: Expression,
    body: Vec<Statement>,
  ) -> Self {
    Statement::While { condition, body }
  }

  pub fn for_loop(
    var: &str,
    source: Expression,
    body: Vec<Statement>,
  ) -> Self {
    Statement::For {
      var: var.to_string(),
      source,
      body,
    }
  }

  pub fn ret(value: Option<Expression>) -> Self {
    Statement::Return { value }
  }

  pub fn expr(expr: Expression) -> Self {
    Statement::Expr { expr }
  }
}
