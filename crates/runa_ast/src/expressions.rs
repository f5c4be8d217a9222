use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
  NotEq,
  Lt,
}

impl BinaryOperator {
  /// Method implementing the operator on the left operand's type.
  /// `!=` is lowered through `__eq__`.
  pub fn method(&self) -> &'static str {
    match self {
      BinaryOperator::Add => "__add__",
      BinaryOperator::Sub => "__sub__",
      BinaryOperator::Mul => "__mul__",
      BinaryOperator::Div => "__div__",
      BinaryOperator::Eq | BinaryOperator::NotEq => "__eq__",
      BinaryOperator::Lt => "__lt__",
    }
  }
}

impl std::fmt::Display for BinaryOperator {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    let symbol = match self {
      BinaryOperator::Add => "+",
      BinaryOperator::Sub => "-",
      BinaryOperator::Mul => "*",
      BinaryOperator::Div => "/",
      BinaryOperator::Eq => "==",
      BinaryOperator::NotEq => "!=",
      BinaryOperator::Lt => "<",
    };
    write!(f, "{}", symbol)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
  Bool {
    value: bool,
  },
  Int {
    value: i64,
  },
  Float {
    value: OrderedFloat<f64>,
  },
  String {
    value: String,
  },
  Name {
    name: String,
  },
  Binary {
    op: BinaryOperator,
    left: Box<Expression>,
    right: Box<Expression>,
  },
  Not {
    operand: Box<Expression>,
  },
  And {
    left: Box<Expression>,
    right: Box<Expression>,
  },
  Or {
    left: Box<Expression>,
    right: Box<Expression>,
  },
  Ternary {
    condition: Box<Expression>,
    then: Box<Expression>,
    otherwise: Box<Expression>,
  },
  Index {
    container: Box<Expression>,
    index: Box<Expression>,
  },
  Call {
    callee: String,
    #[serde(default)]
    args: Vec<Expression>,
  },
}

impl Expression {
  pub fn boolean(value: bool) -> Self {
    Expression::Bool { value }
  }

  pub fn int(value: i64) -> Self {
    Expression::Int { value }
  }

  pub fn float(value: f64) -> Self {
    Expression::Float {
      value: OrderedFloat(value),
    }
  }

  pub fn string(value: &str) -> Self {
    Expression::String {
      value: value.to_string(),
    }
  }

  pub fn name(name: &str) -> Self {
    Expression::Name { name: name.to_string() }
  }

  pub fn binary(
    op: BinaryOperator,
    left: Expression,
    right: Expression,
  ) -> Self {
    Expression::Binary {
      op,
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  pub fn not(operand: Expression) -> Self {
    Expression::Not {
      operand: Box::new(operand),
    }
  }

  pub fn and(
    left: Expression,
    right: Expression,
  ) -> Self {
    Expression::And {
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  pub fn or(
    left: Expression,
    right: Expression,
  ) -> Self {
    Expression::Or {
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  pub fn ternary(
    condition: Expression,
    then: Expression,
    otherwise: Expression,
  ) -> Self {
    Expression::Ternary {
      condition: Box::new(condition),
      then: Box::new(then),
      otherwise: Box::new(otherwise),
    }
  }

  pub fn index(
    container: Expression,
    index: Expression,
  ) -> Self {
    Expression::Index {
      container: Box::new(container),
      index: Box::new(index),
    }
  }

  pub fn call(
    callee: &str,
    args: Vec<Expression>,
  ) -> Self {
    Expression::Call {
      callee: callee.to_string(),
      args,
    }
  }
}
