use std::fmt;

/// An operand: something an instruction can read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
  /// Numbered virtual register (`%3`).
  Temp(u32),
  /// Named local: parameters and variable slots (`%x`, `%lang.res`).
  Local(String),
  /// Module-level symbol (`@int0`).
  Global(String),
  Const(ConstValue),
}

/// Immediate values written inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstValue {
  Bool(bool),
  Int(i64),
}

impl Operand {
  pub fn local(name: &str) -> Self {
    Operand::Local(name.to_string())
  }

  pub fn global(name: &str) -> Self {
    Operand::Global(name.to_string())
  }

  pub fn as_temp(&self) -> Option<u32> {
    match self {
      Operand::Temp(n) => Some(*n),
      _ => None,
    }
  }
}

impl fmt::Display for Operand {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      Operand::Temp(n) => write!(f, "%{}", n),
      Operand::Local(name) => write!(f, "%{}", name),
      Operand::Global(name) => write!(f, "@{}", name),
      Operand::Const(ConstValue::Bool(b)) => write!(f, "{}", b),
      Operand::Const(ConstValue::Int(i)) => write!(f, "{}", i),
    }
  }
}

/// Textual IR type (`i64`, `%str`, `%str*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IrType(String);

impl IrType {
  pub fn new(repr: impl Into<String>) -> Self {
    IrType(repr.into())
  }

  pub fn void() -> Self {
    IrType::new("void")
  }

  pub fn i1() -> Self {
    IrType::new("i1")
  }

  pub fn i32() -> Self {
    IrType::new("i32")
  }

  pub fn i64() -> Self {
    IrType::new("i64")
  }

  /// Pointer to this type.
  pub fn ptr(&self) -> Self {
    IrType(format!("{}*", self.0))
  }

  pub fn is_void(&self) -> bool {
    self.0 == "void"
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for IrType {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// An operand paired with its type, as written in argument lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedOperand {
  pub ty: IrType,
  pub operand: Operand,
}

impl TypedOperand {
  pub fn new(
    ty: IrType,
    operand: Operand,
  ) -> Self {
    Self { ty, operand }
  }
}

impl fmt::Display for TypedOperand {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "{} {}", self.ty, self.operand)
  }
}
