use ordered_float::OrderedFloat;
use runa_type::TypeStore;

use super::value::Value;
use crate::{Global, GlobalInit, IrType, Operand};

/// Literal values interned as immutable globals.
///
/// Ints, floats and strings share one counter and every literal site gets
/// its own entry (`@int0`, `@flt1`, `@str2`). Booleans use the `@bool0` and
/// `@bool1` singletons, emitted the first time either is needed.
#[derive(Debug, Default)]
pub struct ConstantPool {
  next: u32,
  globals: Vec<Global>,
  bools_emitted: bool,
}

impl ConstantPool {
  pub fn new() -> Self {
    Self::default()
  }

  fn id(
    &mut self,
    prefix: &str,
  ) -> String {
    let id = format!("{}{}", prefix, self.next);
    self.next += 1;
    id
  }

  pub fn boolean(
    &mut self,
    types: &TypeStore,
    value: bool,
  ) -> Value {
    if !self.bools_emitted {
      for b in [false, true] {
        self.globals.push(Global {
          symbol: format!("bool{}", b as u8),
          ty: IrType::new(types.ir(types.boolean())),
          init: GlobalInit::Bool(b),
        });
      }
      self.bools_emitted = true;
    }

    Value::constant(types.boolean(), Operand::Global(format!("bool{}", value as u8)))
  }

  pub fn int(
    &mut self,
    types: &TypeStore,
    value: i64,
  ) -> Value {
    let symbol = self.id("int");
    self.globals.push(Global {
      symbol: symbol.clone(),
      ty: IrType::new(types.ir(types.int())),
      init: GlobalInit::Int(value),
    });
    Value::constant(types.int(), Operand::Global(symbol))
  }

  pub fn float(
    &mut self,
    types: &TypeStore,
    value: OrderedFloat<f64>,
  ) -> Value {
    let symbol = self.id("flt");
    self.globals.push(Global {
      symbol: symbol.clone(),
      ty: IrType::new(types.ir(types.float())),
      init: GlobalInit::Float(value),
    });
    Value::constant(types.float(), Operand::Global(symbol))
  }

  pub fn string(
    &mut self,
    types: &TypeStore,
    value: &str,
  ) -> Value {
    let symbol = self.id("str");
    let data = format!("{}_data", symbol);
    let bytes = value.as_bytes().to_vec();
    let len = bytes.len();

    self.globals.push(Global {
      symbol: data.clone(),
      ty: IrType::new(format!("[{} x i8]", len)),
      init: GlobalInit::Bytes(bytes),
    });
    self.globals.push(Global {
      symbol: symbol.clone(),
      ty: IrType::new(types.ir(types.string())),
      init: GlobalInit::Str { len, data },
    });

    Value::constant(types.string(), Operand::Global(symbol))
  }

  pub fn globals(&self) -> &[Global] {
    &self.globals
  }

  pub fn finish(self) -> Vec<Global> {
    self.globals
  }
}
