use runa_type::TypeId;

use super::{LoweringContext, cleanup::TEARDOWN, signature::Callee};
use crate::{BlockId, CodegenError, ConstValue, Instr, IrType, Operand, TypedOperand};

/// Where a value currently lives.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
  /// Held in an operand, no storage behind it.
  Direct(Operand),
  /// Behind an address; reading it needs a load.
  Addressed(Operand),
  /// Behind an address, with the result of an earlier load reused.
  /// Only temporaries reach this state.
  AddressedCached { address: Operand, value: Operand },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
  /// Produced by an expression; owned by whoever consumes it.
  Temporary,
  /// Backed by a named variable or storage owned elsewhere. Re-read on every use.
  Stable,
  /// Pool-interned literal.
  Constant,
  /// Merged from paths that disagree on ownership. The `i1` temporary holds
  /// whether the path taken owns the value.
  Conditional(u32),
}

impl Binding {
  /// Whether consuming the value may have to tear it down.
  pub fn owns(self) -> bool {
    matches!(self, Binding::Temporary | Binding::Conditional(_))
  }

  /// Ownership as an `i1` operand, for the merge phi.
  fn ownership_flag(self) -> Operand {
    match self {
      Binding::Temporary => Operand::Const(ConstValue::Bool(true)),
      Binding::Conditional(flag) => Operand::Temp(flag),
      Binding::Stable | Binding::Constant => Operand::Const(ConstValue::Bool(false)),
    }
  }
}

/// A typed value available to emitted code.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
  pub ty: TypeId,
  pub storage: Storage,
  pub binding: Binding,
}

impl Value {
  pub fn direct(
    ty: TypeId,
    operand: Operand,
  ) -> Self {
    Self {
      ty,
      storage: Storage::Direct(operand),
      binding: Binding::Temporary,
    }
  }

  pub fn temporary(
    ty: TypeId,
    address: Operand,
  ) -> Self {
    Self {
      ty,
      storage: Storage::Addressed(address),
      binding: Binding::Temporary,
    }
  }

  pub fn stable(
    ty: TypeId,
    address: Operand,
  ) -> Self {
    Self {
      ty,
      storage: Storage::Addressed(address),
      binding: Binding::Stable,
    }
  }

  pub fn constant(
    ty: TypeId,
    symbol: Operand,
  ) -> Self {
    Self {
      ty,
      storage: Storage::Addressed(symbol),
      binding: Binding::Constant,
    }
  }

  pub fn address(&self) -> Option<&Operand> {
    match &self.storage {
      Storage::Direct(_) => None,
      Storage::Addressed(address) | Storage::AddressedCached { address, .. } => Some(address),
    }
  }

  /// A view of this value that a callee must not tear down.
  pub fn borrowed(&self) -> Value {
    match self.binding {
      Binding::Temporary | Binding::Conditional(_) => {
        let storage = match &self.storage {
          Storage::AddressedCached { address, .. } => Storage::Addressed(address.clone()),
          other => other.clone(),
        };
        Value {
          ty: self.ty,
          storage,
          binding: Binding::Stable,
        }
      },
      _ => self.clone(),
    }
  }
}

impl<'a> LoweringContext<'a> {
  /// IR type of a value that is about to be read or stored.
  pub(crate) fn value_ir(
    &self,
    ty: TypeId,
  ) -> Result<IrType, CodegenError> {
    if self.types.is_void(ty) {
      return Err(CodegenError::VoidValue {
        function: self.function_name().to_string(),
      });
    }
    Ok(self.ir(ty))
  }

  /// The value as a direct operand, loading it if needed.
  pub(crate) fn obtain_value(
    &mut self,
    value: &mut Value,
  ) -> Result<TypedOperand, CodegenError> {
    let ty = self.value_ir(value.ty)?;

    let operand = match &value.storage {
      Storage::Direct(operand) => operand.clone(),
      Storage::AddressedCached { value: cached, .. } => cached.clone(),
      Storage::Addressed(address) => {
        let address = address.clone();
        let dest = self.temp();
        self.emit(Instr::Load {
          dest: dest.clone(),
          ty: ty.clone(),
          source: address.clone(),
        })?;

        if value.binding.owns() {
          value.storage = Storage::AddressedCached {
            address,
            value: dest.clone(),
          };
        }
        dest
      },
    };

    Ok(TypedOperand::new(ty, operand))
  }

  /// The value's address, spilling a direct value into fresh stack storage.
  pub(crate) fn obtain_address(
    &mut self,
    value: &mut Value,
  ) -> Result<TypedOperand, CodegenError> {
    let ty = self.value_ir(value.ty)?;

    let address = match &value.storage {
      Storage::Addressed(address) | Storage::AddressedCached { address, .. } => address.clone(),
      Storage::Direct(operand) => {
        let operand = operand.clone();
        let slot = self.temp();
        self.emit(Instr::Alloca {
          dest: slot.clone(),
          ty: ty.clone(),
        })?;
        self.emit(Instr::Store {
          value: TypedOperand::new(ty.clone(), operand),
          dest: slot.clone(),
        })?;
        value.storage = Storage::Addressed(slot.clone());
        slot
      },
    };

    Ok(TypedOperand::new(ty.ptr(), address))
  }

  /// Binding of a value of type `ty` joined from two predecessors. Called
  /// in the join block, right after the value's own phi. Ownership is only
  /// tracked for types that declare a teardown.
  pub(crate) fn merge_binding(
    &mut self,
    ty: TypeId,
    incoming: [(Binding, BlockId); 2],
  ) -> Result<Binding, CodegenError> {
    let disposable = self.types.method(ty, TEARDOWN).is_some();

    match incoming.map(|(binding, _)| binding) {
      [Binding::Temporary, Binding::Temporary] => return Ok(Binding::Temporary),
      [a, b] if !disposable || (!a.owns() && !b.owns()) => return Ok(Binding::Stable),
      _ => {},
    }

    let flag = self.frames.next_temp();
    self.emit(Instr::Phi {
      dest: Operand::Temp(flag),
      ty: IrType::i1(),
      incoming: incoming
        .iter()
        .map(|(binding, block)| (binding.ownership_flag(), *block))
        .collect(),
    })?;

    Ok(Binding::Conditional(flag))
  }

  /// The value itself if it is a `bool`, otherwise the result of its
  /// `__bool__` protocol method.
  pub(crate) fn coerce_to_boolean(
    &mut self,
    value: Value,
  ) -> Result<Value, CodegenError> {
    if value.ty == self.types.boolean() {
      return Ok(value);
    }

    self.dispatch_value(&Callee::boolean(), vec![value])
  }
}
