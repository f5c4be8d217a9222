use std::collections::HashSet;

use runa_type::{TypeId, TypeStore};

use super::{
  param_ir,
  signature::{ARGV_SYMBOL, SignatureTable, resolve},
  stmt::ITERATOR_NEXT,
};
use crate::{CodegenError, Declaration, IrType, Preamble, TypeDef};

/// Type definitions and external declarations for everything the registry
/// and the builtin library can be asked for. Symbols defined by the module
/// itself are left out.
pub(crate) fn derive(
  types: &TypeStore,
  signatures: &SignatureTable,
  defined: &HashSet<String>,
) -> Result<Preamble, CodegenError> {
  let type_defs = types
    .iter()
    .filter_map(|(_, desc)| {
      desc.layout.as_ref().map(|layout| TypeDef {
        name: desc.ir.clone(),
        body: layout.clone(),
      })
    })
    .collect();

  let mut seen: HashSet<String> = defined.clone();
  let mut declarations = Vec::new();
  let mut declare = |decl: Declaration| {
    if seen.insert(decl.symbol.clone()) {
      declarations.push(decl);
    }
  };

  for (id, desc) in types.iter() {
    for (name, entry) in &desc.methods {
      let returns = resolve(types, &entry.returns)?;

      let params = if name == ITERATOR_NEXT {
        vec![receiver_ir(types, id), IrType::new(types.ir(returns)).ptr()]
      } else {
        let mut params = vec![param_ir(types, id)];
        if let Some(argument) = &entry.argument {
          params.push(param_ir(types, resolve(types, argument)?));
        }
        if !types.is_void(returns) {
          params.push(IrType::new(types.ir(returns)).ptr());
        }
        params
      };

      let ret = if name == ITERATOR_NEXT { IrType::i1() } else { IrType::void() };
      declare(Declaration {
        symbol: entry.symbol.clone(),
        ret,
        params,
      });
    }
  }

  for (_, signature) in signatures.iter().filter(|(_, sig)| sig.builtin) {
    let mut params: Vec<_> = signature.params.iter().map(|p| param_ir(types, *p)).collect();
    if !types.is_void(signature.returns) {
      params.push(IrType::new(types.ir(signature.returns)).ptr());
    }

    declare(Declaration {
      symbol: signature.symbol.clone(),
      ret: IrType::void(),
      params,
    });
  }

  declare(Declaration {
    symbol: ARGV_SYMBOL.to_string(),
    ret: IrType::void(),
    params: vec![IrType::i32(), IrType::new("i8*").ptr(), IrType::new(types.ir(types.string())).ptr().ptr()],
  });

  Ok(Preamble::Derived {
    type_defs,
    declarations,
  })
}

/// The iterator is always passed by address, whatever its convention.
fn receiver_ir(
  types: &TypeStore,
  ty: TypeId,
) -> IrType {
  IrType::new(types.ir(ty)).ptr()
}
