use std::collections::BTreeMap;

use runa_ast::Module;
use runa_type::{TypeId, TypeStore};

use super::value::Value;
use crate::CodegenError;

/// Cross-type protocol names and the method each type supplies for them.
pub const PROTOCOL: &[(&str, &str)] = &[("bool", "__bool__"), ("str", "__str__")];

/// Runtime library functions: name, return type, parameter types.
pub const LIBRARY: &[(&str, &str, &[&str])] = &[
  ("print", "void", &["str"]),
  ("str", "str", &["int"]),
  ("range", "intiter", &["int", "int", "int"]),
];

/// Runtime routine that decodes the process arguments for the entry wrapper.
pub const ARGV_SYMBOL: &str = "argv";

/// A callable top-level function, builtin or user-defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
  pub symbol: String,
  pub returns: TypeId,
  pub params: Vec<TypeId>,
  pub builtin: bool,
}

/// Signatures of every callable top-level function, collected before any
/// body is lowered and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
  entries: BTreeMap<String, Signature>,
}

impl SignatureTable {
  pub fn builtins(types: &TypeStore) -> Result<Self, CodegenError> {
    let mut entries = BTreeMap::new();

    for (name, returns, params) in LIBRARY {
      let signature = Signature {
        symbol: name.to_string(),
        returns: resolve(types, returns)?,
        params: params.iter().map(|p| resolve(types, p)).collect::<Result<_, _>>()?,
        builtin: true,
      };
      entries.insert(name.to_string(), signature);
    }

    Ok(Self { entries })
  }

  /// Builtins plus every function in `module` except the entry point.
  /// A user function shadows a builtin of the same name.
  pub fn collect(
    module: &Module,
    types: &TypeStore,
    entry: &str,
  ) -> Result<Self, CodegenError> {
    let mut table = Self::builtins(types)?;

    for func in module.functions.iter().filter(|f| f.name != entry) {
      let signature = Signature {
        symbol: func.name.clone(),
        returns: resolve(types, &func.returns)?,
        params: func
          .params
          .iter()
          .map(|p| resolve(types, &p.ty))
          .collect::<Result<_, _>>()?,
        builtin: false,
      };
      table.entries.insert(func.name.clone(), signature);
    }

    Ok(table)
  }

  pub fn get(
    &self,
    name: &str,
  ) -> Option<&Signature> {
    self.entries.get(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Signature)> {
    self.entries.iter().map(|(name, sig)| (name.as_str(), sig))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

pub(crate) fn resolve(
  types: &TypeStore,
  name: &str,
) -> Result<TypeId, CodegenError> {
  types.lookup(name).ok_or_else(|| CodegenError::UnknownType { name: name.to_string() })
}

/// What a call site invokes, decided once per site.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
  /// Protocol method found on the first argument's type.
  Protocol {
    name: &'static str,
    method: &'static str,
  },
  /// Builtin or user-defined top-level function.
  Library { name: String },
  /// Method on an explicit type (operators).
  Method { ty: TypeId, method: String },
}

/// A callee bound to concrete argument types.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
  pub symbol: String,
  pub returns: TypeId,
}

impl Callee {
  /// Protocol names first, then the signature table.
  pub fn resolve(
    name: &str,
    table: &SignatureTable,
  ) -> Result<Self, CodegenError> {
    if let Some((name, method)) = PROTOCOL.iter().find(|(p, _)| *p == name) {
      return Ok(Callee::Protocol { name, method });
    }

    if table.get(name).is_some() {
      return Ok(Callee::Library { name: name.to_string() });
    }

    Err(CodegenError::UnknownCallee { name: name.to_string() })
  }

  pub fn boolean() -> Self {
    Callee::Protocol {
      name: "bool",
      method: "__bool__",
    }
  }

  pub fn method(
    ty: TypeId,
    method: &str,
  ) -> Self {
    Callee::Method {
      ty,
      method: method.to_string(),
    }
  }

  pub fn bind(
    &self,
    args: &[Value],
    types: &TypeStore,
    table: &SignatureTable,
  ) -> Result<ResolvedCall, CodegenError> {
    match self {
      Callee::Protocol { name, method } => {
        let [receiver] = args else {
          return Err(CodegenError::ArityMismatch {
            name: name.to_string(),
            expected: 1,
            found: args.len(),
          });
        };
        // A receiver without the protocol method falls back to the library
        // function of the same name, when there is one.
        if types.method(receiver.ty, method).is_none() && table.get(name).is_some() {
          return bind_library(name, args, types, table);
        }
        bind_method(types, receiver.ty, method)
      },
      Callee::Library { name } => bind_library(name, args, types, table),
      Callee::Method { ty, method } => bind_method(types, *ty, method),
    }
  }
}

fn bind_library(
  name: &str,
  args: &[Value],
  types: &TypeStore,
  table: &SignatureTable,
) -> Result<ResolvedCall, CodegenError> {
  let signature = table.get(name).ok_or_else(|| CodegenError::UnknownCallee {
    name: name.to_string(),
  })?;

  if signature.params.len() != args.len() {
    return Err(CodegenError::ArityMismatch {
      name: name.to_string(),
      expected: signature.params.len(),
      found: args.len(),
    });
  }

  for (param, arg) in signature.params.iter().zip(args) {
    if *param != arg.ty {
      return Err(CodegenError::OperandMismatch {
        callee: name.to_string(),
        expected: types.name(*param).to_string(),
        found: types.name(arg.ty).to_string(),
      });
    }
  }

  Ok(ResolvedCall {
    symbol: signature.symbol.clone(),
    returns: signature.returns,
  })
}

fn bind_method(
  types: &TypeStore,
  ty: TypeId,
  method: &str,
) -> Result<ResolvedCall, CodegenError> {
  let entry = types.method(ty, method).ok_or_else(|| CodegenError::MissingMethod {
    ty: types.name(ty).to_string(),
    method: method.to_string(),
  })?;

  Ok(ResolvedCall {
    symbol: entry.symbol.clone(),
    returns: resolve(types, &entry.returns)?,
  })
}
