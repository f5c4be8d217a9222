use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Id, Store, TypeError};

pub type TypeId = Id<TypeDescriptor>;

/// How values of a type cross a call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convention {
  /// Passed as a direct operand (`i64 %x`).
  #[default]
  ByValue,
  /// Passed as a pointer to storage (`%str* %x`).
  ByAddress,
}

/// A method-table entry: the symbol to call, the type it produces, and the
/// type of its second operand (if any). Type references are by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntry {
  pub symbol: String,
  pub returns: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub argument: Option<String>,
}

impl MethodEntry {
  pub fn new(
    symbol: impl Into<String>,
    returns: impl Into<String>,
    argument: Option<&str>,
  ) -> Self {
    Self {
      symbol: symbol.into(),
      returns: returns.into(),
      argument: argument.map(str::to_string),
    }
  }
}

/// Everything the backend needs to know about a source-level type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
  pub name: String,
  /// Physical representation in the emitted IR.
  pub ir: String,
  #[serde(default)]
  pub convention: Convention,
  /// Struct body emitted as `%T = type <layout>`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub layout: Option<String>,
  /// Element type name for indexable containers.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub element: Option<String>,
  #[serde(default)]
  pub methods: BTreeMap<String, MethodEntry>,
}

impl TypeDescriptor {
  pub fn new(
    name: impl Into<String>,
    ir: impl Into<String>,
    convention: Convention,
  ) -> Self {
    Self {
      name: name.into(),
      ir: ir.into(),
      convention,
      layout: None,
      element: None,
      methods: BTreeMap::new(),
    }
  }

  pub fn with_layout(
    mut self,
    layout: &str,
  ) -> Self {
    self.layout = Some(layout.to_string());
    self
  }

  pub fn with_element(
    mut self,
    element: &str,
  ) -> Self {
    self.element = Some(element.to_string());
    self
  }

  /// Register `name` with the conventional `<type>.<name>` symbol.
  pub fn with_method(
    mut self,
    name: &str,
    returns: &str,
    argument: Option<&str>,
  ) -> Self {
    let symbol = format!("{}.{}", self.name, name);
    self.methods.insert(name.to_string(), MethodEntry::new(symbol, returns, argument));
    self
  }

  pub fn is_by_value(&self) -> bool {
    self.convention == Convention::ByValue
  }
}

/// Registry of type descriptors, indexed by [`TypeId`] and by name.
#[derive(Debug, Clone)]
pub struct TypeStore {
  types: Store<TypeDescriptor>,
  names: HashMap<String, TypeId>,
  void: TypeId,
  boolean: TypeId,
  int: TypeId,
  float: TypeId,
  string: TypeId,
}

impl Default for TypeStore {
  fn default() -> Self {
    Self::new()
  }
}

impl TypeStore {
  /// A store holding the builtin types.
  pub fn new() -> Self {
    let mut types = Store::new();
    let mut names = HashMap::new();

    for desc in builtin_descriptors() {
      let name = desc.name.clone();
      let id = types.alloc(desc);
      names.insert(name, id);
    }

    let void = names["void"];
    let boolean = names["bool"];
    let int = names["int"];
    let float = names["float"];
    let string = names["str"];

    Self {
      types,
      names,
      void,
      boolean,
      int,
      float,
      string,
    }
  }

  /// Insert a descriptor, replacing any existing one with the same name.
  /// Ids handed out earlier stay valid.
  pub fn define(
    &mut self,
    desc: TypeDescriptor,
  ) -> TypeId {
    if let Some(&id) = self.names.get(&desc.name) {
      *self.types.get_mut(id) = desc;
      return id;
    }

    let name = desc.name.clone();
    let id = self.types.alloc(desc);
    self.names.insert(name, id);
    id
  }

  pub fn lookup(
    &self,
    name: &str,
  ) -> Option<TypeId> {
    self.names.get(name).copied()
  }

  pub fn resolve(
    &self,
    name: &str,
  ) -> Result<TypeId, TypeError> {
    self.lookup(name).ok_or_else(|| TypeError::UnknownType(name.to_string()))
  }

  #[inline]
  pub fn get(
    &self,
    id: &TypeId,
  ) -> &TypeDescriptor {
    self.types.get(id)
  }

  pub fn name(
    &self,
    id: TypeId,
  ) -> &str {
    &self.get(&id).name
  }

  pub fn ir(
    &self,
    id: TypeId,
  ) -> &str {
    &self.get(&id).ir
  }

  pub fn method(
    &self,
    id: TypeId,
    name: &str,
  ) -> Option<&MethodEntry> {
    self.get(&id).methods.get(name)
  }

  pub fn element(
    &self,
    id: TypeId,
  ) -> Option<TypeId> {
    self.get(&id).element.as_deref().and_then(|name| self.lookup(name))
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
    self.types.iter()
  }

  #[inline]
  pub fn void(&self) -> TypeId {
    self.void
  }

  #[inline]
  pub fn boolean(&self) -> TypeId {
    self.boolean
  }

  #[inline]
  pub fn int(&self) -> TypeId {
    self.int
  }

  #[inline]
  pub fn float(&self) -> TypeId {
    self.float
  }

  #[inline]
  pub fn string(&self) -> TypeId {
    self.string
  }

  pub fn is_void(
    &self,
    id: TypeId,
  ) -> bool {
    id == self.void
  }

  /// Check that every type named by a method entry or element reference exists.
  pub fn validate(&self) -> Result<(), TypeError> {
    for (_, desc) in self.iter() {
      if let Some(element) = &desc.element {
        self.resolve(element)?;
      }

      for entry in desc.methods.values() {
        self.resolve(&entry.returns)?;
        if let Some(argument) = &entry.argument {
          self.resolve(argument)?;
        }
      }
    }

    Ok(())
  }
}

fn numeric(
  name: &str,
  ir: &str,
) -> TypeDescriptor {
  let mut desc = TypeDescriptor::new(name, ir, Convention::ByValue);
  for op in ["__add__", "__sub__", "__mul__", "__div__"] {
    desc = desc.with_method(op, name, Some(name));
  }

  desc
    .with_method("__eq__", "bool", Some(name))
    .with_method("__lt__", "bool", Some(name))
    .with_method("__bool__", "bool", None)
    .with_method("__str__", "str", None)
}

fn builtin_descriptors() -> Vec<TypeDescriptor> {
  vec![
    TypeDescriptor::new("void", "void", Convention::ByValue),
    TypeDescriptor::new("bool", "i1", Convention::ByValue)
      .with_method("__eq__", "bool", Some("bool"))
      .with_method("__str__", "str", None),
    numeric("int", "i64"),
    numeric("float", "double"),
    TypeDescriptor::new("str", "%str", Convention::ByAddress)
      .with_layout("{ i1, i64, i8* }")
      .with_method("__add__", "str", Some("str"))
      .with_method("__bool__", "bool", None)
      .with_method("__del__", "void", None)
      .with_method("__eq__", "bool", Some("str"))
      .with_method("__lt__", "bool", Some("str"))
      .with_method("__str__", "str", None),
    TypeDescriptor::new("intiter", "%intiter", Convention::ByAddress)
      .with_layout("{ i64, i64, i64 }")
      .with_method("__next__", "int", None),
    TypeDescriptor::new("array[str]", "%str*", Convention::ByValue).with_element("str"),
  ]
}
