//! Tabular dumps of the type registry and the signature table.

use ascii_table::AsciiTable;
use runa_lir::lowering::SignatureTable;
use runa_type::{Convention, TypeStore};

const MAX_WIDTH: usize = 160;

fn table(headers: &[&str]) -> AsciiTable {
  let mut table = AsciiTable::default();
  table.set_max_width(MAX_WIDTH);
  for (i, header) in headers.iter().enumerate() {
    table.column(i).set_header(*header);
  }
  table
}

fn or_dash(value: Option<&String>) -> String {
  value.cloned().unwrap_or_else(|| "-".to_string())
}

pub fn types_table(types: &TypeStore) -> String {
  let rows: Vec<Vec<String>> = types
    .iter()
    .map(|(_, desc)| {
      let convention = match desc.convention {
        Convention::ByValue => "value",
        Convention::ByAddress => "address",
      };
      let methods: Vec<&str> = desc.methods.keys().map(String::as_str).collect();

      vec![
        desc.name.clone(),
        desc.ir.clone(),
        convention.to_string(),
        or_dash(desc.layout.as_ref()),
        or_dash(desc.element.as_ref()),
        methods.join(" "),
      ]
    })
    .collect();

  table(&["Type", "IR", "Passed by", "Layout", "Element", "Methods"]).format(rows)
}

pub fn signatures_table(
  types: &TypeStore,
  signatures: &SignatureTable,
) -> String {
  let rows: Vec<Vec<String>> = signatures
    .iter()
    .map(|(name, sig)| {
      let params: Vec<&str> = sig.params.iter().map(|p| types.name(*p)).collect();
      vec![
        name.to_string(),
        format!("@{}", sig.symbol),
        params.join(", "),
        types.name(sig.returns).to_string(),
        if sig.builtin { "builtin" } else { "module" }.to_string(),
      ]
    })
    .collect();

  table(&["Function", "Symbol", "Params", "Returns", "Origin"]).format(rows)
}
