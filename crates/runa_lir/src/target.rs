use crate::CodegenError;

/// Supported platform identifiers and the triple each one targets.
const TRIPLES: &[(&str, &str)] = &[
  ("darwin", "x86_64-apple-darwin11.0.0"),
  ("macos", "x86_64-apple-darwin11.0.0"),
  ("linux", "x86_64-pc-linux-gnu"),
];

/// Platform identifier of the machine running the compiler.
pub fn host_platform() -> &'static str {
  std::env::consts::OS
}

pub fn triple_for(platform: &str) -> Result<&'static str, CodegenError> {
  TRIPLES
    .iter()
    .find(|(name, _)| *name == platform)
    .map(|(_, triple)| *triple)
    .ok_or_else(|| CodegenError::UnsupportedPlatform {
      platform: platform.to_string(),
    })
}

pub fn supported_platforms() -> impl Iterator<Item = &'static str> {
  TRIPLES.iter().map(|(name, _)| *name)
}
