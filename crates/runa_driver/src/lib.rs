mod error;
pub mod link;
mod pipeline;
pub mod tables;

pub use error::DriverError;
pub use link::LinkPlan;
pub use pipeline::{BuildOutput, compile_file, load_types, print_types};
