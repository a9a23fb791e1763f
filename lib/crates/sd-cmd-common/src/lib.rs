pub mod spec;
pub mod types;

pub use spec::{BinaryFormat, CommandSpec, DockerFormat, Format, HabitatFormat, HabitatMode};
pub use types::*;
