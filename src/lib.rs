//! Generate directory structures from PlantUML diagrams.
//!
//! Two notations are understood: Salt trees, where nesting depth is the number of leading
//! `+` markers, and package/class diagrams, where `package`-like keywords open `{ ... }`
//! scopes. Directories become real directories; file-like items become empty files.
mod api;
pub mod brace;
pub mod config;
pub mod dialect;
pub mod errors;
pub mod marker;
pub mod materialize;
pub mod normalize;
pub mod preview;
pub mod vfs;

pub use api::{generate, generate_from_lines, EtxdirError};
pub use config::Options;
pub use dialect::Dialect;
pub use materialize::{DiskMaterializer, Materializer, Report};
pub use vfs::VirtualFS;
