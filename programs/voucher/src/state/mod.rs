pub mod access;
pub mod config;
pub mod position;
pub mod registry;
pub mod schedule;

pub use access::*;
pub use config::*;
pub use position::*;
pub use registry::*;
pub use schedule::*;
