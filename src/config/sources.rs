//! Configuration sources, in the order the loader layers them.

pub mod env;
pub mod global_file;
