// Adapters layer: concrete implementations of the ports (filesystem, terminal output).

pub mod render;
pub mod storage;
