// Domain layer: records, policies and ports. No I/O here.

pub mod model;
pub mod ports;
