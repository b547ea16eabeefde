// Domain layer: menu model, lookup tables and ports (interfaces).

pub mod model;
pub mod ports;
pub mod tables;
