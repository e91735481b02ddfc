// Domain layer: data model and ports. Rule functions live in `core`.

pub mod model;
pub mod ports;
