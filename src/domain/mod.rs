// Domain layer: request-scoped models and ports (interfaces) to the imagery service.

pub mod model;
pub mod ports;
