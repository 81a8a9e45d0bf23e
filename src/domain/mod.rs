// Domain layer: records exchanged with the store and the ports for external services.

pub mod model;
pub mod ports;
