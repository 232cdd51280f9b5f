// Domain layer: models and ports. Concrete broker clients live under adapters.

pub mod model;
pub mod ports;
