// Domain layer: core models and ports (interfaces). Depends on nothing outside `domain` and `utils`.

pub mod model;
pub mod ports;
