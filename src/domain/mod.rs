// Domain layer: wire models and the ports the submit flow talks through.

pub mod model;
pub mod ports;
