// Domain layer: form payloads, response shapes and the ports the pages talk through.

pub mod forms;
pub mod model;
pub mod ports;
