// Domain layer: records produced by the import pipeline and the ports the pipeline drives.

pub mod model;
pub mod ports;
