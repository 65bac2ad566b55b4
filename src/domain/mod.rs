// Domain layer: response mirrors of the wine API and the ports the rest of the crate depends on.

pub mod model;
pub mod ports;
