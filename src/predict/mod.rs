mod error;
mod geometry;
mod ground_station;
mod observer;
mod pass_finder;
mod propagation;
mod tle_loader;
mod types;

pub use error::PredictError;
pub use geometry::ObserverGeometry;
pub use ground_station::GroundStation;
pub use observer::Sgp4Observer;
pub use tle_loader::TleLoader;
pub use types::{Look, RawPass};

#[cfg(test)]
pub(crate) mod scripted;
