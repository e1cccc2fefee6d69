use std::sync::Arc;

use crate::config::Config;
use crate::predict::ObserverGeometry;

pub type DynGeometry = dyn ObserverGeometry + Send + Sync;
pub type SharedGeometry = Arc<DynGeometry>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub geometry: SharedGeometry,
}

impl AppState {
    pub fn new(config: Config, geometry: SharedGeometry) -> Self {
        Self {
            config: Arc::new(config),
            geometry,
        }
    }
}
