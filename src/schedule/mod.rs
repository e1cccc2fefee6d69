mod error;
mod filter;
mod merge;
mod planner;
mod refine;
mod types;

pub use error::ScheduleError;
pub use filter::{filter_by_apogee, KeptPass};
pub use merge::merge;
pub use planner::{compute_schedule, compute_schedule_concurrent, satellite_passes};
pub use refine::refine_window;
pub use types::{
    RefinedPass, SatelliteCatalog, Schedule, ScheduleRequest, ScheduleRow, DISPLAY_FORMAT,
};
