mod export;
mod sampler;

pub use export::{render_trajectory, EXPORT_FILE_NAME};
pub use sampler::{TrajectorySample, TrajectorySampler};
