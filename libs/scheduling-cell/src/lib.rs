pub mod api;
pub mod error;
pub mod models;
pub mod services;

pub use api::{HttpSchedulingApi, SchedulingApi};
pub use error::SchedulingError;
pub use models::*;
pub use services::*;
