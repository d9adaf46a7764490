pub mod auth;
pub mod error;

pub use auth::{SignOut, User};
pub use error::AppError;
