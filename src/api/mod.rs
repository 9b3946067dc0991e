pub mod error;
pub mod featured;
pub mod handlers;
pub mod types;

pub use error::{ApiError, Resource};
pub use featured::FeaturedMovies;
pub use handlers::*;
pub use types::*;
