pub mod builder;
pub mod filter;
pub mod pagination;

pub use builder::{search_term, DocumentQuery, Literal, Predicate};
pub use filter::{ActorFilter, MovieFilter};
pub use pagination::{normalize, Page};
