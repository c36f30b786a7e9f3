pub mod cache;
pub mod error;
pub mod resolver;

pub use cache::{CachedResolver, MemoryStore, ResolutionStore};
pub use error::ResolveError;
pub use resolver::{HttpResolver, Resolve};
