//! In-process implementations of the data and authentication services.

mod auth;
mod collection;
mod store;

pub use auth::MemoryAuthProvider;
pub use store::MemoryStore;
