mod cache;
mod key;

pub use cache::QueryCache;
pub use key::QueryKey;
