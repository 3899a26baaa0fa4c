pub mod collection;
pub mod scheduler;

pub use collection::CollectionManager;
