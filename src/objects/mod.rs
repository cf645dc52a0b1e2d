//! Stored object types (blobs, commits) and the object store.

pub mod blob;
pub mod commit;
pub mod oid;
pub mod store;

pub use blob::Blob;
pub use commit::Commit;
pub use oid::Oid;
pub use store::ObjectStore;
