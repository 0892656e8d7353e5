pub mod draft;
pub mod error;
pub mod keys;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use draft::{Draft, DRAFT_VERSION};
pub use error::StorageError;
pub use keys::DraftKey;
pub use sqlite::SqliteDraftStore;
pub use traits::DraftStore;
