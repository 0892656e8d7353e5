use crate::draft::Draft;
use crate::error::StorageError;
use crate::keys::DraftKey;

/// The client-local persistent store: string-keyed, JSON-valued, one draft
/// per editing context. Writes replace the whole value; there are no partial
/// updates. The store never mutates the model it serializes.
pub trait DraftStore {
    fn load(&self, key: &DraftKey) -> Result<Option<Draft>, StorageError>;

    fn save(&mut self, key: &DraftKey, draft: &Draft) -> Result<(), StorageError>;

    fn remove(&mut self, key: &DraftKey) -> Result<(), StorageError>;
}
