use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rusqlite::params;

use drillplan_storage::{Draft, DraftKey, DraftStore, SqliteDraftStore, StorageError};

/// Clone-shared handle over one SQLite draft store. A test keeps a handle for
/// inspection while the editor session owns another; both see the same rows.
#[derive(Clone)]
pub struct SharedDraftStore {
    inner: Rc<RefCell<SqliteDraftStore>>,
    saves: Rc<Cell<u64>>,
}

impl SharedDraftStore {
    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::wrap(SqliteDraftStore::open_in_memory()?))
    }

    pub fn open(path: &str) -> Result<Self, StorageError> {
        Ok(Self::wrap(SqliteDraftStore::open(path)?))
    }

    fn wrap(store: SqliteDraftStore) -> Self {
        Self {
            inner: Rc::new(RefCell::new(store)),
            saves: Rc::new(Cell::new(0)),
        }
    }

    /// Successful saves issued through any handle.
    pub fn save_count(&self) -> u64 {
        self.saves.get()
    }

    /// Plants a raw body under the key, bypassing serialization.
    pub fn insert_raw(&self, key: &DraftKey, body: &str) -> Result<(), StorageError> {
        self.inner.borrow().conn().execute(
            "INSERT OR REPLACE INTO drafts (store_key, body, saved_at) VALUES (?1, ?2, 0)",
            params![key.as_store_key(), body],
        )?;
        Ok(())
    }
}

impl DraftStore for SharedDraftStore {
    fn load(&self, key: &DraftKey) -> Result<Option<Draft>, StorageError> {
        self.inner.borrow().load(key)
    }

    fn save(&mut self, key: &DraftKey, draft: &Draft) -> Result<(), StorageError> {
        self.inner.borrow_mut().save(key, draft)?;
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn remove(&mut self, key: &DraftKey) -> Result<(), StorageError> {
        self.inner.borrow_mut().remove(key)
    }
}

/// Wrapper that can refuse writes on demand, for exercising autosave
/// degradation. Reads always pass through.
#[derive(Clone)]
pub struct FlakyDraftStore {
    inner: SharedDraftStore,
    fail_writes: Rc<Cell<bool>>,
}

impl FlakyDraftStore {
    pub fn new(inner: SharedDraftStore) -> Self {
        Self {
            inner,
            fail_writes: Rc::new(Cell::new(false)),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn shared(&self) -> &SharedDraftStore {
        &self.inner
    }
}

impl DraftStore for FlakyDraftStore {
    fn load(&self, key: &DraftKey) -> Result<Option<Draft>, StorageError> {
        self.inner.load(key)
    }

    fn save(&mut self, key: &DraftKey, draft: &Draft) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Sqlite(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                Some("disk full".into()),
            )));
        }
        self.inner.save(key, draft)
    }

    fn remove(&mut self, key: &DraftKey) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Sqlite(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                Some("disk full".into()),
            )));
        }
        self.inner.remove(key)
    }
}
