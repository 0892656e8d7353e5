pub mod catalog;
pub mod clock;
pub mod remote;
pub mod store;

pub use catalog::FakeCatalog;
pub use clock::ManualClock;
pub use remote::FakePlanService;
pub use store::{FlakyDraftStore, SharedDraftStore};
