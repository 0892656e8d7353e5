pub mod autosave;
pub mod catalog;
pub mod editor;
pub mod error;
pub mod reconcile;
pub mod remote;
pub mod reorder;

pub use autosave::{AUTOSAVE_DEBOUNCE_MS, Debounce};
pub use catalog::{CatalogEntry, DrillCatalog, DEFAULT_ITEM_MINUTES};
pub use editor::{CascadePolicy, EditorMode, EditorSession, SectionDelete, saved_ago_label};
pub use error::EngineError;
pub use reconcile::{Bootstrap, ReconcileDecision, RestorePrompt};
pub use remote::{
    PlanService, RemoteError, RemoteItem, RemotePlan, RemoteSection, SaveItem, SavePlanRequest,
    SaveSection,
};
pub use reorder::{DragNode, apply_drag};
