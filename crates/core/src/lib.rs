pub mod error;
pub mod ids;
pub mod metrics;
pub mod palette;
pub mod plan;
pub mod time;
pub mod timeline;

pub use error::CoreError;
pub use ids::*;
pub use plan::{PlanHeader, Visibility};
pub use timeline::{Item, Section, Timeline};
