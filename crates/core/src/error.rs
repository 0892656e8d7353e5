use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("section not found: {0}")]
    SectionNotFound(String),

    #[error("dangling section reference: item {item} points at section {section}")]
    DanglingSectionRef { item: String, section: String },
}
