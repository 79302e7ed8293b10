use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Unsupported unit: {0}. Only MB and GB are supported.")]
    UnsupportedUnit(String),

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Invalid storage capacity: {0} GB")]
    InvalidCapacity(f64),

    #[error("Invalid memory size: {0} GB")]
    InvalidMemory(u32),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Unknown catalog item referenced: {0}")]
    DanglingReference(String),

    #[error("the {kind}-id '{id}' already exists")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{0}")]
    Configuration(String),

    #[error("XML-Error: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
