
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllenError {
    #[error("Parse error: unknown relation name {name:?}")]
    Parse { name: String },
    #[error("Stray bits outside the thirteen basic relations: {bits:#06x}")]
    StrayBits { bits: u16 },
}

pub type Result<T> = std::result::Result<T, AllenError>;
