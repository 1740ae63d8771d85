use crate::model::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Record not found: #{0}")]
    RecordNotFound(RecordId),

    #[error("Please select {0} first")]
    EmptySelection(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Action '{action}' cannot be applied to {target}")]
    ActionScope { action: String, target: String },

    #[error("Unknown facet: {0}")]
    UnknownFacet(String),

    #[error("'{value}' is not a value of {facet}")]
    UnknownFacetValue { facet: String, value: String },

    #[error("Please enter a valid payment amount")]
    InvalidPaymentAmount,

    #[error("Payment cannot exceed remaining amount of {remaining}")]
    PaymentExceedsBalance { remaining: u32 },

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Invalid date range: {0}")]
    DateRange(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Invalid configuration: {0}")]
    ConfigValue(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
