use thiserror::Error;

/// Raised when a wire payload cannot be turned into (or produced from) a record.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The payload was valid JSON but not an object
    #[error("{record} payload must be a JSON object")]
    NotAnObject { record: &'static str },

    /// A required field is missing, or a field failed to parse
    #[error("invalid {record} payload: {source}")]
    Invalid {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The record could not be encoded
    #[error("failed to encode {record}: {source}")]
    Encode {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl SchemaError {
    /// Name of the record type the failing payload was meant to be.
    pub fn record(&self) -> &'static str {
        match self {
            Self::NotAnObject { record } => record,
            Self::Invalid { record, .. } => record,
            Self::Encode { record, .. } => record,
        }
    }
}
