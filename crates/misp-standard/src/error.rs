/// Error types for the MISP data model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A supplied identifier is not a valid UUID.
    #[error("invalid uuid: {value}")]
    InvalidUuid {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// An attribute was built without a value.
    #[error("attribute of type {kind} has an empty value")]
    EmptyValue { kind: String },
}
