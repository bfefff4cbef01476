use thiserror::Error;

pub type BigQueryResult<T> = Result<T, BigQueryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BigQueryError {
    #[error("missing required configuration key: {key}")]
    MissingRequiredKey { key: String },
    #[error("invalid integer value for configuration key {key}: '{value}'")]
    InvalidIntegerValue { key: String, value: String },
    #[error(
        "invalid value for configuration key {key}: '{value}' (allowed values: {})",
        .allowed.join(", ")
    )]
    InvalidEnumValue {
        key: String,
        value: String,
        allowed: Vec<String>,
    },
    /// The option map could not be deserialized into a [`DataSourceOptions`] struct.
    /// The BigQuery option structs only hold strings, so this is raised
    /// for option structs with typed fields.
    ///
    /// [`DataSourceOptions`]: crate::options::DataSourceOptions
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl BigQueryError {
    pub fn missing(key: impl Into<String>) -> Self {
        BigQueryError::MissingRequiredKey { key: key.into() }
    }

    pub fn invalid_integer(key: impl Into<String>, value: impl Into<String>) -> Self {
        BigQueryError::InvalidIntegerValue {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn invalid_enum(
        key: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&str],
    ) -> Self {
        BigQueryError::InvalidEnumValue {
            key: key.into(),
            value: value.into(),
            allowed: allowed.iter().map(|x| x.to_string()).collect(),
        }
    }

    /// The configuration key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            BigQueryError::MissingRequiredKey { key }
            | BigQueryError::InvalidIntegerValue { key, .. }
            | BigQueryError::InvalidEnumValue { key, .. } => Some(key.as_str()),
            BigQueryError::InvalidOptions(_) => None,
        }
    }
}
