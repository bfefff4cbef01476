pub mod config;
pub mod error;
pub mod options;

pub use config::{
    resolve_bigquery_config, BigQueryConfig, JobConfig, JobPriority, StagingDatasetConfig,
};
pub use error::{BigQueryError, BigQueryResult};
