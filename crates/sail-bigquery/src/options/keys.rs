//! Option keys recognized by the BigQuery connector.
//!
//! These strings are the external contract of the connector's option map.
//! Renaming any of them breaks every caller that sets the option.

/// The namespace shared by all BigQuery connector options.
pub const NAMESPACE: &str = "bq.";

/// The Google Cloud project that owns and is billed for the BigQuery jobs.
pub const PROJECT: &str = "bq.project";

pub mod staging_dataset {
    pub const NAMESPACE: &str = "bq.staging_dataset.";

    pub const NAME: &str = "bq.staging_dataset.name";
    pub const LOCATION: &str = "bq.staging_dataset.location";
    /// Default table expiration in the staging dataset, in milliseconds.
    pub const LIFETIME: &str = "bq.staging_dataset.lifetime";
    pub const GCS_BUCKET: &str = "bq.staging_dataset.gcs_bucket";
    pub const SERVICE_ACCOUNT_KEY_FILE: &str = "bq.staging_dataset.service_account_key_file";
}

pub mod job {
    pub const NAMESPACE: &str = "bq.job.";

    pub const PRIORITY: &str = "bq.job.priority";
}

/// All recognized keys, in documentation order.
pub const ALL_KEYS: &[&str] = &[
    PROJECT,
    staging_dataset::NAME,
    staging_dataset::LOCATION,
    staging_dataset::LIFETIME,
    staging_dataset::GCS_BUCKET,
    staging_dataset::SERVICE_ACCOUNT_KEY_FILE,
    job::PRIORITY,
];
