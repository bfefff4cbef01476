pub mod keys;
mod loader;
mod serde;

use ::serde::Deserialize;

#[cfg(test)]
pub use loader::build_options;
pub use loader::{
    load_default_options, load_options, merge_options, unrecognized_keys, warn_unrecognized_keys,
};

pub const DEFAULT_STAGING_DATASET_NAME: &str = "spark_staging";
/// 24 hours.
pub const DEFAULT_STAGING_DATASET_LIFETIME: &str = "86400000";
pub const DEFAULT_JOB_PRIORITY: &str = "INTERACTIVE";

pub trait DataSourceOptions: for<'de> ::serde::Deserialize<'de> {
    /// A list of allowed keys for the options.
    /// Keys are matched exactly.
    const ALLOWED_KEYS: &'static [&'static str];
    /// A list of default values for the options.
    /// Each entry is a tuple of the key and the default value.
    const DEFAULT_VALUES: &'static [(&'static str, &'static str)];
}

/// Raw options under the top-level `bq.` namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BigQueryOptions {
    #[serde(
        rename = "bq.project",
        default,
        deserialize_with = "self::serde::deserialize_some_string"
    )]
    pub project: Option<String>,
}

impl DataSourceOptions for BigQueryOptions {
    const ALLOWED_KEYS: &'static [&'static str] = &[keys::PROJECT];
    const DEFAULT_VALUES: &'static [(&'static str, &'static str)] = &[];
}

/// Raw options under the `bq.staging_dataset.` namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StagingDatasetOptions {
    #[serde(
        rename = "bq.staging_dataset.name",
        default,
        deserialize_with = "self::serde::deserialize_some_string"
    )]
    pub name: Option<String>,
    #[serde(
        rename = "bq.staging_dataset.location",
        default,
        deserialize_with = "self::serde::deserialize_some_string"
    )]
    pub location: Option<String>,
    #[serde(
        rename = "bq.staging_dataset.lifetime",
        default,
        deserialize_with = "self::serde::deserialize_some_string"
    )]
    pub lifetime: Option<String>,
    #[serde(
        rename = "bq.staging_dataset.gcs_bucket",
        default,
        deserialize_with = "self::serde::deserialize_some_string"
    )]
    pub gcs_bucket: Option<String>,
    #[serde(
        rename = "bq.staging_dataset.service_account_key_file",
        default,
        deserialize_with = "self::serde::deserialize_some_string"
    )]
    pub service_account_key_file: Option<String>,
}

impl DataSourceOptions for StagingDatasetOptions {
    const ALLOWED_KEYS: &'static [&'static str] = &[
        keys::staging_dataset::NAME,
        keys::staging_dataset::LOCATION,
        keys::staging_dataset::LIFETIME,
        keys::staging_dataset::GCS_BUCKET,
        keys::staging_dataset::SERVICE_ACCOUNT_KEY_FILE,
    ];
    const DEFAULT_VALUES: &'static [(&'static str, &'static str)] = &[
        (keys::staging_dataset::NAME, DEFAULT_STAGING_DATASET_NAME),
        (
            keys::staging_dataset::LIFETIME,
            DEFAULT_STAGING_DATASET_LIFETIME,
        ),
    ];
}

/// Raw options under the `bq.job.` namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobOptions {
    #[serde(
        rename = "bq.job.priority",
        default,
        deserialize_with = "self::serde::deserialize_some_string"
    )]
    pub priority: Option<String>,
}

impl DataSourceOptions for JobOptions {
    const ALLOWED_KEYS: &'static [&'static str] = &[keys::job::PRIORITY];
    const DEFAULT_VALUES: &'static [(&'static str, &'static str)] =
        &[(keys::job::PRIORITY, DEFAULT_JOB_PRIORITY)];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BigQueryResult;

    #[test]
    fn test_allowed_keys_cover_all_keys() {
        let mut allowed = [
            BigQueryOptions::ALLOWED_KEYS,
            StagingDatasetOptions::ALLOWED_KEYS,
            JobOptions::ALLOWED_KEYS,
        ]
        .concat();
        let mut all = keys::ALL_KEYS.to_vec();
        allowed.sort_unstable();
        all.sort_unstable();
        assert_eq!(allowed, all);
    }

    #[test]
    fn test_field_names_match_allowed_keys() -> BigQueryResult<()> {
        let kv = build_options(
            &keys::ALL_KEYS
                .iter()
                .map(|k| (*k, "value"))
                .collect::<Vec<_>>(),
        );

        let options: BigQueryOptions = load_options(&kv)?;
        assert_eq!(options.project.as_deref(), Some("value"));

        let options: StagingDatasetOptions = load_options(&kv)?;
        assert_eq!(
            options,
            StagingDatasetOptions {
                name: Some("value".to_string()),
                location: Some("value".to_string()),
                lifetime: Some("value".to_string()),
                gcs_bucket: Some("value".to_string()),
                service_account_key_file: Some("value".to_string()),
            }
        );

        let options: JobOptions = load_options(&kv)?;
        assert_eq!(options.priority.as_deref(), Some("value"));
        Ok(())
    }

    #[test]
    fn test_empty_value_is_kept() -> BigQueryResult<()> {
        let kv = build_options(&[("bq.staging_dataset.service_account_key_file", "")]);
        let options: StagingDatasetOptions = load_options(&kv)?;
        assert_eq!(options.service_account_key_file.as_deref(), Some(""));
        Ok(())
    }
}
