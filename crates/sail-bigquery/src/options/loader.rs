use std::collections::HashMap;

use log::warn;
use serde::de::value::MapDeserializer;

use crate::error::{BigQueryError, BigQueryResult};
use crate::options::{keys, DataSourceOptions};

pub fn load_options<T: DataSourceOptions>(options: &HashMap<String, String>) -> BigQueryResult<T> {
    // Keys are matched exactly. The map is shared with other sources,
    // so keys that `T` does not own are skipped.
    let options = options
        .iter()
        .filter(|(k, _)| T::ALLOWED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()));
    T::deserialize(<MapDeserializer<'_, _, serde::de::value::Error>>::new(
        options,
    ))
    .map_err(|e| BigQueryError::InvalidOptions(e.to_string()))
}

pub fn load_default_options<T: DataSourceOptions>() -> BigQueryResult<T> {
    let options = T::DEFAULT_VALUES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    load_options(&options)
}

/// Merge multiple option layers into a single HashMap.
/// Later options override earlier ones.
pub fn merge_options(options: Vec<HashMap<String, String>>) -> HashMap<String, String> {
    let mut merged = HashMap::new();
    for layer in options {
        merged.extend(layer);
    }
    merged
}

/// Returns the keys under the `bq.` namespace that the connector does not recognize.
pub fn unrecognized_keys(options: &HashMap<String, String>) -> Vec<&str> {
    let mut unrecognized = options
        .keys()
        .map(|k| k.as_str())
        .filter(|k| k.starts_with(keys::NAMESPACE) && !keys::ALL_KEYS.contains(k))
        .collect::<Vec<_>>();
    unrecognized.sort_unstable();
    unrecognized
}

pub fn warn_unrecognized_keys(options: &HashMap<String, String>) {
    for key in unrecognized_keys(options) {
        warn!("ignoring unrecognized BigQuery option: {key}");
    }
}

#[cfg(test)]
pub fn build_options(options: &[(&str, &str)]) -> HashMap<String, String> {
    options
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{JobOptions, StagingDatasetOptions};

    #[test]
    fn test_merge_options_empty() {
        let result = merge_options(vec![]);
        assert_eq!(result, HashMap::new());
    }

    #[test]
    fn test_merge_options_override() {
        let options = vec![
            build_options(&[("bq.project", "p1"), ("bq.job.priority", "BATCH")]),
            build_options(&[("bq.project", "p2"), ("bq.staging_dataset.location", "EU")]),
        ];
        let result = merge_options(options);
        assert_eq!(result.get("bq.project"), Some(&"p2".to_string()));
        assert_eq!(result.get("bq.job.priority"), Some(&"BATCH".to_string()));
        assert_eq!(
            result.get("bq.staging_dataset.location"),
            Some(&"EU".to_string())
        );
    }

    #[test]
    fn test_load_options_ignores_foreign_keys() -> BigQueryResult<()> {
        let kv = build_options(&[
            ("bq.staging_dataset.location", "US"),
            ("bq.job.priority", "BATCH"),
            ("path", "gs://bucket/data"),
        ]);
        let options: StagingDatasetOptions = load_options(&kv)?;
        assert_eq!(options.location.as_deref(), Some("US"));
        assert_eq!(options.name, None);

        let options: JobOptions = load_options(&kv)?;
        assert_eq!(options.priority.as_deref(), Some("BATCH"));
        Ok(())
    }

    #[test]
    fn test_load_options_matches_keys_exactly() -> BigQueryResult<()> {
        let kv = build_options(&[("BQ.JOB.PRIORITY", "BATCH")]);
        let options: JobOptions = load_options(&kv)?;
        assert_eq!(options.priority, None);
        Ok(())
    }

    #[test]
    fn test_load_default_options() -> BigQueryResult<()> {
        let options: StagingDatasetOptions = load_default_options()?;
        assert_eq!(options.name.as_deref(), Some("spark_staging"));
        assert_eq!(options.lifetime.as_deref(), Some("86400000"));
        assert_eq!(options.location, None);
        assert_eq!(options.gcs_bucket, None);
        assert_eq!(options.service_account_key_file, None);

        let options: JobOptions = load_default_options()?;
        assert_eq!(options.priority.as_deref(), Some("INTERACTIVE"));
        Ok(())
    }

    #[derive(Debug, serde::Deserialize)]
    struct CountOptions {
        #[serde(rename = "bq.count")]
        #[allow(unused)]
        count: u64,
    }

    impl DataSourceOptions for CountOptions {
        const ALLOWED_KEYS: &'static [&'static str] = &["bq.count"];
        const DEFAULT_VALUES: &'static [(&'static str, &'static str)] = &[];
    }

    #[test]
    fn test_load_options_reports_deserialization_errors() {
        let kv = build_options(&[("bq.count", "5")]);
        let result = load_options::<CountOptions>(&kv);
        assert!(
            matches!(result, Err(BigQueryError::InvalidOptions(_))),
            "{result:?}"
        );

        let result = load_options::<CountOptions>(&build_options(&[]));
        assert!(
            matches!(result, Err(BigQueryError::InvalidOptions(ref m)) if m.contains("bq.count")),
            "{result:?}"
        );
    }

    #[test]
    fn test_unrecognized_keys() {
        let kv = build_options(&[
            ("bq.project", "p"),
            ("bq.staging_dataset.lifetme", "1"),
            ("bq.job.priorty", "BATCH"),
            ("header", "true"),
        ]);
        assert_eq!(
            unrecognized_keys(&kv),
            vec!["bq.job.priorty", "bq.staging_dataset.lifetme"]
        );
    }
}
