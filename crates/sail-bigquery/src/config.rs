use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BigQueryError, BigQueryResult};
use crate::options::{
    keys, load_default_options, load_options, merge_options, warn_unrecognized_keys,
    BigQueryOptions, JobOptions, StagingDatasetOptions,
};

/// The execution priority of a BigQuery query job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobPriority {
    /// The job runs as soon as possible.
    #[default]
    Interactive,
    /// The job is queued and started when idle resources are available.
    Batch,
}

impl JobPriority {
    pub const ALL: [JobPriority; 2] = [JobPriority::Interactive, JobPriority::Batch];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interactive => "INTERACTIVE",
            Self::Batch => "BATCH",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|x| x.as_str()).collect()
    }
}

impl AsRef<str> for JobPriority {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobPriority {
    type Err = BigQueryError;

    /// Parses a priority label. The match is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INTERACTIVE" => Ok(Self::Interactive),
            "BATCH" => Ok(Self::Batch),
            _ => Err(BigQueryError::invalid_enum(
                keys::job::PRIORITY,
                s,
                &Self::labels(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JobConfig {
    priority: JobPriority,
}

impl JobConfig {
    pub fn try_from_options(options: &HashMap<String, String>) -> BigQueryResult<Self> {
        let mut builder = JobConfigBuilder::default();
        apply_job_options(load_default_options()?, &mut builder)?;
        apply_job_options(load_options(options)?, &mut builder)?;
        builder.build()
    }

    pub fn priority(&self) -> JobPriority {
        self.priority
    }
}

/// The BigQuery dataset that holds query results before they are read back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StagingDatasetConfig {
    name: String,
    location: String,
    lifetime_ms: u64,
    gcs_bucket: String,
    service_account_key_file: Option<String>,
}

impl StagingDatasetConfig {
    pub fn try_from_options(options: &HashMap<String, String>) -> BigQueryResult<Self> {
        let mut builder = StagingDatasetConfigBuilder::default();
        apply_staging_dataset_options(load_default_options()?, &mut builder)?;
        apply_staging_dataset_options(load_options(options)?, &mut builder)?;
        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dataset location, e.g. `EU` or `US`.
    /// The value is passed through to BigQuery without validation.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The default table expiration in the staging dataset, in milliseconds.
    pub fn lifetime_ms(&self) -> u64 {
        self.lifetime_ms
    }

    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }

    pub fn gcs_bucket(&self) -> &str {
        &self.gcs_bucket
    }

    /// The service account key file used for Cloud Storage.
    /// [`None`] means the ambient credentials are used.
    pub fn service_account_key_file(&self) -> Option<&str> {
        self.service_account_key_file.as_deref()
    }
}

/// The configuration of the BigQuery connector for a single read or write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigQueryConfig {
    project: String,
    staging_dataset: StagingDatasetConfig,
    job: JobConfig,
}

impl BigQueryConfig {
    /// Builds the configuration from the connector's option map.
    ///
    /// Keys outside the `bq.` namespace are ignored. Resolution stops at the
    /// first missing required key or invalid value.
    pub fn try_from_options(options: &HashMap<String, String>) -> BigQueryResult<Self> {
        warn_unrecognized_keys(options);
        let mut builder = BigQueryConfigBuilder::default();
        apply_bigquery_options(load_options(options)?, &mut builder)?;
        let project = builder.build()?;
        let staging_dataset = StagingDatasetConfig::try_from_options(options)?;
        let job = JobConfig::try_from_options(options)?;
        let config = Self {
            project,
            staging_dataset,
            job,
        };
        debug!("resolved BigQuery config: {config:?}");
        Ok(config)
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn staging_dataset(&self) -> &StagingDatasetConfig {
        &self.staging_dataset
    }

    pub fn job(&self) -> &JobConfig {
        &self.job
    }

    /// Returns the option map that resolves to this configuration.
    pub fn to_options(&self) -> HashMap<String, String> {
        let StagingDatasetConfig {
            name,
            location,
            lifetime_ms,
            gcs_bucket,
            service_account_key_file,
        } = &self.staging_dataset;
        let mut options = HashMap::from([
            (keys::PROJECT.to_string(), self.project.clone()),
            (keys::staging_dataset::NAME.to_string(), name.clone()),
            (keys::staging_dataset::LOCATION.to_string(), location.clone()),
            (
                keys::staging_dataset::LIFETIME.to_string(),
                lifetime_ms.to_string(),
            ),
            (
                keys::staging_dataset::GCS_BUCKET.to_string(),
                gcs_bucket.clone(),
            ),
            (
                keys::job::PRIORITY.to_string(),
                self.job.priority.to_string(),
            ),
        ]);
        if let Some(path) = service_account_key_file {
            options.insert(
                keys::staging_dataset::SERVICE_ACCOUNT_KEY_FILE.to_string(),
                path.clone(),
            );
        }
        options
    }
}

impl TryFrom<&HashMap<String, String>> for BigQueryConfig {
    type Error = BigQueryError;

    fn try_from(options: &HashMap<String, String>) -> Result<Self, Self::Error> {
        Self::try_from_options(options)
    }
}

/// Resolves the configuration from several option layers.
/// Later layers override earlier ones.
pub fn resolve_bigquery_config(
    options: Vec<HashMap<String, String>>,
) -> BigQueryResult<BigQueryConfig> {
    BigQueryConfig::try_from_options(&merge_options(options))
}

fn require(key: &str, value: Option<String>) -> BigQueryResult<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BigQueryError::missing(key)),
    }
}

fn parse_u64(key: &str, value: &str) -> BigQueryResult<u64> {
    value
        .parse::<u64>()
        .map_err(|_| BigQueryError::invalid_integer(key, value))
}

#[derive(Debug, Default)]
struct BigQueryConfigBuilder {
    project: Option<String>,
}

impl BigQueryConfigBuilder {
    fn build(self) -> BigQueryResult<String> {
        require(keys::PROJECT, self.project)
    }
}

fn apply_bigquery_options(
    from: BigQueryOptions,
    to: &mut BigQueryConfigBuilder,
) -> BigQueryResult<()> {
    let BigQueryOptions { project } = from;
    if let Some(v) = project {
        to.project = Some(v);
    }
    Ok(())
}

/// `name` and `lifetime_ms` are always set by the defaults layer.
#[derive(Debug, Default)]
struct StagingDatasetConfigBuilder {
    name: String,
    location: Option<String>,
    lifetime_ms: u64,
    gcs_bucket: Option<String>,
    service_account_key_file: Option<String>,
}

impl StagingDatasetConfigBuilder {
    fn build(self) -> BigQueryResult<StagingDatasetConfig> {
        let Self {
            name,
            location,
            lifetime_ms,
            gcs_bucket,
            service_account_key_file,
        } = self;
        Ok(StagingDatasetConfig {
            name,
            location: require(keys::staging_dataset::LOCATION, location)?,
            lifetime_ms,
            gcs_bucket: require(keys::staging_dataset::GCS_BUCKET, gcs_bucket)?,
            service_account_key_file,
        })
    }
}

fn apply_staging_dataset_options(
    from: StagingDatasetOptions,
    to: &mut StagingDatasetConfigBuilder,
) -> BigQueryResult<()> {
    let StagingDatasetOptions {
        name,
        location,
        lifetime,
        gcs_bucket,
        service_account_key_file,
    } = from;
    if let Some(v) = name {
        to.name = v;
    }
    if let Some(v) = location {
        to.location = Some(v);
    }
    if let Some(v) = lifetime {
        to.lifetime_ms = parse_u64(keys::staging_dataset::LIFETIME, &v)?;
    }
    if let Some(v) = gcs_bucket {
        to.gcs_bucket = Some(v);
    }
    if let Some(v) = service_account_key_file {
        to.service_account_key_file = Some(v);
    }
    Ok(())
}

#[derive(Debug, Default)]
struct JobConfigBuilder {
    priority: Option<JobPriority>,
}

impl JobConfigBuilder {
    fn build(self) -> BigQueryResult<JobConfig> {
        Ok(JobConfig {
            priority: self.priority.unwrap_or_default(),
        })
    }
}

fn apply_job_options(from: JobOptions, to: &mut JobConfigBuilder) -> BigQueryResult<()> {
    let JobOptions { priority } = from;
    if let Some(v) = priority {
        to.priority = Some(v.parse()?);
    }
    Ok(())
}
