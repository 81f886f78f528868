use crate::core::exclusion::parse_exclusions;
use crate::core::filters::{partition_valid_emails, remove_excluded, retain_signed_in};
use crate::core::table::parse_table;
use crate::core::writer::{output_path, render_worklist};
use crate::core::{email, ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ExclusionSet, FilterStats, OutputRecord, RunPhase, Table, TransformResult};
use crate::utils::error::{EmptyReason, PurgeError, Result};
use std::path::PathBuf;

/// Turns a user export into a `<domain>-to-delete.csv` worklist.
pub struct WorklistPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> WorklistPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    async fn load_exclusions(&self) -> Result<Option<ExclusionSet>> {
        let Some(path) = self.config.exclusion_path() else {
            return Ok(None);
        };

        tracing::debug!("Reading exclusion list from {}", path.display());
        let bytes = match self.storage.read_file(path).await {
            Ok(bytes) => bytes,
            Err(PurgeError::IoError(source)) => {
                return Err(PurgeError::ExclusionFileError {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(e) => return Err(e),
        };
        let content = String::from_utf8_lossy(&bytes);
        Ok(Some(parse_exclusions(&content)))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for WorklistPipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        let path = self.config.input_path();
        tracing::debug!("Reading user export from {}", path.display());

        let data = self.storage.read_file(path).await?;
        let table = parse_table(
            &data,
            self.config.delimiter(),
            self.config.email_column(),
            self.config.status_column(),
        )?;

        tracing::debug!("Phase: {}", RunPhase::Loaded);
        Ok(table)
    }

    async fn transform(&self, mut table: Table) -> Result<TransformResult> {
        let mut stats = FilterStats {
            loaded: table.len(),
            ..FilterStats::default()
        };

        stats.never_logged_in = retain_signed_in(&mut table, self.config.never_logged_in());
        stats.signed_in = table.len();
        tracing::debug!("Phase: {}", RunPhase::SignedInFiltered);

        if table.is_empty() {
            return Err(PurgeError::EmptyResult {
                reason: EmptyReason::NoSignedInUsers,
                stats,
            });
        }

        if let Some(exclusions) = self.load_exclusions().await? {
            stats.exclusion_entries = Some(exclusions.len());
            stats.excluded = remove_excluded(&mut table, &exclusions);
            tracing::debug!("Phase: {}", RunPhase::ExclusionsApplied);
        }

        let (valid, invalid) = partition_valid_emails(&table);
        stats.invalid = invalid;
        tracing::debug!("Phase: {}", RunPhase::Validated);

        let Some(domain) = email::infer_domain(valid.iter().map(String::as_str)) else {
            return Err(PurgeError::EmptyResult {
                reason: EmptyReason::NoValidEmails,
                stats,
            });
        };
        tracing::debug!("Phase: {}", RunPhase::DomainResolved);

        let records = valid
            .into_iter()
            .map(|primary_email| OutputRecord { primary_email })
            .collect();

        Ok(TransformResult {
            records,
            domain,
            stats,
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<PathBuf> {
        let path = output_path(
            self.config.input_path(),
            &result.domain.primary,
            self.config.output_suffix(),
        );

        let data = render_worklist(&result.records)?;
        tracing::debug!(
            "Writing {} records ({} bytes) to {}",
            result.records.len(),
            data.len(),
            path.display()
        );
        self.storage.write_file(&path, &data).await?;

        tracing::debug!("Phase: {}", RunPhase::Written);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::PipelineSettings;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(PathBuf::from(path), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(Path::new(path)).cloned()
        }

        async fn file_count(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                PurgeError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                ))
            })
        }

        async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    const EXPORT: &str = "First Name [Required],Email Address [Required],Last Sign In [READ ONLY]\n\
                          Ann,a@x.com,Never logged in\n\
                          Bob,b@x.com,2023-01-01\n\
                          Bad,bad@@x,2023-01-01\n";

    fn settings(exclusions: Option<&str>) -> PipelineSettings {
        PipelineSettings::new("/in/users.csv", exclusions.map(PathBuf::from))
    }

    #[tokio::test]
    async fn test_extract_reads_configured_input() {
        let storage = MockStorage::default();
        storage.put("/in/users.csv", EXPORT).await;
        let pipeline = WorklistPipeline::new(storage, settings(None));

        let table = pipeline.extract().await.unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.headers[0], "First Name [Required]");
    }

    #[tokio::test]
    async fn test_extract_missing_input_is_io_error() {
        let pipeline = WorklistPipeline::new(MockStorage::default(), settings(None));
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, PurgeError::IoError(_)));
    }

    #[tokio::test]
    async fn test_transform_drops_inactive_and_invalid() {
        let storage = MockStorage::default();
        storage.put("/in/users.csv", EXPORT).await;
        let pipeline = WorklistPipeline::new(storage, settings(None));

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert_eq!(
            result.records,
            vec![OutputRecord {
                primary_email: "b@x.com".to_string()
            }]
        );
        assert_eq!(result.domain.primary, "x.com");
        assert_eq!(result.stats.loaded, 3);
        assert_eq!(result.stats.never_logged_in, 1);
        assert_eq!(result.stats.signed_in, 2);
        assert_eq!(result.stats.exclusion_entries, None);
        assert_eq!(result.stats.invalid, vec!["bad@@x".to_string()]);
    }

    #[tokio::test]
    async fn test_transform_applies_exclusions() {
        let storage = MockStorage::default();
        storage.put("/in/users.csv", EXPORT).await;
        storage.put("/in/keep.txt", "B@X.com\n").await;
        let pipeline = WorklistPipeline::new(storage, settings(Some("/in/keep.txt")));

        let table = pipeline.extract().await.unwrap();
        let err = pipeline.transform(table).await.unwrap_err();

        let PurgeError::EmptyResult { reason, stats } = err else {
            panic!("expected empty result");
        };
        assert_eq!(reason, EmptyReason::NoValidEmails);
        assert_eq!(stats.signed_in, 2);
        assert_eq!(stats.exclusion_entries, Some(1));
        assert_eq!(stats.excluded, 1);
        assert_eq!(stats.invalid, vec!["bad@@x".to_string()]);
    }

    #[tokio::test]
    async fn test_transform_no_signed_in_users() {
        let storage = MockStorage::default();
        storage
            .put(
                "/in/users.csv",
                "Email Address [Required],Last Sign In [READ ONLY]\na@x.com,Never logged in\n",
            )
            .await;
        // Exclusion file is absent; the run must stop before it is read.
        let pipeline = WorklistPipeline::new(storage, settings(Some("/in/missing.txt")));

        let table = pipeline.extract().await.unwrap();
        let err = pipeline.transform(table).await.unwrap_err();

        let PurgeError::EmptyResult { reason, stats } = err else {
            panic!("expected empty result");
        };
        assert_eq!(reason, EmptyReason::NoSignedInUsers);
        assert_eq!(stats.loaded, 1);
        assert_eq!(stats.never_logged_in, 1);
        assert_eq!(stats.exclusion_entries, None);
    }

    #[tokio::test]
    async fn test_transform_unreadable_exclusions_abort() {
        let storage = MockStorage::default();
        storage.put("/in/users.csv", EXPORT).await;
        let pipeline = WorklistPipeline::new(storage, settings(Some("/in/missing.txt")));

        let table = pipeline.extract().await.unwrap();
        let err = pipeline.transform(table).await.unwrap_err();

        match err {
            PurgeError::ExclusionFileError { path, .. } => {
                assert_eq!(path, PathBuf::from("/in/missing.txt"))
            }
            other => panic!("expected exclusion file error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_writes_sibling_file() {
        let storage = MockStorage::default();
        storage.put("/in/users.csv", EXPORT).await;
        let pipeline = WorklistPipeline::new(storage.clone(), settings(None));

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();
        let path = pipeline.load(&result).await.unwrap();

        assert_eq!(path, PathBuf::from("/in/x.com-to-delete.csv"));
        let written = storage.get_file("/in/x.com-to-delete.csv").await.unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), "primaryEmail\nb@x.com\n");
        assert_eq!(storage.file_count().await, 2);
    }
}
