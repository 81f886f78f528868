use crate::domain::model::{InputKind, RunOutcome, Table, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &Path;
    fn exclusion_path(&self) -> Option<&Path>;
    fn email_column(&self) -> &str;
    fn status_column(&self) -> &str;
    fn never_logged_in(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn output_suffix(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, table: Table) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<PathBuf>;
}

/// Receives progress while a run is in flight.
pub trait StatusSink: Send + Sync {
    fn emit_status(&self, line: &str);
    fn emit_terminal(&self, outcome: &RunOutcome);
}

/// The interactive surface: picks files and shows what happened.
pub trait Presenter: StatusSink {
    fn request_input_path(&self, kind: InputKind) -> Option<PathBuf>;
}
