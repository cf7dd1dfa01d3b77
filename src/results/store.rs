//! File-backed result store: one pretty JSON file per record.
//!
//! Records are append-only. A fresh id that collides with an existing file
//! is an internal error; nothing is ever overwritten.

use super::record::{CallStats, ResultRecord};
use super::references::ToolReferenceDetector;
use crate::cost::CostEstimate;
use crate::error::{LabError, Result};
use crate::fs::atomic_create;
use crate::generation::UsageRecord;
use crate::prompt::GenerationRequest;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Criteria for [`ResultStore::list_records`]. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub problem_id: Option<String>,
    /// The record's tool selection must include every one of these.
    pub tool_ids: Vec<String>,
    pub model_id: Option<String>,
    pub limit: Option<usize>,
}

impl RecordFilter {
    pub fn matches(&self, record: &ResultRecord) -> bool {
        if let Some(problem_id) = &self.problem_id
            && record.problem_id() != problem_id
        {
            return false;
        }
        if let Some(model_id) = &self.model_id
            && &record.request.model_id != model_id
        {
            return false;
        }
        self.tool_ids
            .iter()
            .all(|wanted| record.request.tool_ids().any(|id| id == wanted.as_str()))
    }
}

pub struct ResultStore {
    dir: PathBuf,
    detector: Arc<dyn ToolReferenceDetector>,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>, detector: Arc<dyn ToolReferenceDetector>) -> Self {
        Self {
            dir: dir.into(),
            detector,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn detector(&self) -> &dyn ToolReferenceDetector {
        self.detector.as_ref()
    }

    /// Parse `raw_output`, build the record and persist it.
    pub fn record(
        &self,
        request: GenerationRequest,
        raw_output: String,
        usage: UsageRecord,
        cost: CostEstimate,
        call: CallStats,
    ) -> Result<ResultRecord> {
        let record = ResultRecord::build(
            request,
            raw_output,
            usage,
            cost,
            call,
            self.detector.as_ref(),
        );
        self.persist(&record)?;
        Ok(record)
    }

    /// Write `record` to `<dir>/<result_id>.json`, refusing to overwrite.
    pub fn persist(&self, record: &ResultRecord) -> Result<()> {
        validate_result_id(&record.result_id)
            .map_err(|_| LabError::Internal(format!("invalid result id '{}'", record.result_id)))?;

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            LabError::UserError(format!(
                "failed to create results directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| LabError::Internal(format!("failed to serialize result record: {}", e)))?;

        atomic_create(self.path_for(&record.result_id), json.as_bytes())?;
        tracing::debug!(result_id = %record.result_id, "result record written");
        Ok(())
    }

    /// Load one record by id.
    pub fn load(&self, result_id: &str) -> Result<ResultRecord> {
        let result_id = result_id.trim();
        validate_result_id(result_id)?;

        let path = self.path_for(result_id);
        if !path.is_file() {
            return Err(LabError::RecordNotFound(result_id.to_string()));
        }
        read_record(&path)
    }

    /// Records matching `filter`, newest first. Unreadable files are skipped.
    pub fn list_records(&self, filter: &RecordFilter) -> Result<Vec<ResultRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for path in crate::context::json_files(&self.dir)? {
            match read_record(&path) {
                Ok(record) if filter.matches(&record) => records.push(record),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable result record");
                }
            }
        }

        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.result_id.cmp(&b.result_id))
        });
        if let Some(limit) = filter.limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    fn path_for(&self, result_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", result_id))
    }
}

/// Ids are generated uuids; anything that could escape the directory is unknown.
fn validate_result_id(result_id: &str) -> Result<()> {
    let ok = !result_id.is_empty()
        && result_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(LabError::RecordNotFound(result_id.to_string()))
    }
}

fn read_record(path: &Path) -> Result<ResultRecord> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LabError::UserError(format!(
            "failed to read result record '{}': {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        LabError::UserError(format!(
            "failed to parse result record '{}': {}",
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::DeclaredOrMentioned;
    use crate::test_support::{sample_output, sample_request};
    use chrono::Duration;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> ResultStore {
        ResultStore::new(temp_dir.path().join("results"), Arc::new(DeclaredOrMentioned))
    }

    fn usage() -> UsageRecord {
        UsageRecord {
            input_tokens: 1000,
            output_tokens: 500,
        }
    }

    fn cost() -> CostEstimate {
        CostEstimate {
            input_cost: 0.003,
            output_cost: 0.0075,
            total_cost: 0.0105,
        }
    }

    fn call() -> CallStats {
        CallStats {
            latency_ms: 1234,
            attempts: 1,
        }
    }

    #[test]
    fn test_record_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let record = store
            .record(sample_request(), sample_output(), usage(), cost(), call())
            .unwrap();
        let loaded = store.load(&record.result_id).unwrap();

        assert_eq!(loaded, record);
        assert!(
            store
                .dir()
                .join(format!("{}.json", record.result_id))
                .is_file()
        );
    }

    #[test]
    fn test_record_keeps_raw_output_and_parses() {
        let temp_dir = TempDir::new().unwrap();
        let record = store(&temp_dir)
            .record(sample_request(), sample_output(), usage(), cost(), call())
            .unwrap();

        assert_eq!(record.raw_output, sample_output());
        assert_eq!(record.parse.parsed_count, 5);
        assert_eq!(record.latency_ms, 1234);
    }

    #[test]
    fn test_unparseable_output_still_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let record = store
            .record(
                sample_request(),
                "not json at all".to_string(),
                usage(),
                cost(),
                call(),
            )
            .unwrap();

        let loaded = store.load(&record.result_id).unwrap();
        assert!(loaded.parsed_solutions.is_empty());
        assert!(loaded.parse.partial);
        assert_eq!(loaded.raw_output, "not json at all");
    }

    #[test]
    fn test_persist_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let record = store
            .record(sample_request(), sample_output(), usage(), cost(), call())
            .unwrap();

        let err = store.persist(&record).unwrap_err();
        assert!(matches!(err, LabError::Internal(_)));
    }

    #[test]
    fn test_load_missing_and_hostile_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        for id in ["does-not-exist", "../secrets", ""] {
            let err = store.load(id).unwrap_err();
            assert!(matches!(err, LabError::RecordNotFound(_)), "id {:?}", id);
        }
    }

    #[test]
    fn test_list_records_filters_and_orders() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let base = ResultRecord::build(
            sample_request(),
            sample_output(),
            usage(),
            cost(),
            call(),
            &DeclaredOrMentioned,
        );

        let mut older = base.clone();
        older.result_id = "a-older".to_string();
        older.timestamp = base.timestamp - Duration::hours(1);

        let mut newer = base.clone();
        newer.result_id = "b-newer".to_string();

        let mut other_problem = base.clone();
        other_problem.result_id = "c-other".to_string();
        other_problem.request.problem.id = "sleep_l2_003".to_string();
        other_problem.request.tools.truncate(1);

        for r in [&older, &newer, &other_problem] {
            store.persist(r).unwrap();
        }
        std::fs::write(store.dir().join("garbage.json"), "{").unwrap();

        let all = store.list_records(&RecordFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.last().unwrap().result_id, "a-older");

        let by_problem = store
            .list_records(&RecordFilter {
                problem_id: Some("nutrition_l1_001".to_string()),
                ..Default::default()
            })
            .unwrap();
        let ids: Vec<_> = by_problem.iter().map(|r| r.result_id.as_str()).collect();
        assert_eq!(ids, vec!["b-newer", "a-older"]);

        let last_tool = base.request.tools.last().unwrap().tool_id.clone();
        let by_tool = store
            .list_records(&RecordFilter {
                tool_ids: vec![last_tool],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_tool.len(), 2);

        let limited = store
            .list_records(&RecordFilter {
                limit: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_list_records_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(
            store(&temp_dir)
                .list_records(&RecordFilter::default())
                .unwrap()
                .is_empty()
        );
    }
}
