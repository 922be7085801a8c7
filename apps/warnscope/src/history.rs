//! Persisted build records and reference-build selection.
//!
//! Layout below the history directory:
//!
//! ```text
//! builds/<N>/build.json   serialized BuildRecord
//! builds/<N>/sources/     copies of affected files
//! ```

use crate::error::{Result, WarnscopeError};
use crate::models::{AnalysisResult, BuildRecord, JobResult};
use crate::resolve::paths::stored_name;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const BUILDS_DIR: &str = "builds";
const RECORD_FILE: &str = "build.json";
const SOURCES_DIR: &str = "sources";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobCriterion {
    /// Skip builds whose job result is FAILURE.
    NoJobFailure,
    IgnoreJobResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCriterion {
    /// Skip builds that missed a quality gate.
    SuccessfulQualityGate,
    IgnoreQualityGate,
}

/// Conditions a build has to meet to serve as reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceCriteria {
    pub job: JobCriterion,
    pub gate: GateCriterion,
}

impl ReferenceCriteria {
    pub fn new(ignore_failed_builds: bool, ignore_quality_gate: bool) -> Self {
        ReferenceCriteria {
            job: if ignore_failed_builds {
                JobCriterion::NoJobFailure
            } else {
                JobCriterion::IgnoreJobResult
            },
            gate: if ignore_quality_gate {
                GateCriterion::IgnoreQualityGate
            } else {
                GateCriterion::SuccessfulQualityGate
            },
        }
    }

    pub fn accepts(&self, record: &BuildRecord) -> bool {
        let job_ok = match self.job {
            JobCriterion::NoJobFailure => record.job_result != JobResult::Failure,
            JobCriterion::IgnoreJobResult => true,
        };
        let gate_ok = match self.gate {
            GateCriterion::SuccessfulQualityGate => record.quality_gate.is_successful(),
            GateCriterion::IgnoreQualityGate => true,
        };
        job_ok && gate_ok
    }
}

impl fmt::Display for ReferenceCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let job = match self.job {
            JobCriterion::NoJobFailure => "NO_JOB_FAILURE",
            JobCriterion::IgnoreJobResult => "IGNORE_JOB_RESULT",
        };
        let gate = match self.gate {
            GateCriterion::SuccessfulQualityGate => "SUCCESSFUL_QUALITY_GATE",
            GateCriterion::IgnoreQualityGate => "IGNORE_QUALITY_GATE",
        };
        write!(f, "{} - {}", job, gate)
    }
}

/// Numbered build records stored on disk.
pub struct BuildHistory {
    root: PathBuf,
}

impl BuildHistory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        BuildHistory { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self, number: u64) -> PathBuf {
        self.root.join(BUILDS_DIR).join(number.to_string())
    }

    pub fn sources_dir(&self, number: u64) -> PathBuf {
        self.build_dir(number).join(SOURCES_DIR)
    }

    fn record_path(&self, number: u64) -> PathBuf {
        self.build_dir(number).join(RECORD_FILE)
    }

    /// Recorded build numbers, ascending.
    pub fn numbers(&self) -> Result<Vec<u64>> {
        let dir = self.root.join(BUILDS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir).map_err(|source| WarnscopeError::Read {
            path: dir.clone(),
            source,
        })?;
        let mut numbers: Vec<u64> = entries
            .flatten()
            .filter_map(|e| e.file_name().to_str().and_then(|s| s.parse().ok()))
            .filter(|n| self.record_path(*n).is_file())
            .collect();
        numbers.sort_unstable();
        Ok(numbers)
    }

    pub fn next_number(&self) -> Result<u64> {
        Ok(self.numbers()?.last().map_or(1, |n| n + 1))
    }

    pub fn load(&self, number: u64) -> Result<BuildRecord> {
        let path = self.record_path(number);
        if !path.is_file() {
            return Err(WarnscopeError::BuildNotFound(number));
        }
        let content = fs::read_to_string(&path).map_err(|source| WarnscopeError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| WarnscopeError::CorruptBuild { path, source })
    }

    pub fn latest(&self) -> Result<BuildRecord> {
        let last = self.numbers()?.last().copied().ok_or(WarnscopeError::NoBuilds)?;
        self.load(last)
    }

    /// Load build `number`, or the latest build when `None`.
    pub fn load_or_latest(&self, number: Option<u64>) -> Result<BuildRecord> {
        match number {
            Some(n) => self.load(n),
            None => self.latest(),
        }
    }

    pub fn save(&self, record: &BuildRecord) -> Result<PathBuf> {
        let dir = self.build_dir(record.number);
        fs::create_dir_all(&dir).map_err(|source| WarnscopeError::Write {
            path: dir.clone(),
            source,
        })?;
        let path = self.record_path(record.number);
        let json = serde_json::to_string_pretty(record).map_err(WarnscopeError::Serialize)?;
        fs::write(&path, json + "\n").map_err(|source| WarnscopeError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(build = record.number, path = %path.display(), "saved build record");
        Ok(path)
    }

    /// Earlier records, newest first. Unreadable records are skipped.
    fn earlier(&self, before: u64) -> Result<impl Iterator<Item = BuildRecord> + '_> {
        let numbers = self.numbers()?;
        Ok(numbers
            .into_iter()
            .rev()
            .filter(move |n| *n < before)
            .filter_map(move |n| match self.load(n) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(build = n, error = %e, "skipping unreadable build record");
                    None
                }
            }))
    }

    /// Most recent build before `before` that meets `criteria` and has a
    /// result with the given id.
    pub fn find_reference(
        &self,
        id: &str,
        criteria: &ReferenceCriteria,
        before: u64,
    ) -> Result<Option<AnalysisResult>> {
        for record in self.earlier(before)? {
            if !criteria.accepts(&record) {
                tracing::debug!(build = record.number, %criteria, "build rejected as reference");
                continue;
            }
            if let Some(result) = record.find(id) {
                return Ok(Some(result.clone()));
            }
        }
        Ok(None)
    }

    /// Content of the copy of `file` stored with build `number`.
    ///
    /// `file` may be the absolute name recorded in the issue or any trailing
    /// part of it, as long as it identifies a single stored copy.
    pub fn read_source(&self, number: u64, file: &str) -> Result<String> {
        let not_found = || WarnscopeError::SourceNotFound {
            file: file.to_string(),
            build: number,
        };
        let dir = self.sources_dir(number);
        let wanted = stored_name(file.trim_start_matches(['/', '\\']));
        let entries = fs::read_dir(&dir).map_err(|_| not_found())?;
        let matches: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n == wanted || n.ends_with(&format!("_{}", wanted)))
            })
            .collect();
        let [path] = matches.as_slice() else {
            return Err(not_found());
        };
        let bytes = fs::read(path).map_err(|source| WarnscopeError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Result with the given id in the closest earlier build that has one,
    /// regardless of build status.
    pub fn previous_result(&self, id: &str, before: u64) -> Result<Option<AnalysisResult>> {
        for record in self.earlier(before)? {
            if let Some(result) = record.find(id) {
                return Ok(Some(result.clone()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageLog, QualityGateStatus};
    use tempfile::tempdir;

    fn result(id: &str, build: u64) -> AnalysisResult {
        AnalysisResult {
            id: id.into(),
            name: id.into(),
            build,
            issues: Vec::new(),
            new_issues: Vec::new(),
            fixed_issues: Vec::new(),
            reference_build: None,
            reference_total: None,
            quality_gate: QualityGateStatus::Inactive,
            health: None,
            no_issues_since: None,
            tools: Vec::new(),
            log: MessageLog::default(),
        }
    }

    fn record(number: u64, job: JobResult, gate: QualityGateStatus, ids: &[&str]) -> BuildRecord {
        let mut r = BuildRecord::new(number, job);
        r.quality_gate = gate;
        r.results = ids.iter().map(|id| result(id, number)).collect();
        r
    }

    #[test]
    fn test_numbers_and_round_trip() {
        let dir = tempdir().unwrap();
        let history = BuildHistory::new(dir.path());
        assert_eq!(history.next_number().unwrap(), 1);
        history
            .save(&record(1, JobResult::Success, QualityGateStatus::Passed, &["pmd"]))
            .unwrap();
        history
            .save(&record(2, JobResult::Unstable, QualityGateStatus::Warning, &["pmd"]))
            .unwrap();
        fs::create_dir_all(dir.path().join("builds/notes")).unwrap();
        assert_eq!(history.numbers().unwrap(), vec![1, 2]);
        assert_eq!(history.next_number().unwrap(), 3);
        let latest = history.latest().unwrap();
        assert_eq!(latest.number, 2);
        assert_eq!(latest.quality_gate, QualityGateStatus::Warning);
        assert!(matches!(history.load(7), Err(WarnscopeError::BuildNotFound(7))));
    }

    #[test]
    fn test_reference_selection_honors_criteria() {
        let dir = tempdir().unwrap();
        let history = BuildHistory::new(dir.path());
        history
            .save(&record(1, JobResult::Success, QualityGateStatus::Passed, &["pmd"]))
            .unwrap();
        history
            .save(&record(2, JobResult::Unstable, QualityGateStatus::Warning, &["pmd"]))
            .unwrap();
        history
            .save(&record(3, JobResult::Failure, QualityGateStatus::Inactive, &["pmd"]))
            .unwrap();
        history
            .save(&record(4, JobResult::Success, QualityGateStatus::Passed, &["checkstyle"]))
            .unwrap();

        let strict = ReferenceCriteria::new(true, false);
        let found = history.find_reference("pmd", &strict, 5).unwrap().unwrap();
        assert_eq!(found.build, 1);

        let ignore_gate = ReferenceCriteria::new(true, true);
        let found = history.find_reference("pmd", &ignore_gate, 5).unwrap().unwrap();
        assert_eq!(found.build, 2);

        let anything = ReferenceCriteria::new(false, true);
        let found = history.find_reference("pmd", &anything, 5).unwrap().unwrap();
        assert_eq!(found.build, 3);

        assert!(history.find_reference("cpd", &anything, 5).unwrap().is_none());
        assert!(history.find_reference("pmd", &strict, 1).unwrap().is_none());
    }

    #[test]
    fn test_stored_sources_are_found_by_suffix() {
        let dir = tempdir().unwrap();
        let history = BuildHistory::new(dir.path());
        let sources = history.sources_dir(1);
        fs::create_dir_all(&sources).unwrap();
        fs::write(sources.join("_ws_src_A.java"), "class A {}").unwrap();
        fs::write(sources.join("_ws_lib_A.java"), "class A2 {}").unwrap();
        assert_eq!(history.read_source(1, "/ws/src/A.java").unwrap(), "class A {}");
        assert_eq!(history.read_source(1, "src/A.java").unwrap(), "class A {}");
        assert!(matches!(
            history.read_source(1, "A.java"),
            Err(WarnscopeError::SourceNotFound { .. })
        ));
        assert!(history.read_source(2, "A.java").is_err());
    }

    #[test]
    fn test_criteria_names() {
        assert_eq!(
            ReferenceCriteria::new(true, false).to_string(),
            "NO_JOB_FAILURE - SUCCESSFUL_QUALITY_GATE"
        );
        assert_eq!(
            ReferenceCriteria::new(false, true).to_string(),
            "IGNORE_JOB_RESULT - IGNORE_QUALITY_GATE"
        );
    }
}
