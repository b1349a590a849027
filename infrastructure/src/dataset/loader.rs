//! JSONL dataset loader.
//!
//! One record per line:
//!
//! ```json
//! {"context": "…", "question": "…", "choices": ["a", "b", "c", "d"], "label": 1}
//! ```
//!
//! `label` is the 0-based index of the correct choice. `context` is
//! optional; when present it is folded into the question text the same way
//! the prompts expect it.

use madnet_application::use_cases::run_batch::LabeledQuestion;
use madnet_domain::{Choice, Question};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors when loading a dataset file
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(default)]
    context: Option<String>,
    question: String,
    choices: Vec<String>,
    /// 0-based index of the correct choice
    label: i64,
}

/// Loader for JSONL question files
#[derive(Debug, Default, Clone)]
pub struct DatasetLoader {
    limit: Option<usize>,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of questions taken from the head of the file
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<LabeledQuestion>, DatasetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut questions = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if self.limit.is_some_and(|limit| questions.len() >= limit) {
                break;
            }
            questions.push(parse_line(path, index + 1, line)?);
        }

        info!(
            path = %path.display(),
            questions = questions.len(),
            "dataset loaded"
        );
        Ok(questions)
    }
}

fn parse_line(path: &Path, line_no: usize, line: &str) -> Result<LabeledQuestion, DatasetError> {
    let parse_err = |message: String| DatasetError::Parse {
        path: path.to_path_buf(),
        line: line_no,
        message,
    };

    let record: DatasetRecord =
        serde_json::from_str(line).map_err(|e| parse_err(e.to_string()))?;

    let choices: [String; 4] = record
        .choices
        .try_into()
        .map_err(|v: Vec<String>| parse_err(format!("expected 4 choices, got {}", v.len())))?;

    // Labels are 0-based in the file, choices are 1-based in the domain
    let correct =
        Choice::new(record.label + 1).map_err(|e| parse_err(e.to_string()))?;

    let text = match record.context {
        Some(context) => format!(
            "Context paragraph: {}\n\nQuestion: {}",
            context, record.question
        ),
        None => record.question,
    };
    let question = Question::new(text, choices).map_err(|e| parse_err(e.to_string()))?;

    Ok(LabeledQuestion::new(question, correct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dataset_file(lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        (dir, path)
    }

    const GOOD: &str = r#"{"question": "Pick one.", "choices": ["a", "b", "c", "d"], "label": 1}"#;
    const WITH_CONTEXT: &str = r#"{"context": "Some story.", "question": "Why?", "choices": ["a", "b", "c", "d"], "label": 0}"#;

    #[test]
    fn test_load_happy_path() {
        let (_dir, path) = dataset_file(&[GOOD, WITH_CONTEXT, ""]);

        let questions = DatasetLoader::new().load(&path).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct.get(), 2);
        assert_eq!(questions[1].correct.get(), 1);
        assert!(questions[1].question.text().starts_with("Context paragraph: Some story."));
        assert!(questions[1].question.text().contains("Question: Why?"));
    }

    #[test]
    fn test_limit_caps_questions() {
        let (_dir, path) = dataset_file(&[GOOD, GOOD, GOOD]);

        let questions = DatasetLoader::new().with_limit(2).load(&path).unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn test_bad_json_reports_line() {
        let (_dir, path) = dataset_file(&[GOOD, "not json"]);

        let err = DatasetLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_wrong_choice_count() {
        let (_dir, path) =
            dataset_file(&[r#"{"question": "Pick.", "choices": ["a", "b"], "label": 0}"#]);

        let err = DatasetLoader::new().load(&path).unwrap_err();
        assert!(err.to_string().contains("expected 4 choices"));
    }

    #[test]
    fn test_label_out_of_range() {
        let (_dir, path) = dataset_file(&[
            r#"{"question": "Pick.", "choices": ["a", "b", "c", "d"], "label": 4}"#,
        ]);

        let err = DatasetLoader::new().load(&path).unwrap_err();
        assert!(err.to_string().contains("valid range"));
    }

    #[test]
    fn test_missing_file() {
        let err = DatasetLoader::new().load("/nonexistent/q.jsonl").unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
