use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::models::AssessmentRecord;

/// Append-only CSV table of completed assessments. Rows are never updated or
/// deleted.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Appends one row, writing the header first when the table is new.
    /// A zero-length file counts as new.
    pub fn append(&self, record: &AssessmentRecord) -> anyhow::Result<()> {
        let write_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        tracing::debug!(path = %self.path.display(), "appended assessment row");
        Ok(())
    }

    /// All rows recorded by the given teacher, optionally narrowed by a
    /// case-insensitive substring match on the student email. An empty
    /// filter means no narrowing. A missing table reads as zero rows.
    pub fn query_by_owner(
        &self,
        teacher_email: &str,
        student_filter: &str,
    ) -> anyhow::Result<Vec<AssessmentRecord>> {
        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(err) if is_not_found(&err) => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };

        let filter = student_filter.trim().to_lowercase();
        let mut rows = Vec::new();
        for result in reader.deserialize::<AssessmentRecord>() {
            let record =
                result.with_context(|| format!("malformed row in {}", self.path.display()))?;
            if record.teacher_email != teacher_email {
                continue;
            }
            if !filter.is_empty() && !record.student_email.to_lowercase().contains(&filter) {
                continue;
            }
            rows.push(record);
        }
        Ok(rows)
    }
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, Rating};
    use tempfile::TempDir;

    fn sample_record(teacher: &str, student_email: &str) -> AssessmentRecord {
        AssessmentRecord {
            teacher_email: teacher.to_string(),
            student_name: "Avery Lee".to_string(),
            student_email: student_email.to_string(),
            date: "2026-02-02 10:30".to_string(),
            vocabulary: Rating::Satisfactory,
            fluency: Rating::Satisfactory,
            accuracy: Rating::Restricted,
            pronunciation: Rating::Satisfactory,
            communication: Rating::Advanced,
            total: 10,
            level: Level::A2,
            comment: String::new(),
        }
    }

    #[test]
    fn append_then_query_round_trips_every_field() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("avaliacoes.csv"));

        let mut record = sample_record("tutor@fluencypass.com", "avery@example.com");
        record.comment = "Great progress, some hesitation left".to_string();
        store.append(&record).unwrap();

        let rows = store.query_by_owner("tutor@fluencypass.com", "").unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.student_name, "Avery Lee");
        assert_eq!(row.date, "2026-02-02 10:30");
        assert_eq!(row.vocabulary, Rating::Satisfactory);
        assert_eq!(row.accuracy, Rating::Restricted);
        assert_eq!(row.communication, Rating::Advanced);
        assert_eq!(row.total, 10);
        assert_eq!(row.level, Level::A2);
        assert_eq!(row.comment, "Great progress, some hesitation left");
    }

    #[test]
    fn empty_comment_survives_the_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("avaliacoes.csv"));
        store
            .append(&sample_record("tutor@fluencypass.com", "avery@example.com"))
            .unwrap();

        let rows = store.query_by_owner("tutor@fluencypass.com", "").unwrap();
        assert_eq!(rows[0].comment, "");
    }

    #[test]
    fn missing_store_reads_as_zero_rows_repeatedly() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("avaliacoes.csv"));
        for _ in 0..3 {
            assert!(store.query_by_owner("tutor@fluencypass.com", "").unwrap().is_empty());
        }
        assert!(!store.exists());
    }

    #[test]
    fn header_is_written_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("avaliacoes.csv");
        let store = RecordStore::new(&path);
        store
            .append(&sample_record("tutor@fluencypass.com", "a@example.com"))
            .unwrap();
        store
            .append(&sample_record("tutor@fluencypass.com", "b@example.com"))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let headers = contents
            .lines()
            .filter(|line| line.starts_with("Teacher Email"))
            .count();
        assert_eq!(headers, 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn query_is_scoped_to_the_owner() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("avaliacoes.csv"));
        store
            .append(&sample_record("tutor@fluencypass.com", "a@example.com"))
            .unwrap();
        store
            .append(&sample_record("other@fluencypass.com", "b@example.com"))
            .unwrap();

        let rows = store.query_by_owner("tutor@fluencypass.com", "").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_email, "a@example.com");
    }

    #[test]
    fn student_filter_is_a_case_insensitive_substring() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("avaliacoes.csv"));
        store
            .append(&sample_record("tutor@fluencypass.com", "John@example.com"))
            .unwrap();
        store
            .append(&sample_record("tutor@fluencypass.com", "kiara@example.com"))
            .unwrap();

        let rows = store.query_by_owner("tutor@fluencypass.com", "jo").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_email, "John@example.com");

        let all = store.query_by_owner("tutor@fluencypass.com", "").unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn zero_length_file_is_treated_as_a_new_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("avaliacoes.csv");
        std::fs::write(&path, "").unwrap();

        let store = RecordStore::new(&path);
        store
            .append(&sample_record("tutor@fluencypass.com", "a@example.com"))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Teacher Email,"));
    }
}
