//! Listing-file serialization.
//!
//! Renders one bucket to one UTF-8 text file named `{file_name}.txt` under
//! the channel's output directory, rewriting the file in full on every run.
//! Records are sorted by `(date, hour)` before writing; a bare date line is
//! emitted only when the date changes, so consecutive same-day records share
//! one header.
//!
//! The output format uses `---` as its field delimiter, so source text is
//! cleaned before serialization: the caller-supplied replacement table is
//! applied to title and content, runs of two or more hyphens collapse to
//! one, edge hyphens are stripped, and titles are capped at 120 characters.

use std::error::Error;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::fs;
use tracing::info;

use crate::core::aggregator::Bucket;

static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid regex"));

const TITLE_MAX_CHARS: usize = 120;

/// Clean one free-text field for serialization: apply the replacement table,
/// collapse hyphen runs, and strip edge hyphens.
fn clean_field(raw: &str, replacements: &[(String, String)]) -> String {
    let mut text = raw.trim().to_string();
    for (from, to) in replacements {
        text = text.replace(from.as_str(), to.as_str());
    }
    let text = HYPHEN_RUN.replace_all(&text, "-");
    text.trim_matches('-').to_string()
}

fn truncate_title(title: &str) -> String {
    title.chars().take(TITLE_MAX_CHARS).collect()
}

/// Render a bucket's records to the fixed listing format.
fn render(bucket: &Bucket, replacements: &[(String, String)]) -> String {
    let mut output = String::new();
    let mut current_date: Option<&str> = None;

    for record in bucket.sorted_records() {
        let title = truncate_title(&clean_field(&record.title, replacements));
        let content = clean_field(&record.content, replacements);

        if current_date != Some(record.date.as_str()) {
            current_date = Some(record.date.as_str());
            output.push_str(&record.date);
            output.push('\n');
        }

        output.push_str(&format!(
            "{}---{}---{}---USA|TV-PG---SIBA_TIPO|UNICO--- --- --- --- --- ---SIN_CTI|{}--- --- --- ---\n",
            record.hour, title, content, content
        ));
    }

    output
}

/// Write one bucket to `{output_dir}/{file_name}.txt`, truncating any
/// previous run's file.
///
/// The caller decides what a write failure means; the orchestrator logs it
/// and keeps processing the remaining buckets.
pub async fn save_bucket(
    file_name: &str,
    bucket: &Bucket,
    replacements: &[(String, String)],
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join(format!("{file_name}.txt"));
    fs::write(&path, render(bucket, replacements)).await?;
    info!(path = %path.display(), records = bucket.sorted_records().len(), "Wrote listing file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgramRecord;

    fn record(date: &str, hour: &str, title: &str, content: &str) -> ProgramRecord {
        ProgramRecord {
            date: date.to_string(),
            hour: hour.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn bucket(records: Vec<ProgramRecord>) -> Bucket {
        let mut bucket = Bucket::default();
        bucket.append(records);
        bucket
    }

    fn no_replacements() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_date_header_written_only_on_change() {
        let bucket = bucket(vec![
            record("2025-03-01", "08:00", "A", "x"),
            record("2025-03-01", "09:00", "B", "x"),
            record("2025-03-02", "08:00", "C", "x"),
        ]);
        let output = render(&bucket, &no_replacements());
        let headers: Vec<&str> = output
            .lines()
            .filter(|line| !line.contains("---"))
            .collect();
        assert_eq!(headers, vec!["2025-03-01", "2025-03-02"]);
    }

    #[test]
    fn test_records_are_sorted_before_writing() {
        let bucket = bucket(vec![
            record("2025-03-02", "08:00", "Later", "x"),
            record("2025-03-01", "21:00", "Evening", "x"),
            record("2025-03-01", "09:00", "Morning", "x"),
        ]);
        let output = render(&bucket, &no_replacements());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "2025-03-01");
        assert!(lines[1].starts_with("09:00---Morning"));
        assert!(lines[2].starts_with("21:00---Evening"));
        assert_eq!(lines[3], "2025-03-02");
        assert!(lines[4].starts_with("08:00---Later"));
    }

    #[test]
    fn test_record_line_shape() {
        let bucket = bucket(vec![record("2025-01-10", "20:00", "Show", "D")]);
        let output = render(&bucket, &no_replacements());
        assert_eq!(
            output,
            "2025-01-10\n20:00---Show---D---USA|TV-PG---SIBA_TIPO|UNICO--- --- --- --- --- ---SIN_CTI|D--- --- --- ---\n"
        );
    }

    #[test]
    fn test_title_truncated_to_120_characters() {
        let long_title = "A".repeat(150);
        let bucket = bucket(vec![record("2025-03-01", "14:00", &long_title, "d")]);
        let output = render(&bucket, &no_replacements());
        let title_field = output.lines().nth(1).unwrap().split("---").nth(1).unwrap();
        assert_eq!(title_field.chars().count(), 120);
        assert_eq!(title_field, "A".repeat(120));
    }

    #[test]
    fn test_truncation_never_splits_a_character() {
        let long_title = "Ñ".repeat(150);
        let bucket = bucket(vec![record("2025-03-01", "14:00", &long_title, "d")]);
        let output = render(&bucket, &no_replacements());
        let title_field = output.lines().nth(1).unwrap().split("---").nth(1).unwrap();
        assert_eq!(title_field.chars().count(), 120);
    }

    #[test]
    fn test_hyphen_runs_collapse_and_edges_strip() {
        let bucket = bucket(vec![record(
            "2025-03-01",
            "14:00",
            "--The Big--Match--",
            "part one -- part two",
        )]);
        let output = render(&bucket, &no_replacements());
        let line = output.lines().nth(1).unwrap();
        let fields: Vec<&str> = line.split("---").collect();
        assert_eq!(fields[1], "The Big-Match");
        assert_eq!(fields[2], "part one - part two");
    }

    #[test]
    fn test_replacement_table_applied_before_delimiting() {
        let replacements = vec![
            ("&".to_string(), "en".to_string()),
            ("\n".to_string(), " ".to_string()),
        ];
        let bucket = bucket(vec![record(
            "2025-03-01",
            "14:00",
            "Tom & Jerry",
            "line one\nline two",
        )]);
        let output = render(&bucket, &replacements);
        let line = output.lines().nth(1).unwrap();
        assert!(line.contains("Tom en Jerry"));
        assert!(line.contains("line one line two"));
    }

    #[tokio::test]
    async fn test_save_bucket_rewrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let first = bucket(vec![record("2025-03-01", "14:00", "Old", "d")]);
        let path = save_bucket("Chan", &first, &no_replacements(), out)
            .await
            .unwrap();
        let second = bucket(vec![record("2025-03-02", "09:00", "New", "d")]);
        save_bucket("Chan", &second, &no_replacements(), out)
            .await
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("New"));
        assert!(!written.contains("Old"));
        assert_eq!(path.file_name().unwrap(), "Chan.txt");
    }
}
