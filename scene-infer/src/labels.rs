//! Scene class label tables.
//!
//! Label files are AudioSet-style CSVs (`index,mid,display_name` with an
//! optional localized fourth column). The header row is skipped and commas
//! inside double quotes do not split fields.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Label files probed when no explicit path is given, in priority order.
const CANDIDATE_FILES: [&str; 2] = ["labels_zh.csv", "labels.csv"];

/// Maps class indices to display names.
#[derive(Debug)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Load a label CSV file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read label file {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Probe the candidate label files in `dir`, returning the first one
    /// that loads. Reports every attempted file on failure.
    pub fn load_default(dir: &Path) -> Result<Self> {
        let mut errors = Vec::new();
        for name in CANDIDATE_FILES {
            match Self::load(dir.join(name)) {
                Ok(table) => return Ok(table),
                Err(err) => errors.push(format!("{}: {:#}", name, err)),
            }
        }
        bail!(
            "no label file found in {}: {}",
            dir.display(),
            errors.join("; ")
        )
    }

    fn parse(content: &str) -> Self {
        let labels = content
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(display_name)
            .collect();
        Self { labels }
    }

    /// Display name for a class index. Out-of-range indices resolve to a
    /// synthetic placeholder so ranking never fails on a shorter table.
    pub fn get(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("class #{}", index))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Pick the display name out of a CSV row: the localized fourth column when
/// present and non-blank, else the third, else the second, else the row
/// itself.
fn display_name(line: &str) -> String {
    let tokens = split_csv_line(line);
    let field = |i: usize| tokens[i].trim().trim_matches('"').to_string();
    if tokens.len() >= 4 && !tokens[3].trim().is_empty() {
        field(3)
    } else if tokens.len() >= 3 {
        field(2)
    } else if tokens.len() >= 2 {
        field(1)
    } else {
        line.trim().to_string()
    }
}

/// Split on commas that sit outside double quotes.
fn split_csv_line(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b',' if !in_quotes => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_name_column() {
        let table = LabelTable::parse("index,mid,display_name\n0,/m/09x0r,Speech\n1,/m/05zppz,\"Male speech, man speaking\"\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0), "Speech");
        assert_eq!(table.get(1), "Male speech, man speaking");
    }

    #[test]
    fn prefers_localized_fourth_column() {
        let table = LabelTable::parse("index,mid,display_name,localized\n0,/m/09x0r,Speech,Sprache\n1,/m/02zsn,Female speech,\n");
        assert_eq!(table.get(0), "Sprache");
        // Blank fourth column falls back to the third.
        assert_eq!(table.get(1), "Female speech");
    }

    #[test]
    fn short_rows_fall_back() {
        let table = LabelTable::parse("header\n0,Dog\nBird\n");
        assert_eq!(table.get(0), "Dog");
        assert_eq!(table.get(1), "Bird");
    }

    #[test]
    fn skips_blank_lines() {
        let table = LabelTable::parse("header\n\n0,/m/0jbk,Animal\n   \n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), "Animal");
    }

    #[test]
    fn out_of_range_index_gets_placeholder() {
        let table = LabelTable::from_labels(vec!["Speech".to_string()]);
        assert_eq!(table.get(5), "class #5");
    }

    #[test]
    fn quoted_commas_do_not_split() {
        let fields = split_csv_line("0,/m/05zppz,\"Male speech, man speaking\"");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[2], "\"Male speech, man speaking\"");
    }

    #[test]
    fn load_default_probes_candidates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("labels.csv"),
            "index,mid,display_name\n0,/m/09x0r,Speech\n",
        )
        .unwrap();

        let table = LabelTable::load_default(dir.path()).unwrap();
        assert_eq!(table.get(0), "Speech");
    }

    #[test]
    fn load_default_reports_all_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let err = LabelTable::load_default(dir.path()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("labels_zh.csv"));
        assert!(message.contains("labels.csv"));
    }
}
