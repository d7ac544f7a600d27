//! Locating the plan document that covers a week.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use super::PlanError;

const DOCUMENT_PREFIX: &str = "block_";
const DOCUMENT_EXTENSION: &str = "md";

/// A plan document read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
  pub name: String,
  pub text: String,
}

impl PlanDocument {
  pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      text: text.into(),
    }
  }

  /// Every week number referenced as `Week <n>` anywhere in the text
  pub fn referenced_weeks(&self) -> Vec<u32> {
    week_reference()
      .captures_iter(&self.text)
      .filter_map(|caps| caps[1].parse().ok())
      .collect()
  }
}

fn week_reference() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"Week\s+(\d+)").expect("valid week reference regex"))
}

/// Find the first document, by name, that references the given week.
pub fn find_document(week: u32, documents: &[PlanDocument]) -> Result<&PlanDocument, PlanError> {
  let mut ordered: Vec<&PlanDocument> = documents.iter().collect();
  ordered.sort_by(|a, b| a.name.cmp(&b.name));

  ordered
    .into_iter()
    .find(|doc| doc.referenced_weeks().contains(&week))
    .ok_or(PlanError::DocumentNotFound { week })
}

/// Read every `block_*.md` document in a directory, sorted by file name.
pub fn load_plan_documents(dir: &Path) -> Result<Vec<PlanDocument>, PlanError> {
  let entries = fs::read_dir(dir).map_err(|source| PlanError::Io {
    path: dir.to_path_buf(),
    source,
  })?;

  let mut documents = Vec::new();
  for entry in entries {
    let path = entry
      .map_err(|source| PlanError::Io {
        path: dir.to_path_buf(),
        source,
      })?
      .path();

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
      continue;
    };
    let is_plan = name.starts_with(DOCUMENT_PREFIX)
      && path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION);
    if !is_plan {
      continue;
    }

    let text = fs::read_to_string(&path).map_err(|source| PlanError::Io {
      path: path.clone(),
      source,
    })?;
    debug!(document = name, bytes = text.len(), "loaded plan document");
    documents.push(PlanDocument::new(name, text));
  }

  documents.sort_by(|a, b| a.name.cmp(&b.name));
  Ok(documents)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_finds_document_by_week_reference() {
    let docs = vec![
      PlanDocument::new("block_2.md", "## Week 5 (Mar 9 – 15)\n## Week 6 (Mar 16 – 22)"),
      PlanDocument::new("block_1.md", "## Week 1 (Feb 9 – 15)\nSee Week  4 for the test."),
    ];

    assert_eq!(find_document(1, &docs).unwrap().name, "block_1.md");
    assert_eq!(find_document(4, &docs).unwrap().name, "block_1.md");
    assert_eq!(find_document(6, &docs).unwrap().name, "block_2.md");
  }

  #[test]
  fn test_first_document_by_name_wins() {
    let docs = vec![
      PlanDocument::new("block_b.md", "Week 3"),
      PlanDocument::new("block_a.md", "Recap of Week 3"),
    ];
    assert_eq!(find_document(3, &docs).unwrap().name, "block_a.md");
  }

  #[test]
  fn test_missing_week_is_not_found() {
    let docs = vec![PlanDocument::new("block_1.md", "## Week 1\n## Week 12")];
    assert!(matches!(
      find_document(2, &docs),
      Err(PlanError::DocumentNotFound { week: 2 })
    ));
    assert!(matches!(
      find_document(1, &[]),
      Err(PlanError::DocumentNotFound { week: 1 })
    ));
  }

  #[test]
  fn test_load_plan_documents_filters_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("block_2.md"), "## Week 5").unwrap();
    fs::write(dir.path().join("block_1.md"), "## Week 1").unwrap();
    fs::write(dir.path().join("notes.md"), "## Week 1").unwrap();
    fs::write(dir.path().join("block_3.txt"), "## Week 9").unwrap();

    let docs = load_plan_documents(dir.path()).unwrap();
    let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["block_1.md", "block_2.md"]);
    assert_eq!(docs[1].text, "## Week 5");
  }

  #[test]
  fn test_load_plan_documents_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_plan_documents(&dir.path().join("nope"));
    assert!(matches!(result, Err(PlanError::Io { .. })));
  }
}
