use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::mem::take;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::record::{yes_no, AssessmentRecord, TestType, FIELDS};

/// Outcome of one export. Each format succeeds or fails on its own.
#[derive(Debug)]
pub struct ExportReport {
    pub csv: Result<PathBuf>,
    pub json: Result<PathBuf>,
}

impl ExportReport {
    pub fn all_failed(&self) -> bool {
        self.csv.is_err() && self.json.is_err()
    }
}

pub fn export(records: &[AssessmentRecord], csv_path: &Path, json_path: &Path) -> ExportReport {
    ExportReport {
        csv: write_csv(records, csv_path).map(|_| csv_path.to_path_buf()),
        json: write_json(records, json_path).map(|_| json_path.to_path_buf()),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

// ── CSV ──

fn csv_row(record: &AssessmentRecord) -> Vec<String> {
    vec![
        record.name.clone(),
        record.url.clone(),
        record.description.clone(),
        record.duration.to_string(),
        record.test_type_joined(),
        yes_no::label(record.adaptive_support).to_string(),
        yes_no::label(record.remote_support).to_string(),
    ]
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

pub fn write_csv(records: &[AssessmentRecord], path: &Path) -> Result<()> {
    let mut w = create(path)?;
    let header: Vec<String> = FIELDS.iter().map(|f| f.to_string()).collect();
    write_row(&mut w, &header)?;
    for record in records {
        write_row(&mut w, &csv_row(record))?;
    }
    w.flush()?;
    Ok(())
}

/// Minimal CSV parser (quotes + CRLF tolerant).
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if matches!(chars.peek(), Some('"')) {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

fn parse_flag(cell: &str) -> Result<bool> {
    match cell {
        "Yes" => Ok(true),
        "No" => Ok(false),
        other => bail!("expected Yes/No, got {:?}", other),
    }
}

fn record_from_row(row: &[String]) -> Result<AssessmentRecord> {
    if row.len() != FIELDS.len() {
        bail!("expected {} columns, got {}", FIELDS.len(), row.len());
    }
    let test_type = row[4]
        .split(", ")
        .map(|label| TestType::parse(label).with_context(|| format!("unknown test type {:?}", label)))
        .collect::<Result<Vec<_>>>()?;
    Ok(AssessmentRecord {
        name: row[0].clone(),
        url: row[1].clone(),
        description: row[2].clone(),
        duration: row[3].parse().with_context(|| format!("bad duration {:?}", row[3]))?,
        test_type,
        adaptive_support: parse_flag(&row[5])?,
        remote_support: parse_flag(&row[6])?,
    })
}

pub fn read_csv(path: &Path) -> Result<Vec<AssessmentRecord>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut rows = parse_rows(&text).into_iter();
    match rows.next() {
        Some(header) if header == FIELDS => {}
        _ => bail!("{} has no record header", path.display()),
    }
    rows.enumerate()
        .map(|(i, row)| record_from_row(&row).with_context(|| format!("row {}", i + 1)))
        .collect()
}

// ── JSON ──

pub fn write_json(records: &[AssessmentRecord], path: &Path) -> Result<()> {
    let mut w = create(path)?;
    serde_json::to_writer_pretty(&mut w, records)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Vec<AssessmentRecord>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth;

    fn records() -> Vec<AssessmentRecord> {
        let mut out = vec![AssessmentRecord {
            name: "Évaluation \"Verbal\", niveau 2".into(),
            url: "https://example.com/view/évaluation/".into(),
            description: "Line one\nline two, with comma".into(),
            duration: 45,
            test_type: vec![TestType::Cognitive, TestType::Personality, TestType::Knowledge],
            adaptive_support: true,
            remote_support: true,
        }];
        out.extend(synth::augment(&[], 5));
        out
    }

    #[test]
    fn csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&records(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(
            first_line,
            "name,url,description,duration,test_type,adaptive_support,remote_support"
        );
        assert!(text.contains("\"Cognitive, Personality, Knowledge\",Yes,Yes"));
        assert!(text.contains("\"Évaluation \"\"Verbal\"\", niveau 2\""));
    }

    #[test]
    fn csv_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let original = records();
        write_csv(&original, &path).unwrap();

        let rows = parse_rows(&fs::read_to_string(&path).unwrap());
        assert_eq!(rows.len(), original.len() + 1);
        assert_eq!(rows[1][4].split(", ").collect::<Vec<_>>(), vec!["Cognitive", "Personality", "Knowledge"]);
        assert_eq!(read_csv(&path).unwrap(), original);
    }

    #[test]
    fn json_reads_back_with_native_label_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        let original = records();
        write_json(&original, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Évaluation"), "non-ASCII kept literally");
        assert!(text.contains("\n  {\n    \"name\""), "indented");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["test_type"], serde_json::json!(["Cognitive", "Personality", "Knowledge"]));
        assert_eq!(value[0]["adaptive_support"], "Yes");

        assert_eq!(read_json(&path).unwrap(), original);
    }

    #[test]
    fn one_failed_write_does_not_stop_the_other() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let csv_path = blocker.join("out.csv");
        let json_path = dir.path().join("out.json");
        let report = export(&records(), &csv_path, &json_path);

        assert!(report.csv.is_err());
        assert_eq!(report.json.as_ref().unwrap(), &json_path);
        assert!(!report.all_failed());
        assert_eq!(read_json(&json_path).unwrap().len(), 6);
    }

    #[test]
    fn empty_collection_still_writes_header_and_array() {
        let dir = tempfile::tempdir().unwrap();
        let report = export(&[], &dir.path().join("a.csv"), &dir.path().join("a.json"));
        assert!(report.csv.is_ok() && report.json.is_ok());
        assert!(read_csv(&dir.path().join("a.csv")).unwrap().is_empty());
        assert!(read_json(&dir.path().join("a.json")).unwrap().is_empty());
    }

    #[test]
    fn parse_rows_handles_crlf_and_quotes() {
        let rows = parse_rows("a,\"b,c\"\r\n\"d\"\"e\",f\n");
        assert_eq!(rows, vec![vec!["a", "b,c"], vec!["d\"e", "f"]]);
    }
}
