//! Envelope and page artifact persistence.
//!
//! Writes go to a sibling `.tmp` file first and are renamed into place, so a failed run never
//! leaves a half-written envelope behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::types::{Dataset, Page};

use super::csv::write_records_csv;
use super::decode::decode;
use super::envelope::Envelope;

/// Path of the CSV artifact for `page` (`<dir>/<stem>_page<n>.csv`).
pub fn page_artifact_path(dir: impl AsRef<Path>, stem: &str, page: &Page) -> PathBuf {
    dir.as_ref().join(format!("{stem}_page{}.csv", page.number))
}

/// Write one CSV file per page into `dir`, creating the directory if needed.
///
/// Returns the written paths in page order.
pub fn write_page_artifacts(
    pages: &[Page],
    dir: impl AsRef<Path>,
    stem: &str,
) -> PipelineResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(pages.len());
    for page in pages {
        let path = page_artifact_path(dir, stem, page);
        write_atomic(&path, write_records_csv(&page.records)?.as_bytes())?;
        paths.push(path);
    }
    tracing::debug!(dir = %dir.display(), pages = paths.len(), "wrote page artifacts");
    Ok(paths)
}

/// Write the envelope as JSON to `path`.
pub fn write_envelope(envelope: &Envelope, path: impl AsRef<Path>) -> PipelineResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec(envelope)?;
    write_atomic(path, &json)?;
    tracing::debug!(path = %path.display(), pages = envelope.page_count(), "wrote envelope");
    Ok(())
}

/// Read an envelope JSON file.
///
/// A document without a `pages` array is reported as
/// [`crate::PipelineError::MalformedEnvelope`].
pub fn read_envelope(path: impl AsRef<Path>) -> PipelineResult<Envelope> {
    let text = fs::read_to_string(path)?;
    Envelope::from_json_str(&text)
}

/// Read an envelope JSON file, decode it and check the dataset invariants.
///
/// A decoded dataset with repeated or non-positive ids (e.g. an envelope that repeats a page) is
/// rejected with [`crate::PipelineError::InvalidConfiguration`].
pub fn read_dataset(path: impl AsRef<Path>) -> PipelineResult<Dataset> {
    let dataset = decode(read_envelope(path)?)?;
    dataset.validate()?;
    Ok(dataset)
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{read_envelope, write_envelope, write_page_artifacts};
    use crate::transport::{encode, paginate};
    use crate::types::{Dataset, Record};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("txn-pipeline-store-{nanos}"))
    }

    #[test]
    fn writes_one_artifact_per_page() {
        let dir = tmp_dir();
        let ds = Dataset::new((1..=5).map(|i| Record::new(i, "China", "pending", 9.0)).collect());
        let pages = paginate(&ds, 2).unwrap();

        let paths = write_page_artifacts(&pages, &dir, "transactions").unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[2].ends_with("transactions_page3.csv"));
        let last = std::fs::read_to_string(&paths[2]).unwrap();
        assert_eq!(last, "id,country,status,amount\n5,China,pending,9.0\n");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn envelope_file_round_trip() {
        let dir = tmp_dir();
        let path = dir.join("transactions.json");
        let ds = Dataset::new(vec![Record::new(1, "Belgium", "completed", 3.5)]);
        let env = encode(&paginate(&ds, 10).unwrap()).unwrap();

        write_envelope(&env, &path).unwrap();
        assert!(!dir.join("transactions.json.tmp").exists());
        assert_eq!(read_envelope(&path).unwrap(), env);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_envelope_is_io_error() {
        let err = read_envelope(tmp_dir().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("io error"));
    }
}
