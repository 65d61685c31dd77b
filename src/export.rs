//! CSV export of aggregate views.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::types::DataSet;

/// Write `dataset` to `path` as comma-delimited CSV with a header row.
///
/// Values use their default string conversion ([`crate::types::Value`]'s `Display`); nulls are
/// written as empty fields. Fields are quoted only when they contain a delimiter, a quote or a
/// line break. An existing file at `path` is overwritten.
pub fn write_csv(dataset: &DataSet, path: impl AsRef<Path>) -> PipelineResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| PipelineError::file_access(path, e))?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush().map_err(|e| PipelineError::file_access(path, e))?;

    debug!(path = %path.display(), rows = dataset.row_count(), "wrote csv");
    Ok(())
}

/// Write `dataset` to `<output_dir>/<name>.csv` and return the written path.
///
/// `output_dir` must already exist and be a directory; it is never created.
pub fn export_view(dataset: &DataSet, output_dir: impl AsRef<Path>, name: &str) -> PipelineResult<PathBuf> {
    let output_dir = output_dir.as_ref();
    ensure_output_dir(output_dir)?;
    let path = output_dir.join(format!("{name}.csv"));
    write_csv(dataset, &path)?;
    Ok(path)
}

/// Fails with [`PipelineError::FileAccess`] unless `dir` exists, is a directory and is not
/// read-only.
pub fn ensure_output_dir(dir: &Path) -> PipelineResult<()> {
    let meta = fs::metadata(dir).map_err(|e| PipelineError::file_access(dir, e))?;
    if !meta.is_dir() {
        return Err(PipelineError::file_access(
            dir,
            io::Error::new(io::ErrorKind::NotADirectory, "output path is not a directory"),
        ));
    }
    if meta.permissions().readonly() {
        return Err(PipelineError::file_access(
            dir,
            io::Error::new(io::ErrorKind::PermissionDenied, "output directory is read-only"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_output_dir, export_view};
    use crate::error::ErrorKind;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn by_type() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("TransactionType", DataType::Utf8),
                Field::new("n_transactions", DataType::Int64),
                Field::new("avg_amount", DataType::Float64),
            ]),
            vec![
                vec![Value::Utf8("deposit".to_string()), Value::Int64(2), Value::Float64(150.0)],
                vec![Value::Utf8("fee, monthly".to_string()), Value::Int64(1), Value::Null],
            ],
        )
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_view(&by_type(), dir.path(), "by_type").unwrap();

        assert_eq!(path, dir.path().join("by_type.csv"));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "TransactionType,n_transactions,avg_amount\ndeposit,2,150\n\"fee, monthly\",1,\n"
        );
    }

    #[test]
    fn missing_output_dir_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = export_view(&by_type(), &missing, "by_type").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileAccess);
        assert!(!missing.exists());
    }

    #[test]
    fn file_in_place_of_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let err = ensure_output_dir(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileAccess);
    }

    #[cfg(unix)]
    #[test]
    fn read_only_output_dir_is_rejected() {
        use std::fs::{self, Permissions};
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, Permissions::from_mode(0o555)).unwrap();

        let result = export_view(&by_type(), &locked, "by_type");
        fs::set_permissions(&locked, Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileAccess);
        assert!(err.to_string().contains("read-only"), "{err}");
        assert!(!locked.join("by_type.csv").exists());
    }
}
