//! Batch conversion
//!
//! Finds the files to convert and runs the engine over them one after the
//! other. A failing file is logged and counted; the batch always continues.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::convert::{ConversionEngine, ConversionError, ConversionJob};

/// Totals of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub files_processed: usize,
    pub files_with_errors: usize,
    pub total_errors: usize,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.files_with_errors == 0
    }
}

/// Convert every job in order.
pub fn run_batch(engine: &ConversionEngine, jobs: &[ConversionJob]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for job in jobs {
        let errors = engine.process_file(job);
        summary.files_processed += 1;
        summary.total_errors += errors;
        if errors > 0 {
            summary.files_with_errors += 1;
            error!("file not converted: {}, errors in file: {}", job.name(), errors);
        } else {
            debug!("file converted: {}", job.name());
        }
    }

    info!("number of files with errors: {}", summary.files_with_errors);
    info!("number of total errors: {}", summary.total_errors);
    summary
}

/// Build the jobs for a conversion run.
///
/// # Arguments
///
/// * `input_dir` - Folder holding the PDI files
/// * `output_dir` - Folder receiving the converted files
/// * `file_names` - Files to convert, relative to `input_dir`. When empty, every
///   file in `input_dir` with the source extension is converted, sorted by name.
/// * `source_extension` - Extension of PDI files, e.g. `ktr`
/// * `destination_extension` - Extension of converted files, e.g. `hpl`
///
/// # Returns
///
/// The jobs to run. Named files that are missing are logged and left out; an
/// unreadable input folder is an error.
pub fn discover_jobs(
    input_dir: &Path,
    output_dir: &Path,
    file_names: &[String],
    source_extension: &str,
    destination_extension: &str,
) -> Result<Vec<ConversionJob>, ConversionError> {
    let inputs: Vec<PathBuf> = if file_names.is_empty() {
        let entries = fs::read_dir(input_dir)
            .map_err(|e| ConversionError::ReadError(input_dir.to_path_buf(), e.to_string()))?;

        let mut inputs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file() && has_extension(path, source_extension))
            .collect();
        inputs.sort();
        info!("files to process: {}", inputs.len());
        inputs
    } else {
        file_names
            .iter()
            .map(|name| input_dir.join(name))
            .filter(|path| {
                let readable = path.is_file();
                if !readable {
                    warn!(
                        "file does not exist or cannot be read: {}",
                        path.display()
                    );
                }
                readable
            })
            .collect()
    };

    Ok(inputs
        .into_iter()
        .filter_map(|input| {
            let file_name = input.file_name()?.to_owned();
            let output = output_path_for(
                output_dir,
                Path::new(&file_name),
                source_extension,
                destination_extension,
            );
            Some(ConversionJob::new(input, output))
        })
        .collect())
}

/// Output path for an input file name: the source extension is replaced by the
/// destination extension, any other name gets the destination extension appended.
pub fn output_path_for(
    output_dir: &Path,
    file_name: &Path,
    source_extension: &str,
    destination_extension: &str,
) -> PathBuf {
    let file_name = if has_extension(file_name, source_extension) {
        file_name.with_extension(destination_extension)
    } else {
        PathBuf::from(format!(
            "{}.{}",
            file_name.display(),
            destination_extension
        ))
    };
    output_dir.join(file_name)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_for() {
        let out = Path::new("/out");
        assert_eq!(
            output_path_for(out, Path::new("load.ktr"), "ktr", "hpl"),
            PathBuf::from("/out/load.hpl")
        );
        assert_eq!(
            output_path_for(out, Path::new("load.KTR"), "ktr", "hpl"),
            PathBuf::from("/out/load.hpl")
        );
        assert_eq!(
            output_path_for(out, Path::new("notes.txt"), "ktr", "hpl"),
            PathBuf::from("/out/notes.txt.hpl")
        );
    }

    #[test]
    fn test_discover_folder_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["b.ktr", "a.ktr", "readme.md"] {
            fs::write(dir.path().join(name), "<transformation/>").unwrap();
        }
        fs::create_dir(dir.path().join("sub.ktr")).unwrap();

        let jobs = discover_jobs(dir.path(), Path::new("/out"), &[], "ktr", "hpl").unwrap();
        let names: Vec<String> = jobs.iter().map(ConversionJob::name).collect();
        assert_eq!(names, vec!["a.ktr", "b.ktr"]);
        assert_eq!(jobs[0].output, PathBuf::from("/out/a.hpl"));
    }

    #[test]
    fn test_discover_named_files_skips_missing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.ktr"), "<transformation/>").unwrap();

        let names = vec!["one.ktr".to_string(), "missing.ktr".to_string()];
        let jobs = discover_jobs(dir.path(), Path::new("/out"), &names, "ktr", "hpl").unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].input, dir.path().join("one.ktr"));
    }

    #[test]
    fn test_discover_missing_folder_is_error() {
        let dir = tempdir().unwrap();
        let result = discover_jobs(&dir.path().join("nope"), dir.path(), &[], "ktr", "hpl");
        assert!(matches!(result, Err(ConversionError::ReadError(..))));
    }
}
