use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{error, info};

use crate::bmp::{self, EncodeError};
use crate::cifar::{Batch, Dataset, DecodeError, DEFAULT_DATA_DIR};
use crate::Compat;

// Everything needed to turn one batch file into a directory of bitmaps
#[derive(Clone, Debug)]
pub struct Options {
    pub data_dir: PathBuf,
    pub dataset: Dataset,
    pub output_dir: PathBuf,
    // First record to convert
    pub start: usize,
    // Number of records to convert, or everything from `start` to the end of the batch
    pub count: Option<usize>,
    pub compat: Compat,
    pub parallel: bool,
    // Where to write the index,label,file manifest, if anywhere
    pub labels: Option<PathBuf>,
    pub create_output_dir: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            dataset: Dataset::Test,
            output_dir: PathBuf::from("files"),
            start: 0,
            count: None,
            compat: Compat::Corrected,
            parallel: false,
            labels: None,
            create_output_dir: false,
        }
    }
}

// Errors that stop the whole run
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("output directory {} does not exist", .0.display())]
    MissingOutputDir(PathBuf),
    #[error("failed to create output directory {}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write label manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// Errors that only affect a single record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Converted {
    pub index: usize,
    pub label: u8,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct Summary {
    // Successful records, in index order
    pub converted: Vec<Converted>,
    // Failed records, in index order
    pub failed: Vec<(usize, RecordError)>,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// Load the selected batch and convert it according to `options`
pub fn run(options: &Options) -> Result<Summary, ConvertError> {
    let path = options.dataset.path(&options.data_dir, options.compat);
    let batch = Batch::open(&path)?;
    info!(
        path = %path.display(),
        records = batch.len(),
        "loaded batch"
    );
    convert_batch(&batch, options)
}

// Convert the records of an already loaded batch
pub fn convert_batch(batch: &Batch, options: &Options) -> Result<Summary, ConvertError> {
    prepare_output_dir(&options.output_dir, options.create_output_dir)?;

    let count = options
        .count
        .unwrap_or_else(|| batch.len().saturating_sub(options.start));
    // Indices past usize::MAX can't name a record, so the range stops there
    let indices = options.start..options.start.saturating_add(count);

    // Records are independent, so each rayon task decodes into its own grids
    let results: Vec<(usize, Result<Converted, RecordError>)> = if options.parallel {
        indices
            .into_par_iter()
            .map(|index| (index, convert_record(batch, index, options)))
            .collect()
    } else {
        indices
            .map(|index| (index, convert_record(batch, index, options)))
            .collect()
    };

    let mut summary = Summary::default();
    for (index, result) in results {
        match result {
            Ok(converted) => summary.converted.push(converted),
            Err(e) => {
                error!(index, error = %e, "failed to convert record");
                summary.failed.push((index, e));
            }
        }
    }

    if let Some(labels) = &options.labels {
        write_manifest(labels, &summary.converted).map_err(|source| ConvertError::Manifest {
            path: labels.clone(),
            source,
        })?;
        info!(path = %labels.display(), "wrote label manifest");
    }

    Ok(summary)
}

// Decode one record and write it out as `<index>.bmp`
pub fn convert_record(
    batch: &Batch,
    index: usize,
    options: &Options,
) -> Result<Converted, RecordError> {
    let record = batch.record(index, options.compat)?;
    let path = bmp::write(&options.output_dir, &index.to_string(), &record.channels)?;
    info!(index, label = record.label, "converted record");
    Ok(Converted {
        index,
        label: record.label,
        path,
    })
}

fn prepare_output_dir(dir: &Path, create: bool) -> Result<(), ConvertError> {
    if dir.is_dir() {
        return Ok(());
    }
    if !create {
        return Err(ConvertError::MissingOutputDir(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(|source| ConvertError::CreateOutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_manifest(path: &Path, converted: &[Converted]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["index", "label", "file"])?;
    for record in converted {
        let file = record
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        writer.write_record([record.index.to_string(), record.label.to_string(), file])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RECORD_SIZE;

    fn batch_with_labels(labels: &[u8]) -> Batch {
        let mut bytes = vec![0u8; labels.len() * RECORD_SIZE];
        for (i, &label) in labels.iter().enumerate() {
            bytes[i * RECORD_SIZE] = label;
        }
        Batch::from_bytes(bytes)
    }

    fn options_for(dir: &Path) -> Options {
        Options {
            output_dir: dir.to_path_buf(),
            ..Options::default()
        }
    }

    #[test]
    fn converts_every_record_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with_labels(&[4, 2, 9]);
        let summary = convert_batch(&batch, &options_for(dir.path())).unwrap();

        assert!(summary.is_success());
        let labels: Vec<_> = summary.converted.iter().map(|c| c.label).collect();
        assert_eq!(labels, [4, 2, 9]);
        for index in 0..3 {
            assert!(dir.path().join(format!("{index}.bmp")).is_file());
        }
    }

    #[test]
    fn start_and_count_select_a_range() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with_labels(&[0, 1, 2, 3]);
        let options = Options {
            start: 1,
            count: Some(2),
            ..options_for(dir.path())
        };
        let summary = convert_batch(&batch, &options).unwrap();
        let indices: Vec<_> = summary.converted.iter().map(|c| c.index).collect();
        assert_eq!(indices, [1, 2]);
        assert!(!dir.path().join("0.bmp").exists());
        assert!(!dir.path().join("3.bmp").exists());
    }

    #[test]
    fn records_past_the_end_fail_individually() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with_labels(&[5, 6]);
        let options = Options {
            count: Some(4),
            ..options_for(dir.path())
        };
        let summary = convert_batch(&batch, &options).unwrap();

        assert_eq!(summary.converted.len(), 2);
        let failed: Vec<_> = summary.failed.iter().map(|(i, _)| *i).collect();
        assert_eq!(failed, [2, 3]);
        assert!(matches!(
            summary.failed[0].1,
            RecordError::Decode(DecodeError::TruncatedInput { index: 2, .. })
        ));
    }

    #[test]
    fn range_near_usize_max_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with_labels(&[1]);

        let options = Options {
            start: usize::MAX - 1,
            count: Some(2),
            ..options_for(dir.path())
        };
        let summary = convert_batch(&batch, &options).unwrap();
        assert!(summary.converted.is_empty());
        let failed: Vec<_> = summary.failed.iter().map(|(i, _)| *i).collect();
        assert_eq!(failed, [usize::MAX - 1]);

        let options = Options {
            start: usize::MAX,
            count: Some(2),
            ..options_for(dir.path())
        };
        let summary = convert_batch(&batch, &options).unwrap();
        assert!(summary.converted.is_empty());
        assert!(summary.failed.is_empty());
    }

    #[test]
    fn missing_output_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let batch = batch_with_labels(&[1]);
        let options = options_for(&dir.path().join("files"));
        assert!(matches!(
            convert_batch(&batch, &options),
            Err(ConvertError::MissingOutputDir(_))
        ));
    }

    #[test]
    fn output_dir_can_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("files");
        let batch = batch_with_labels(&[1]);
        let options = Options {
            create_output_dir: true,
            ..options_for(&output)
        };
        convert_batch(&batch, &options).unwrap();
        assert!(output.join("0.bmp").is_file());
    }

    #[test]
    fn missing_dataset_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let options = Options {
            data_dir: dir.path().join("cifar-10-batches-bin"),
            ..options_for(dir.path())
        };
        assert!(matches!(
            run(&options),
            Err(ConvertError::Decode(DecodeError::InputOpen { .. }))
        ));
    }
}
