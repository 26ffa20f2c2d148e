use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::DecodeError;
use crate::Compat;

// Directory the batch files live in when unpacked from the official archive
pub const DEFAULT_DATA_DIR: &str = "cifar-10-batches-bin";

/// One of the six batch files of the binary CIFAR-10 distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dataset {
    Train1,
    Train2,
    Train3,
    Train4,
    Train5,
    Test,
}

impl Dataset {
    pub const ALL: [Dataset; 6] = [
        Dataset::Train1,
        Dataset::Train2,
        Dataset::Train3,
        Dataset::Train4,
        Dataset::Train5,
        Dataset::Test,
    ];

    // The selector character used on the command line
    pub fn selector(self) -> char {
        match self {
            Dataset::Train1 => '1',
            Dataset::Train2 => '2',
            Dataset::Train3 => '3',
            Dataset::Train4 => '4',
            Dataset::Train5 => '5',
            Dataset::Test => 't',
        }
    }

    pub fn file_name(self, compat: Compat) -> String {
        match self {
            // The old converter read batch 4 twice and never touched batch 5
            Dataset::Train5 if compat == Compat::Legacy => "data_batch_4.bin".to_string(),
            Dataset::Test => "test_batch.bin".to_string(),
            train => format!("data_batch_{}.bin", train.selector()),
        }
    }

    pub fn path(self, data_dir: impl AsRef<Path>, compat: Compat) -> PathBuf {
        data_dir.as_ref().join(self.file_name(compat))
    }
}

impl FromStr for Dataset {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::ALL
            .into_iter()
            .find(|dataset| s.len() == 1 && s.starts_with(dataset.selector()))
            .ok_or_else(|| DecodeError::UnknownDataset(s.to_string()))
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}
