//! Corpus partitions

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// One of the four named partitions of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Split {
    Train,
    Dev1,
    Dev2,
    Test,
}

impl Split {
    pub const ALL: [Split; 4] = [Split::Train, Split::Dev1, Split::Dev2, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev1 => "dev1",
            Split::Dev2 => "dev2",
            Split::Test => "test",
        }
    }

    /// Number of tab-separated fields a row of this split's table carries.
    ///
    /// The test table has an extra `test_file_name` column which is dropped.
    pub fn field_count(&self) -> usize {
        match self {
            Split::Test => 4,
            _ => 3,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = Error;

    /// Case-insensitive. `d1`/`d2` are accepted as short forms of the
    /// development splits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "dev1" | "d1" => Ok(Split::Dev1),
            "dev2" | "d2" => Ok(Split::Dev2),
            "test" => Ok(Split::Test),
            _ => Err(Error::InvalidSplit(s.to_string())),
        }
    }
}
