//! Corpus metadata tables
//!
//! Parses the four tab-separated split tables into ordered
//! [`MetadataRecord`] sequences.

pub mod layout;
pub mod record;
pub mod split;
pub mod table;

pub use layout::DatasetLayout;
pub use record::{derive_label, normalize_file_name, session_of, MetadataRecord};
pub use split::Split;
pub use table::{sampled_row_count, SplitTable};
