//! Library loading: scan a directory and extract every record.
//!
//! Tag extraction dominates load time, so files are read on the rayon pool;
//! the parallel map preserves scanner order, which is the grid's initial
//! display order.

use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use crate::metadata;
use crate::model::TrackRecord;
use crate::scanner;

/// Scan `root` and produce one record per audio file, in scanner order.
pub fn load_library(root: &Path, extensions: &[String]) -> Vec<TrackRecord> {
    let paths = scanner::scan(root, extensions);
    info!(target: "library", root = %root.display(), files = paths.len(), "loading library");

    let records: Vec<TrackRecord> = paths
        .par_iter()
        .map(|path| metadata::read_record(path))
        .collect();

    info!(target: "library", records = records.len(), "library loaded");
    records
}
