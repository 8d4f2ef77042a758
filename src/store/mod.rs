// Store layer: line-oriented persistence for the catalog, the timetable
// and the generation-history log.
//
// Every full-store write goes through `replace_file` (write a sibling temp
// file, then rename) so a crash mid-write never leaves a torn store.

pub mod catalog;
pub mod history;
pub mod timetable;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use catalog::CatalogStore;
pub use history::{default_semester_label, GenerationRecord, HistoryStore, SemesterHistory};
pub use timetable::TimetableStore;

/// Atomically replace `path` with `contents`.
pub(crate) fn replace_file(path: &Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)
}

/// The three on-disk stores of one institution, side by side in a data
/// directory. File names match the legacy layout so hand-edited files keep
/// working.
pub struct Stores {
    pub catalog: CatalogStore,
    pub timetable: TimetableStore,
    pub history: HistoryStore,
}

impl Stores {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            catalog: CatalogStore::new(dir.join("data.txt")),
            timetable: TimetableStore::new(dir.join("timetable_output.txt")),
            history: HistoryStore::new(dir.join("timetable_history.txt")),
        }
    }
}
