//! File-per-category persistence in the export CSV layout.
//!
//! Saves overwrite the whole file. There is no locking: two processes
//! writing the same directory get whichever rename lands last.
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::PathBuf,
};

use crate::{Category, EngineError, ResultEngine, Row, export::csv};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `category`.
    pub fn path(&self, category: Category) -> PathBuf {
        self.dir.join(category.file_name())
    }

    /// Fails when the store path exists but is not a directory.
    pub fn check(&self) -> ResultEngine<()> {
        match fs::metadata(&self.dir) {
            Ok(meta) if !meta.is_dir() => Err(EngineError::Store(format!(
                "{} is not a directory",
                self.dir.display()
            ))),
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Rows of `category`, or `None` when nothing was saved yet.
    pub fn load(&self, category: Category) -> ResultEngine<Option<Vec<Row>>> {
        let file = match File::open(self.path(category)) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        csv::read_rows(category, BufReader::new(file)).map(Some)
    }

    /// Overwrites the file of `category` with `rows`.
    ///
    /// The data is written next to the target and renamed over it, so a
    /// failed save leaves the previous file intact.
    pub fn save(&self, category: Category, rows: &[Row]) -> ResultEngine<()> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path(category);
        let staging = target.with_extension("csv.tmp");

        let result = (|| -> ResultEngine<()> {
            let mut writer = BufWriter::new(File::create(&staging)?);
            csv::write_rows(category, rows, &mut writer)?;
            writer.flush()?;
            fs::rename(&staging, &target)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }
}
