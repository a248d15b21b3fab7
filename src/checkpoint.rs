//! Saving and restoring the state of a population.

use crate::Error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub(crate) fn timestamp() -> String {
    use chrono::{SecondsFormat, Utc};
    let rfc3339 = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false);
    // Replace the 'T' separator with a space.
    rfc3339.replacen('T', " ", 1)
}

/// Everything needed to resume an evolution with [crate::Afpo::restore].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot<C> {
    /// Time the snapshot was taken, as a UTC timestamp.
    pub saved: String,

    /// Number of generations that had completely passed.
    pub generation: u64,

    /// The most recently issued candidate id.
    pub last_id: u64,

    pub candidates: Vec<C>,
}

impl<C: Serialize> Snapshot<C> {
    /// Save a snapshot to a file.
    ///
    /// Argument path is the directory to save in. Optional, use empty string
    /// for the temporary directory. The filename is "afpo_gen_N.json" where
    /// N is the generation number.
    ///
    /// Returns the file path of the saved snapshot.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf, Error> {
        let mut path: PathBuf = path.as_ref().into();
        // Fill in default path.
        if path.to_str() == Some("") {
            path = std::env::temp_dir();
        }
        std::fs::create_dir_all(&path)?;
        let name = format!("afpo_gen_{}.json", self.generation);
        let temp = path.join(format!(".{name}.tmp"));
        path.push(name);
        //
        let file = File::create(&temp)?;
        let mut buf = std::io::BufWriter::new(file);
        serde_json::to_writer(&mut buf, self)?;
        buf.write_all(b"\n")?;
        let file = buf.into_inner().map_err(|err| err.into_error())?; // flush the buffer
        file.sync_all()?; // push to disk
        std::fs::rename(&temp, &path)?; // move file into place
        log::info!("saved generation {} to {}", self.generation, path.display());
        Ok(path)
    }
}

impl<C: DeserializeOwned> Snapshot<C> {
    /// Load a previously saved snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let data = std::fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&data)?)
    }
}
