pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::warn;

use crate::{domain::track::TrackId, favorites::error::StoreError};

/// Persisted set of favorite tracks.
///
/// The whole set lives in one JSON file holding an array of track ids.
/// An in-memory mirror is loaded once at startup and the file is
/// rewritten after every successful toggle, so mirror and file never
/// diverge. Insertion order is kept for display.
pub struct FavoritesStore {
    path: PathBuf,
    ids: Vec<TrackId>,
}

impl FavoritesStore {
    /// Missing or unreadable files yield an empty set. Favorites must
    /// never prevent startup.
    pub fn load(path: &Path) -> Self {
        let ids = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(ids) => ids,
                Err(e) => {
                    warn!("ignoring malformed favorites file {}: {e}", path.display());
                    Vec::new()
                }
            },

            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),

            Err(e) => {
                warn!("could not read favorites file {}: {e}", path.display());
                Vec::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            ids,
        }
    }

    pub fn is_favorite(&self, id: TrackId) -> bool {
        self.ids.contains(&id)
    }

    /// Insertion-ordered listing.
    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    /// Flips membership and persists the full set. Returns the new
    /// membership state; a failed write rolls the in-memory change back.
    pub fn toggle(&mut self, id: TrackId) -> Result<bool, StoreError> {
        let previous = self.ids.clone();

        let favorite = match self.ids.iter().position(|&fav| fav == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        };

        if let Err(e) = self.save() {
            self.ids = previous;
            return Err(e);
        }

        Ok(favorite)
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::File::create(&self.path)?;
        serde_json::to_writer(file, &self.ids)?;

        Ok(())
    }
}
