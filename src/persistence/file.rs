//! FileSlotStore - one JSON file per slot in a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{PersistenceError, SlotStore};

/// Slot store writing `<dir>/<key>.json`.
///
/// Writes go to a temp file that is then renamed over the target, so a crash
/// mid-write leaves the previous value in place. A process-wide lock keeps
/// concurrent writers on the same handle from interleaving.
#[derive(Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl FileSlotStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PersistenceError::Io {
            slot: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            dir,
            lock: Arc::new(RwLock::new(())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn io_error(key: &str, err: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            slot: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl SlotStore for FileSlotStore {
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let _guard = self
            .lock
            .read()
            .map_err(|_| PersistenceError::LockPoisoned("read"))?;
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn write_slot(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("write"))?;
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));

        fs::write(&tmp, &bytes).map_err(|e| Self::io_error(key, e))?;
        fs::rename(&tmp, &target).map_err(|e| Self::io_error(key, e))?;
        debug!(slot = key, path = %target.display(), "slot written");
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<bool, PersistenceError> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("remove"))?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{GoalMigrationSlot, ReadingGoalSlot, SlotsExt};
    use crate::ReadingGoal;

    #[test]
    fn writes_one_file_per_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::open(dir.path()).unwrap();

        let goal = ReadingGoal::with_target(2025, 24);
        store.slot::<ReadingGoalSlot>().save(&goal).unwrap();

        assert!(dir.path().join("reading_goal.json").exists());
        let loaded = store.slot::<ReadingGoalSlot>().load().unwrap().unwrap();
        assert_eq!(loaded, goal);
    }

    #[test]
    fn reopen_sees_previous_writes() {
        let dir = tempfile::tempdir().unwrap();
        FileSlotStore::open(dir.path())
            .unwrap()
            .slot::<GoalMigrationSlot>()
            .save(&true)
            .unwrap();

        let reopened = FileSlotStore::open(dir.path()).unwrap();
        assert_eq!(reopened.slot::<GoalMigrationSlot>().load().unwrap(), Some(true));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::open(dir.path().join("nested")).unwrap();
        assert_eq!(store.read_slot("saved_books").unwrap(), None);
        assert!(!store.remove_slot("saved_books").unwrap());
    }

    #[test]
    fn overwrite_replaces_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::open(dir.path()).unwrap();
        store.write_slot("k", b"first value".to_vec()).unwrap();
        store.write_slot("k", b"2".to_vec()).unwrap();
        assert_eq!(store.read_slot("k").unwrap(), Some(b"2".to_vec()));
        assert!(store.remove_slot("k").unwrap());
    }
}
