use std::{
    path::{PathBuf, Path},
    ops::{
        DerefMut,
        Deref
    }
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{RwLock, RwLockWriteGuard, RwLockReadGuard};
use crate::log_error;

use super::Error;

/// Donnée persistée dans un fichier JSON.
///
/// Le fichier est réécrit à la libération de chaque garde d'écriture.
/// Sans chemin, la donnée ne vit qu'en mémoire.
#[derive(Debug)]
pub struct Data<T>(RwLock<T>, Option<PathBuf>);

impl<T> Data<T> {
    pub fn in_memory(data: T) -> Self {
        Self(RwLock::new(data), None)
    }
    pub fn path(&self) -> Option<&Path> {
        self.1.as_deref()
    }
    /// Accès direct, sans verrou ni sauvegarde
    pub fn get_mut(&mut self) -> &mut T {
        self.0.get_mut()
    }
}
impl<T: DeserializeOwned + Default> Data<T> {
    pub fn from_file_or_default<P: AsRef<Path>>(filepath: P) -> Result<Self, Error> {
        let filepath = filepath.as_ref().to_path_buf();
        let data = if filepath.exists() {
            let file_content = std::fs::read_to_string(&filepath).map_err(Error::Io)?;
            if file_content.trim().is_empty() {
                T::default()
            } else {
                serde_json::from_str(&file_content).map_err(Error::Serde)?
            }
        } else {
            T::default()
        };
        Ok(Self(RwLock::new(data), Some(filepath)))
    }
}
impl<T: Serialize> Data<T> {
    pub async fn read(&self) -> DataGuard<'_, T> {
        DataGuard::Read(self.0.read().await)
    }
    pub async fn write(&self) -> DataGuard<'_, T> {
        DataGuard::Write(self.0.write().await, self.1.as_deref())
    }
}

pub enum DataGuard<'a, T>
where T: Serialize
{
    Read(RwLockReadGuard<'a, T>),
    Write(RwLockWriteGuard<'a, T>, Option<&'a Path>)
}

impl<'a, T: Serialize> Deref for DataGuard<'a, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        match self {
            DataGuard::Read(ref guard) => guard.deref(),
            DataGuard::Write(ref guard, _) => guard.deref()
        }
    }
}
impl<'a, T: Serialize> DerefMut for DataGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            DataGuard::Read(_) => panic!("Read guard cannot be mutated"),
            DataGuard::Write(ref mut guard, _) => guard.deref_mut()
        }
    }
}

fn save<T: Serialize>(value: &T, path: &Path) -> Result<(), Error> {
    let value = serde_json::to_string_pretty(value).map_err(Error::Serde)?;
    std::fs::write(path, value).map_err(Error::Io)
}

impl<'a, T: Serialize> Drop for DataGuard<'a, T>
{
    fn drop(&mut self) {
        if let DataGuard::Write(data, Some(path)) = self {
            let value = RwLockWriteGuard::deref(data);
            if let Err(e) = save(value, *path) {
                log_error!("Unable to save {}: {}", path.to_string_lossy(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn write_guard_saves_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let data = Data::<HashMap<String, u32>>::from_file_or_default(&path).unwrap();
        assert!(data.read().await.is_empty());
        {
            let mut guard = data.write().await;
            guard.insert("a".to_string(), 1);
        }
        let reloaded = Data::<HashMap<String, u32>>::from_file_or_default(&path).unwrap();
        assert_eq!(reloaded.read().await.get("a"), Some(&1));
    }

    #[tokio::test]
    async fn in_memory_never_touches_disk() {
        let data = Data::in_memory(vec![1u8]);
        data.write().await.push(2);
        assert_eq!(*data.read().await, vec![1, 2]);
        assert!(data.path().is_none());
    }
}
