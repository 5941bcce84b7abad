//! Asset lookup
//!
//! A `.lbx` file is a zip archive holding `label.xml` plus the images it
//! references by file name. The renderer never opens archives itself; it asks
//! an [`AssetStore`] for bytes by name.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::errors::{LabelError, Result};

/// Name of the label document inside an archive.
pub const LABEL_XML: &str = "label.xml";

/// Read-only access to the files of an extracted label archive.
pub trait AssetStore {
    /// Bytes of the asset called `name`.
    ///
    /// Missing assets are [`LabelError::AssetNotFound`].
    fn get_asset(&self, name: &str) -> Result<Cow<'_, [u8]>>;
}

impl<T: AssetStore + ?Sized> AssetStore for &T {
    fn get_asset(&self, name: &str) -> Result<Cow<'_, [u8]>> {
        (**self).get_asset(name)
    }
}

impl<T: AssetStore + ?Sized> AssetStore for Box<T> {
    fn get_asset(&self, name: &str) -> Result<Cow<'_, [u8]>> {
        (**self).get_asset(name)
    }
}

/// Assets held in memory, e.g. entries already pulled out of a zip.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), bytes.into());
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetStore for MemoryAssets {
    fn get_asset(&self, name: &str) -> Result<Cow<'_, [u8]>> {
        self.files
            .get(name)
            .map(|bytes| Cow::Borrowed(bytes.as_slice()))
            .ok_or_else(|| LabelError::AssetNotFound {
                name: name.to_string(),
            })
    }
}

/// Assets in a directory an archive was extracted to.
#[derive(Clone, Debug)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names may only point below the root.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let inside = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        inside.then(|| self.root.join(relative))
    }
}

impl AssetStore for DirAssets {
    fn get_asset(&self, name: &str) -> Result<Cow<'_, [u8]>> {
        let not_found = || LabelError::AssetNotFound {
            name: name.to_string(),
        };
        let path = self.resolve(name).ok_or_else(not_found)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(source) => Err(LabelError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}
