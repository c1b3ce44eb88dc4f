//! Texture loading for drawing commands.
//!
//! A texture is an ASCII-art image: a block of text rows. Drawing commands own
//! their `Texture` by value and hand it back to the store on disposal, so a
//! texture can only ever be released once.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::SceneError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

/// A loaded texture. Not `Clone`; whoever owns it releases it.
#[derive(Debug)]
pub struct Texture {
    id: TextureId,
    path: String,
    rows: Vec<String>,
}

impl Texture {
    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Character at (`col`, `row`) with the texture tiled in both directions.
    /// Empty textures read as blank space.
    pub fn sample(&self, col: usize, row: usize) -> char {
        if self.rows.is_empty() {
            return ' ';
        }
        let line = &self.rows[row % self.rows.len()];
        let len = line.chars().count();
        if len == 0 {
            return ' ';
        }
        line.chars().nth(col % len).unwrap_or(' ')
    }
}

pub trait TextureStore {
    fn load(&mut self, path: &str) -> Result<Texture, SceneError>;
    fn release(&mut self, texture: Texture);
}

/// Loads textures from text files under an asset root.
pub struct FsTextures {
    root: PathBuf,
    next_id: u64,
}

impl FsTextures {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            next_id: 0,
        }
    }
}

impl TextureStore for FsTextures {
    fn load(&mut self, path: &str) -> Result<Texture, SceneError> {
        let full = self.root.join(path);
        let text = fs::read_to_string(&full).map_err(|source| SceneError::MissingAsset {
            path: full.display().to_string(),
            source,
        })?;
        let id = TextureId(self.next_id);
        self.next_id += 1;
        tracing::debug!(path, ?id, "loaded texture");
        Ok(Texture {
            id,
            path: path.to_string(),
            rows: text.lines().map(str::to_string).collect(),
        })
    }

    fn release(&mut self, texture: Texture) {
        tracing::debug!(path = %texture.path, id = ?texture.id, "released texture");
    }
}

#[derive(Default)]
struct MemoryInner {
    images: HashMap<String, Vec<String>>,
    next_id: u64,
    live: HashMap<TextureId, String>,
    released: Vec<String>,
}

/// In-memory texture store for programmatic scenes and tests.
///
/// Clones share state, so a caller can keep a clone to inspect which textures
/// are live after boxing the store into a scene.
#[derive(Clone, Default)]
pub struct MemoryTextures {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, rows: &[&str]) {
        self.inner
            .borrow_mut()
            .images
            .insert(path.to_string(), rows.iter().map(|r| r.to_string()).collect());
    }

    /// Number of loaded textures not yet released.
    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    /// How many times a texture loaded from `path` has been released.
    pub fn released_count(&self, path: &str) -> usize {
        self.inner
            .borrow()
            .released
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

impl TextureStore for MemoryTextures {
    fn load(&mut self, path: &str) -> Result<Texture, SceneError> {
        let mut inner = self.inner.borrow_mut();
        let rows = inner
            .images
            .get(path)
            .cloned()
            .ok_or_else(|| SceneError::MissingAsset {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in memory store"),
            })?;
        let id = TextureId(inner.next_id);
        inner.next_id += 1;
        inner.live.insert(id, path.to_string());
        Ok(Texture {
            id,
            path: path.to_string(),
            rows,
        })
    }

    fn release(&mut self, texture: Texture) {
        let mut inner = self.inner.borrow_mut();
        inner.live.remove(&texture.id);
        inner.released.push(texture.path);
    }
}
