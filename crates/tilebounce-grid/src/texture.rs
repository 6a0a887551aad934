//! Texture manifest validation.
//!
//! The manifest is an ordered list of exactly [`TILE_KIND_COUNT`] paths,
//! matched positionally to [`TileKind::ALL`]. Loading is all-or-nothing: a
//! wrong count fails before any file is touched, and the first unreadable
//! file aborts the whole atlas.

use std::path::Path;

use crate::tile::{TileKind, TILE_KIND_COUNT};
use crate::GridError;

/// Decodes a texture from disk. Implemented by the rendering backend.
pub trait TextureLoader {
    type Texture;

    fn load(&mut self, path: &Path) -> std::io::Result<Self::Texture>;
}

/// One loaded texture per tile kind.
#[derive(Debug, Clone)]
pub struct TileAtlas<T> {
    textures: Vec<T>,
}

impl<T> TileAtlas<T> {
    /// Load every texture in `paths` through `loader`.
    pub fn load<P, L>(paths: &[P], loader: &mut L) -> Result<Self, GridError>
    where
        P: AsRef<Path>,
        L: TextureLoader<Texture = T>,
    {
        if paths.len() != TILE_KIND_COUNT {
            tracing::error!(
                expected = TILE_KIND_COUNT,
                found = paths.len(),
                "texture manifest has the wrong number of entries"
            );
            return Err(GridError::TextureCount {
                expected: TILE_KIND_COUNT,
                found: paths.len(),
            });
        }

        let mut textures = Vec::with_capacity(TILE_KIND_COUNT);
        for path in paths {
            let path = path.as_ref();
            let texture = loader.load(path).map_err(|source| {
                tracing::error!(path = %path.display(), error = %source, "could not load texture");
                GridError::Texture {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            textures.push(texture);
        }

        tracing::debug!(count = textures.len(), "tile atlas loaded");
        Ok(Self { textures })
    }

    /// The texture for a tile kind.
    #[inline]
    pub fn get(&self, kind: TileKind) -> &T {
        &self.textures[kind.texture_index()]
    }

    /// Textures in slot order.
    pub fn textures(&self) -> &[T] {
        &self.textures
    }
}
