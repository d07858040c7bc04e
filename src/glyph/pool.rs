//! Registry of the glyphs of one system

use std::collections::BTreeMap;
use std::sync::Arc;

use super::core::{Glyph, GlyphId};

/// Glyphs known to a system, by id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphPool {
    glyphs: BTreeMap<GlyphId, Arc<Glyph>>,
    /// Member glyph -> compound that absorbed it
    part_of: BTreeMap<GlyphId, GlyphId>,
    last_id: u32,
}

impl GlyphPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a glyph permanent
    ///
    /// A transient glyph receives a fresh id. A glyph that already carries an
    /// id replaces any previous glyph with the same id.
    pub fn register(&mut self, mut glyph: Glyph) -> Arc<Glyph> {
        if glyph.id.is_transient() {
            self.last_id += 1;
            glyph.id = GlyphId(self.last_id);
        } else {
            self.last_id = self.last_id.max(glyph.id.0);
        }

        let glyph = Arc::new(glyph);
        self.glyphs.insert(glyph.id, Arc::clone(&glyph));
        glyph
    }

    /// Register a compound and retire its members from the active glyphs
    pub fn register_compound(&mut self, compound: Glyph, members: &[Arc<Glyph>]) -> Arc<Glyph> {
        let compound = self.register(compound);
        for member in members {
            self.part_of.insert(member.id, compound.id);
        }
        compound
    }

    /// Compound a glyph has been absorbed into, if any
    pub fn part_of(&self, id: GlyphId) -> Option<GlyphId> {
        self.part_of.get(&id).copied()
    }

    pub fn is_active(&self, id: GlyphId) -> bool {
        !self.part_of.contains_key(&id)
    }

    pub fn get(&self, id: GlyphId) -> Option<&Arc<Glyph>> {
        self.glyphs.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Glyph>> {
        self.glyphs.values()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// All glyphs, sorted by abscissa then id
    pub fn sorted_by_x(&self) -> Vec<Arc<Glyph>> {
        let mut glyphs: Vec<_> = self.glyphs.values().cloned().collect();
        glyphs.sort_by_key(|g| g.key());
        glyphs
    }
}
