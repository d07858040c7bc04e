//! Clustering of candidate glyphs into blobs, one blob per text line

use std::sync::Arc;

use super::recognizer::PixelRegion;
use crate::geometry::Rectangle;
use crate::glyph::Glyph;

/// Maximal cluster of nearby candidate glyphs
#[derive(Clone, Debug, PartialEq)]
pub struct Blob {
    /// Members, sorted by abscissa
    pub glyphs: Vec<Arc<Glyph>>,
    pub bounds: Rectangle,
}

impl Blob {
    /// Area and pixels to submit to the recognizer
    pub fn region(&self) -> PixelRegion {
        PixelRegion {
            bounds: self.bounds,
            pixels: self.glyphs.iter().flat_map(|g| g.pixels.iter().copied()).collect(),
        }
    }

    /// Transient glyph made of all members
    pub fn compound(&self) -> Option<Glyph> {
        Glyph::compound(&self.glyphs)
    }
}

impl std::fmt::Display for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{Blob {:?} glyphs[", self.bounds)?;
        for glyph in &self.glyphs {
            write!(f, "#{}", glyph.id)?;
        }
        write!(f, "]}}")
    }
}

fn find(parents: &mut [usize], mut i: usize) -> usize {
    while parents[i] != i {
        parents[i] = parents[parents[i]];
        i = parents[i];
    }
    i
}

/// Gather candidates into maximal clusters
///
/// Two glyphs are neighbors when their boxes are at most `max_dx` apart
/// horizontally and `max_dy` apart vertically; a blob is a connected
/// component of that relation. Blobs come out sorted by abscissa.
pub fn cluster(candidates: &[Arc<Glyph>], max_dx: i32, max_dy: i32) -> Vec<Blob> {
    let n = candidates.len();
    let mut parents: Vec<usize> = (0..n).collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (&candidates[i].bounds, &candidates[j].bounds);
            if a.x_gap(b) <= max_dx && a.y_gap(b) <= max_dy {
                let (ri, rj) = (find(&mut parents, i), find(&mut parents, j));
                if ri != rj {
                    parents[rj] = ri;
                }
            }
        }
    }

    let mut groups: Vec<Vec<Arc<Glyph>>> = Vec::new();
    let mut group_of_root = vec![usize::MAX; n];
    for i in 0..n {
        let root = find(&mut parents, i);
        if group_of_root[root] == usize::MAX {
            group_of_root[root] = groups.len();
            groups.push(Vec::new());
        }
        groups[group_of_root[root]].push(Arc::clone(&candidates[i]));
    }

    let mut blobs: Vec<Blob> = groups
        .into_iter()
        .filter_map(|mut glyphs| {
            glyphs.sort_by_key(|g| g.key());
            let bounds = Rectangle::union_all(glyphs.iter().map(|g| &g.bounds))?;
            Some(Blob { glyphs, bounds })
        })
        .collect();
    blobs.sort_by_key(|b| (b.bounds.x, b.bounds.y));
    blobs
}
