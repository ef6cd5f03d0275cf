//! Change detection between two corrected frames

use crate::color::{BLUE, GREEN, RED};
use crate::frame::CorrectedFrame;

/// Ascending indices of pixels that changed in the last update
///
/// The backing allocation is kept between cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedPixels {
    indices: Vec<usize>,
}

impl ChangedPixels {
    pub const fn new() -> Self {
        Self {
            indices: Vec::new(),
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

impl core::ops::Deref for ChangedPixels {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.indices
    }
}

/// Collect the indices where `current` differs from `previous`
///
/// Indices past the end of `previous` always count as changed, so a frame
/// that grew since the last transmit resends its new tail.
pub fn diff_into(current: &CorrectedFrame, previous: &CorrectedFrame, out: &mut ChangedPixels) {
    out.indices.clear();

    let known = previous.len().min(current.len());
    let (r, g, b) = (
        current.channel(RED),
        current.channel(GREEN),
        current.channel(BLUE),
    );
    let (pr, pg, pb) = (
        previous.channel(RED),
        previous.channel(GREEN),
        previous.channel(BLUE),
    );

    for i in 0..known {
        if r[i] != pr[i] || g[i] != pg[i] || b[i] != pb[i] {
            out.indices.push(i);
        }
    }
    out.indices.extend(known..current.len());
}

/// Convenience wrapper returning a fresh set
pub fn diff(current: &CorrectedFrame, previous: &CorrectedFrame) -> ChangedPixels {
    let mut out = ChangedPixels::new();
    diff_into(current, previous, &mut out);
    out
}
