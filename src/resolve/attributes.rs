//! CPU side of the point buffer: a structure-of-arrays of renderable
//! per-probe attributes with per-field dirty tracking.
//!
//! Allocated once at data-load time, mutated in place by the resolver,
//! read (and dirty-flag-drained) by the point renderer. Never reallocated.

use glam::Vec3;

/// Which buffer field changed since the renderer last uploaded it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirtyFields {
    /// Positions changed (only ever true once, right after allocation).
    pub position: bool,
    /// Colors changed.
    pub color: bool,
    /// Sizes changed.
    pub size: bool,
    /// Visibility flags changed.
    pub hidden: bool,
    /// DCNN tags changed.
    pub dcnn_tag: bool,
}

/// Structure-of-arrays of GPU-facing probe attributes.
#[derive(Debug)]
pub struct PointAttributes {
    position: Vec<[f32; 3]>,
    color: Vec<[f32; 3]>,
    size: Vec<f32>,
    hidden: Vec<f32>,
    dcnn_tag: Vec<i32>,
    dirty: DirtyFields,
}

impl PointAttributes {
    /// Allocate one slot per probe. Permanently excluded probes keep the
    /// initial state forever: hidden, untagged, at their fixed position.
    pub fn new(positions: &[Vec3]) -> Self {
        let n = positions.len();
        Self {
            position: positions.iter().map(|p| p.to_array()).collect(),
            color: vec![[0.0; 3]; n],
            size: vec![0.0; n],
            hidden: vec![1.0; n],
            dcnn_tag: vec![-1; n],
            dirty: DirtyFields {
                position: true,
                color: true,
                size: true,
                hidden: true,
                dcnn_tag: true,
            },
        }
    }

    /// Number of probe slots.
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// Whether the buffer has no slots.
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Fixed probe positions.
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.position
    }

    /// Resolved colors.
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.color
    }

    /// Resolved point sizes.
    pub fn sizes(&self) -> &[f32] {
        &self.size
    }

    /// Visibility flags (`1.0` = hidden, matching the shader attribute).
    pub fn hidden_flags(&self) -> &[f32] {
        &self.hidden
    }

    /// DCNN tags as written for the shader (`-1` outside DCNN mode).
    pub fn dcnn_tags(&self) -> &[i32] {
        &self.dcnn_tag
    }

    /// Whether a slot is currently hidden.
    pub fn is_hidden(&self, probe: usize) -> bool {
        self.hidden[probe] > 0.5
    }

    /// Mark a slot hidden without touching its other fields.
    pub(crate) fn write_hidden(&mut self, probe: usize) {
        self.hidden[probe] = 1.0;
        self.dirty.hidden = true;
    }

    /// Write a fully resolved visible slot.
    pub(crate) fn write_visible(
        &mut self,
        probe: usize,
        color: [f32; 3],
        size: f32,
        dcnn_tag: i32,
    ) {
        self.color[probe] = color;
        self.size[probe] = size;
        self.hidden[probe] = 0.0;
        self.dcnn_tag[probe] = dcnn_tag;
        self.dirty.color = true;
        self.dirty.size = true;
        self.dirty.hidden = true;
        self.dirty.dcnn_tag = true;
    }

    /// Fields written since the last [`take_dirty`](Self::take_dirty).
    pub fn dirty(&self) -> DirtyFields {
        self.dirty
    }

    /// Drain the dirty flags; the renderer calls this after uploading.
    pub fn take_dirty(&mut self) -> DirtyFields {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_hidden_slots() {
        let attrs =
            PointAttributes::new(&[Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(attrs.len(), 2);
        assert!(attrs.is_hidden(0));
        assert!(attrs.is_hidden(1));
        assert_eq!(attrs.positions()[1], [1.0, 2.0, 3.0]);
        assert_eq!(attrs.dcnn_tags(), &[-1, -1]);
    }

    #[test]
    fn dirty_flags_drain() {
        let mut attrs = PointAttributes::new(&[Vec3::ZERO]);
        let first = attrs.take_dirty();
        assert!(first.position && first.color);
        let drained = attrs.dirty();
        assert!(!drained.position && !drained.color);

        attrs.write_visible(0, [1.0, 0.0, 0.0], 3.0, -1);
        let after = attrs.take_dirty();
        assert!(after.color && after.size && after.hidden && after.dcnn_tag);
        // Positions never rewritten after allocation.
        assert!(!after.position);
    }
}
