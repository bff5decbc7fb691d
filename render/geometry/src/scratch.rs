use render_trait::{FlatPoint, SkyVertex, StaticVertex};

/// A reusable array with a length cursor. Clearing only resets the cursor,
/// storage grows to the largest batch seen and is then reused.
#[derive(Debug, Default)]
pub struct ScratchBuffer<T> {
    data: Vec<T>,
    len: usize,
}

impl<T: Copy> ScratchBuffer<T> {
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, value: T) {
        if self.len < self.data.len() {
            self.data[self.len] = value;
        } else {
            self.data.push(value);
        }
        self.len += 1;
    }

    pub fn extend_from_slice(&mut self, values: &[T]) {
        for v in values {
            self.push(*v);
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// Storage actually held, including what is past the cursor
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Every scratch area the geometry renderer rebuilds in to
#[derive(Debug, Default)]
pub struct Scratch {
    /// Bypassed walls, one quad at a time
    pub wall: ScratchBuffer<StaticVertex>,
    pub sky: ScratchBuffer<SkyVertex>,
    /// One subsector polygon from the triangulator
    pub polygon: Vec<FlatPoint>,
    /// All subsectors of a sector before they are copied in to a cache slot
    pub flat: ScratchBuffer<StaticVertex>,
}
