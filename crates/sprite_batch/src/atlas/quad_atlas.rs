//! Vector-backed atlas storage

use super::storage::{AtlasError, AtlasResult, AtlasStorage};
use crate::render::Quad;

/// Default [`AtlasStorage`]: a vector of quads with an explicit capacity
///
/// The logical capacity is tracked separately from the vector's allocation so
/// that growth happens exactly when the batch asks for it.
#[derive(Debug, Clone, Default)]
pub struct QuadAtlas {
    quads: Vec<Quad>,
    capacity: usize,
}

impl QuadAtlas {
    /// Create an empty atlas able to hold `capacity` quads
    pub fn with_capacity(capacity: usize) -> AtlasResult<Self> {
        let mut atlas = Self::default();
        atlas.resize(capacity)?;
        Ok(atlas)
    }

    fn check_index(&self, index: usize) -> AtlasResult<()> {
        if index < self.quads.len() {
            Ok(())
        } else {
            Err(AtlasError::IndexOutOfBounds {
                index,
                count: self.quads.len(),
            })
        }
    }
}

impl AtlasStorage for QuadAtlas {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn count(&self) -> usize {
        self.quads.len()
    }

    fn get(&self, index: usize) -> Option<&Quad> {
        self.quads.get(index)
    }

    fn set(&mut self, index: usize, quad: Quad) -> AtlasResult<()> {
        self.check_index(index)?;
        self.quads[index] = quad;
        Ok(())
    }

    fn resize(&mut self, capacity: usize) -> AtlasResult<()> {
        if capacity < self.quads.len() {
            return Err(AtlasError::ShrinkBelowCount {
                requested: capacity,
                count: self.quads.len(),
            });
        }

        if capacity > self.quads.capacity() {
            self.quads
                .try_reserve_exact(capacity - self.quads.len())
                .map_err(|_| AtlasError::AllocationFailed { capacity })?;
        } else {
            self.quads.shrink_to(capacity);
        }
        self.capacity = capacity;
        Ok(())
    }

    fn insert_quads(&mut self, index: usize, quads: &[Quad]) -> AtlasResult<()> {
        if index > self.quads.len() {
            return Err(AtlasError::IndexOutOfBounds {
                index,
                count: self.quads.len(),
            });
        }
        let required = self.quads.len() + quads.len();
        if required > self.capacity {
            return Err(AtlasError::CapacityExceeded {
                required,
                capacity: self.capacity,
            });
        }

        self.quads.splice(index..index, quads.iter().copied());
        Ok(())
    }

    fn remove_quads(&mut self, index: usize, amount: usize) -> AtlasResult<()> {
        let end = index + amount;
        if end > self.quads.len() {
            return Err(AtlasError::IndexOutOfBounds {
                index: end.saturating_sub(1),
                count: self.quads.len(),
            });
        }

        self.quads.drain(index..end);
        Ok(())
    }

    fn remove_all(&mut self) {
        self.quads.clear();
    }

    fn quads(&self) -> &[Quad] {
        &self.quads
    }
}
