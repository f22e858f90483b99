//! Handle types for arena-stored sprites

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a node of a [`SpriteTree`](crate::scene::SpriteTree).
    ///
    /// Handles are generational: a handle to a destroyed node never aliases a
    /// node created later in the same slot.
    pub struct SpriteId;
}

/// Arena map keyed by sprite handles
pub type SpriteMap<T> = SlotMap<SpriteId, T>;
