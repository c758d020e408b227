/// Z-ordering key for draw items. Higher values appear on top.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Layer for full-canvas fills (gradients, raster images).
    pub const BACKGROUND: ZIndex = ZIndex(-100);
    /// Layer for overlays such as control-point markers.
    pub const OVERLAY: ZIndex = ZIndex(100);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

/// Stable sort key for draw items.
///
/// Field order matters: the derived `Ord` compares `z` first, then insertion
/// `order`, which keeps equal-z items in the order they were recorded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}
