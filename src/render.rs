//! Frame compositing: alignment, resampling, masked blending and palette freezing.

pub(crate) mod align;
pub(crate) mod composite;
pub(crate) mod compositor;
pub(crate) mod layout;
pub(crate) mod resample;
