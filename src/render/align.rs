use crate::assets::SourceAnimation;

/// Number of output frames: the shortest source's frame count.
///
/// Longer sources have their trailing frames dropped. An empty slice, or any
/// source without frames, yields 0.
pub fn aligned_frame_count(sources: &[SourceAnimation]) -> usize {
    sources
        .iter()
        .map(SourceAnimation::frame_count)
        .min()
        .unwrap_or(0)
}
