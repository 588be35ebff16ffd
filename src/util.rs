use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::graph::Rgba;

/// Two values in `[-1, 1]` derived from `id`, identical on every run.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Stable two-level color per name: each channel is either dim or bright.
pub fn stable_color(id: &str) -> Rgba {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let channel = |bit: u32| if (hash >> bit) & 1 == 0 { 204 } else { 51 };
    Rgba::rgb(channel(0), channel(1), channel(2))
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }
    let mut truncated = label
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_pair_is_bounded_and_repeatable() {
        let (x, y) = stable_pair("Alpha");
        assert!((-1.0..=1.0).contains(&x));
        assert!((-1.0..=1.0).contains(&y));
        assert_eq!(stable_pair("Alpha"), (x, y));
    }

    #[test]
    fn truncate_label_keeps_short_names() {
        assert_eq!(truncate_label("Alpha", 8), "Alpha");
        assert_eq!(truncate_label("Alphabetical", 6), "Alpha…");
    }
}
