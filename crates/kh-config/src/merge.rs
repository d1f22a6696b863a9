//! Deep merge of configuration mappings

use crate::node::{Mapping, Node};

/// Merge `overlay` on top of `base`.
///
/// Keys present on both sides are merged recursively when both values are
/// mappings. Any other combination takes the overlay's value whole, so
/// sequences are replaced, never concatenated.
pub fn merge(base: Mapping, overlay: Mapping) -> Mapping {
    let mut merged = base;
    for (key, overlay_value) in overlay {
        let value = match (merged.remove(&key), overlay_value) {
            (Some(Node::Mapping(base_map)), Node::Mapping(overlay_map)) => {
                Node::Mapping(merge(base_map, overlay_map))
            }
            (_, overlay_value) => overlay_value,
        };
        merged.insert(key, value);
    }
    merged
}
