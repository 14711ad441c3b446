//! # Binary Space Partitioning
//!
//! Splits a rectangle into leaves breadth-first and carves one room per leaf.

use crate::config::SPLIT_ASPECT_RATIO;
use crate::generation::Rect;
use log::trace;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

/// Splits `area` into leaves.
///
/// Nodes are processed from a FIFO queue. A node with a side of at least
/// `max_size` tries to split; everything else, and every node whose split
/// would leave a side shorter than `min_size`, becomes a leaf. Leaves are
/// returned in the order they were finalized.
pub fn partition(area: Rect, min_size: u32, max_size: u32, rng: &mut StdRng) -> Vec<Rect> {
    let mut queue = VecDeque::from([area]);
    let mut leaves = Vec::new();

    while let Some(node) = queue.pop_front() {
        if node.width >= max_size || node.height >= max_size {
            if let Some((first, second)) = split(node, min_size, rng) {
                queue.push_back(first);
                queue.push_back(second);
                continue;
            }
        }
        trace!("leaf {:?}", node);
        leaves.push(node);
    }

    leaves
}

/// Splits one node in two, or returns `None` if it must stay a leaf.
///
/// The longer side is cut when it is more than 1.25 times the shorter one;
/// otherwise the axis is a coin flip.
pub fn split(node: Rect, min_size: u32, rng: &mut StdRng) -> Option<(Rect, Rect)> {
    let width = node.width as f64;
    let height = node.height as f64;
    let cut_width = if height > 0.0 && width / height > SPLIT_ASPECT_RATIO {
        true
    } else if width > 0.0 && height / width > SPLIT_ASPECT_RATIO {
        false
    } else {
        rng.gen_bool(0.5)
    };

    let length = if cut_width { node.width } else { node.height };
    if length.saturating_sub(min_size) <= min_size {
        return None;
    }
    let offset = rng.gen_range(min_size..=length - min_size);

    let halves = if cut_width {
        (
            Rect::new(node.x, node.y, offset, node.height),
            Rect::new(node.x + offset as i32, node.y, node.width - offset, node.height),
        )
    } else {
        (
            Rect::new(node.x, node.y, node.width, offset),
            Rect::new(node.x, node.y + offset as i32, node.width, node.height - offset),
        )
    };
    Some(halves)
}

/// Carves a room inside `leaf`, inset by one cell from every edge.
///
/// Sides too short for a room of `min_size` plus the inset shrink the room to
/// whatever fits; sides shorter than three cells drop the inset.
pub fn carve_room(leaf: Rect, min_size: u32, rng: &mut StdRng) -> Rect {
    let (x, width) = room_span(leaf.x, leaf.width, min_size, rng);
    let (y, height) = room_span(leaf.y, leaf.height, min_size, rng);
    Rect::new(x, y, width, height)
}

fn room_span(leaf_start: i32, leaf_len: u32, min_size: u32, rng: &mut StdRng) -> (i32, u32) {
    if leaf_len >= min_size + 2 {
        let len = rng.gen_range(min_size..=leaf_len - 2);
        let first = leaf_start + 1;
        let last = leaf_start + (leaf_len - 1 - len) as i32;
        (rng.gen_range(first..=last), len)
    } else if leaf_len >= 3 {
        (leaf_start + 1, leaf_len - 2)
    } else {
        (leaf_start, leaf_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_partition_covers_area_without_overlap() {
        let area = Rect::new(0, 0, 30, 20);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let leaves = partition(area, 3, 6, &mut rng);

            let mut cells = std::collections::HashSet::new();
            for leaf in &leaves {
                assert!(leaf.width >= 3 && leaf.height >= 3, "leaf {:?} too small", leaf);
                for pos in leaf.positions() {
                    assert!(cells.insert(pos), "{} lies in two leaves", pos);
                }
            }
            assert_eq!(cells.len() as u32, area.area());
        }
    }

    #[test]
    fn test_small_area_is_single_leaf() {
        let mut rng = StdRng::seed_from_u64(1);
        let area = Rect::new(0, 0, 5, 5);
        assert_eq!(partition(area, 3, 6, &mut rng), vec![area]);
    }

    #[test]
    fn test_split_refuses_degenerate_offsets() {
        let mut rng = StdRng::seed_from_u64(1);
        // 6 - 3 <= 3 on both axes
        assert!(split(Rect::new(0, 0, 6, 6), 3, &mut rng).is_none());
        assert!(split(Rect::new(0, 0, 7, 7), 3, &mut rng).is_some());
    }

    #[test]
    fn test_split_prefers_long_axis() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..10 {
            let (a, b) = split(Rect::new(0, 0, 20, 8), 3, &mut rng).unwrap();
            assert_eq!(a.height, 8);
            assert_eq!(b.height, 8);
            assert_eq!(a.width + b.width, 20);
            assert_eq!(b.x, a.width as i32);
        }
    }

    #[test]
    fn test_room_is_inset_inside_leaf() {
        let leaf = Rect::new(4, 2, 9, 7);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let room = carve_room(leaf, 3, &mut rng);
            assert!(room.width >= 3 && room.height >= 3);
            assert!(room.x > leaf.x && room.y > leaf.y);
            assert!(room.x_end() < leaf.x_end());
            assert!(room.y_end() < leaf.y_end());
        }
    }

    #[test]
    fn test_thin_leaf_degrades() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(carve_room(Rect::new(0, 0, 4, 4), 3, &mut rng), Rect::new(1, 1, 2, 2));
        assert_eq!(carve_room(Rect::new(0, 0, 2, 1), 3, &mut rng), Rect::new(0, 0, 2, 1));
    }
}
