use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::PlacedNode;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub id: String,
    pub x: f32,
    /// Group-local; the compositor adds the group's offset.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedGroup {
    /// Same order as the raw input; nodes with unusable coordinates are absent.
    pub nodes: Vec<ResolvedNode>,
    /// Bottom edge of the tallest rank.
    pub height: f32,
}

/// Snaps delegate output onto integer x ranks and restacks every rank from
/// y = 0 so that nodes sharing a rank are at least `spacing` apart.
///
/// Within a rank the delegate's vertical order is kept (ties keep input
/// order).
pub fn resolve(placed: &[PlacedNode], spacing: f32) -> ResolvedGroup {
    let mut ranks: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, node) in placed.iter().enumerate() {
        if !node.x.is_finite() || !node.y.is_finite() {
            tracing::warn!(id = %node.id, "delegate returned a non-finite coordinate; skipping");
            continue;
        }
        ranks.entry(node.x.round() as i64).or_default().push(idx);
    }

    let mut slots: Vec<Option<ResolvedNode>> = vec![None; placed.len()];
    let mut height: f32 = 0.0;
    for (rank_x, members) in ranks.iter_mut() {
        // Finite only, so partial_cmp never fails; -0.0 and 0.0 stay tied.
        members.sort_by(|a, b| {
            placed[*a]
                .y
                .partial_cmp(&placed[*b].y)
                .unwrap_or(Ordering::Equal)
        });
        let mut cursor = 0.0;
        let mut bottom: f32 = 0.0;
        for &idx in members.iter() {
            let node = &placed[idx];
            slots[idx] = Some(ResolvedNode {
                id: node.id.clone(),
                x: *rank_x as f32,
                y: cursor,
                width: node.width,
                height: node.height,
            });
            bottom = cursor + node.height;
            cursor += node.height + spacing;
        }
        height = height.max(bottom);
    }

    ResolvedGroup {
        nodes: slots.into_iter().flatten().collect(),
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: &str, x: f32, y: f32, height: f32) -> PlacedNode {
        PlacedNode {
            id: id.to_string(),
            x,
            y,
            width: 100.0,
            height,
        }
    }

    fn find<'a>(group: &'a ResolvedGroup, id: &str) -> &'a ResolvedNode {
        group.nodes.iter().find(|n| n.id == id).unwrap()
    }

    #[test]
    fn near_equal_x_values_share_a_rank() {
        let group = resolve(
            &[
                placed("a", 99.6, 10.0, 50.0),
                placed("b", 100.4, 12.0, 50.0),
            ],
            20.0,
        );
        assert_eq!(find(&group, "a").x, 100.0);
        assert_eq!(find(&group, "b").x, 100.0);
        assert_eq!(find(&group, "a").y, 0.0);
        assert_eq!(find(&group, "b").y, 70.0);
        assert_eq!(group.height, 120.0);
    }

    #[test]
    fn rank_order_follows_delegate_y() {
        let group = resolve(
            &[
                placed("low", 0.0, 300.0, 40.0),
                placed("high", 0.0, -50.0, 60.0),
                placed("mid", 0.0, 100.0, 40.0),
            ],
            10.0,
        );
        assert_eq!(find(&group, "high").y, 0.0);
        assert_eq!(find(&group, "mid").y, 70.0);
        assert_eq!(find(&group, "low").y, 120.0);
        assert_eq!(group.height, 160.0);
        let order: Vec<&str> = group.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, ["low", "high", "mid"]);
    }

    #[test]
    fn equal_y_keeps_input_order() {
        let group = resolve(
            &[placed("first", 5.0, 0.0, 30.0), placed("second", 5.0, 0.0, 30.0)],
            20.0,
        );
        assert_eq!(find(&group, "first").y, 0.0);
        assert_eq!(find(&group, "second").y, 50.0);
    }

    #[test]
    fn signed_zero_y_is_a_tie() {
        let group = resolve(
            &[placed("first", 5.0, 0.0, 30.0), placed("second", 5.0, -0.0, 30.0)],
            20.0,
        );
        assert_eq!(find(&group, "first").y, 0.0);
        assert_eq!(find(&group, "second").y, 50.0);
    }

    #[test]
    fn height_is_the_tallest_rank() {
        let group = resolve(
            &[
                placed("a", 0.0, 0.0, 50.0),
                placed("b", 200.0, 0.0, 50.0),
                placed("c", 200.0, 80.0, 50.0),
            ],
            20.0,
        );
        assert_eq!(find(&group, "a").y, 0.0);
        assert_eq!(find(&group, "c").y, 70.0);
        assert_eq!(group.height, 120.0);
    }

    #[test]
    fn no_two_nodes_in_a_rank_overlap() {
        let raw: Vec<PlacedNode> = (0..12)
            .map(|i| {
                let x = (i % 3) as f32 * 150.2;
                let y = (i * 7 % 5) as f32;
                placed(&format!("n{i}"), x, y, 30.0 + i as f32)
            })
            .collect();
        let spacing = 15.0;
        let group = resolve(&raw, spacing);
        for a in &group.nodes {
            for b in &group.nodes {
                if a.id == b.id || a.x != b.x {
                    continue;
                }
                let (top, bottom) = if a.y <= b.y { (a, b) } else { (b, a) };
                assert!(bottom.y >= top.y + top.height + spacing, "{top:?} overlaps {bottom:?}");
            }
        }
    }

    #[test]
    fn non_finite_coordinates_are_skipped() {
        let group = resolve(
            &[placed("ok", 0.0, 0.0, 10.0), placed("bad", f32::NAN, 0.0, 10.0)],
            5.0,
        );
        assert_eq!(group.nodes.len(), 1);
        assert_eq!(group.nodes[0].id, "ok");
    }

    #[test]
    fn empty_input_has_zero_height() {
        let group = resolve(&[], 20.0);
        assert!(group.nodes.is_empty());
        assert_eq!(group.height, 0.0);
    }
}
