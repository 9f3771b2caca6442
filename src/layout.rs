//! Angular layout engine
//!
//! Assigns a direction in [0, 360) degrees to every node of a menu tree.
//! Items with a fixed angle anchor the circle; everything between two
//! anchors is distributed evenly inside that wedge. When a level has a
//! parent, the direction back to it (the back-link) consumes one slot of
//! whichever wedge it lands in, so child items cluster around it without
//! colliding.
//!
//! Angles increase clockwise with 0 at the top, matching the renderer.

use crate::item::MenuItemNode;
use thiserror::Error;

/// Angular clearance kept free on both sides of the back-link direction.
const BACK_LINK_CLEARANCE: f64 = 1.0;

/// The fixed angles in a sibling list cannot be honored.
///
/// Reported, never silently corrected: the caller has to fix the
/// configuration or drop the fixed angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("fixed item angles cannot be honored")]
pub struct AngleConflict;

/// Shortest angular distance between two directions, in degrees.
fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Assign a direction to every item in `items` and, recursively, to all of
/// their descendants.
///
/// `parent_angle` is the direction back to the parent level; it is `None`
/// only for the top level of a menu. Items that already carry a fixed angle
/// must be strictly increasing in list order, each within [0, 360), and
/// none within 1 degree of `parent_angle`.
pub fn assign_angles(
    items: &mut [MenuItemNode],
    parent_angle: Option<f64>,
) -> Result<(), AngleConflict> {
    if items.is_empty() {
        return Ok(());
    }

    // Anchors: fixed angles paired with their index, in list order.
    let mut anchors: Vec<(usize, f64)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| item.fixed_angle.map(|a| (i, a)))
        .collect();

    if anchors.iter().any(|&(_, a)| !(0.0..360.0).contains(&a)) {
        return Err(AngleConflict);
    }
    if anchors.windows(2).any(|w| w[1].1 <= w[0].1) {
        return Err(AngleConflict);
    }
    if let Some(parent) = parent_angle {
        // The band around the back-link is reserved; a fixed item inside it
        // could never be disambiguated from "go back".
        if anchors
            .iter()
            .any(|&(_, a)| circular_distance(a, parent) < BACK_LINK_CLEARANCE)
        {
            return Err(AngleConflict);
        }
    }

    if anchors.is_empty() {
        // Nothing is pinned: pin the first item ourselves. 90 degrees by
        // default; 270 when the back-link points into the upper half, so
        // the first item sits opposite it.
        let first = match parent_angle {
            Some(parent) if parent < 180.0 => 270.0,
            _ => 90.0,
        };
        items[0].angle = Some(first);
        anchors.push((0, first));
    } else {
        for &(index, angle) in &anchors {
            items[index].angle = Some(angle);
        }
    }

    let item_count = items.len();
    let anchor_count = anchors.len();

    for a in 0..anchor_count {
        let (begin_index, begin_angle) = anchors[a];
        let (end_index, mut end_angle) = anchors[(a + 1) % anchor_count];
        if end_angle <= begin_angle {
            // Wrap-around wedge (or the single-anchor full circle).
            end_angle += 360.0;
        }
        let span = end_angle - begin_angle;

        // Items strictly between the two anchors, walking circularly.
        let mut wedge_items = Vec::new();
        let mut i = (begin_index + 1) % item_count;
        while i != end_index {
            wedge_items.push(i);
            i = (i + 1) % item_count;
        }

        // Where, if anywhere, does the back-link fall inside this wedge?
        let back_link = parent_angle
            .map(|p| begin_angle + (p - begin_angle).rem_euclid(360.0))
            .filter(|&p| p > begin_angle && p < end_angle);

        let slots = wedge_items.len() + usize::from(back_link.is_some());
        let gap = span / (slots + 1) as f64;

        let mut back_link_pending = back_link;
        let mut slot = 1;
        for &index in &wedge_items {
            let mut angle = begin_angle + gap * slot as f64;
            if let Some(back) = back_link_pending {
                // The back-link takes the slot once the pending position
                // reaches within half a gap of it (ties go to the
                // back-link); remaining items shift outward by one.
                if angle + gap / 2.0 >= back {
                    back_link_pending = None;
                    slot += 1;
                    angle = begin_angle + gap * slot as f64;
                }
            }
            items[index].angle = Some(angle.rem_euclid(360.0));
            slot += 1;
        }
    }

    // Each child level hangs opposite its parent item: that direction is
    // the canonical back-link.
    for item in items.iter_mut() {
        if item.children.is_empty() {
            continue;
        }
        let own = item
            .angle
            .expect("every item was assigned an angle above");
        assign_angles(&mut item.children, Some((own + 180.0).rem_euclid(360.0)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<MenuItemNode> {
        (0..n).map(|i| MenuItemNode::new(format!("item {}", i))).collect()
    }

    fn angles(items: &[MenuItemNode]) -> Vec<f64> {
        items.iter().map(|i| i.angle.unwrap()).collect()
    }

    #[test]
    fn test_three_free_items_spread_evenly() {
        let mut nodes = items(3);
        assign_angles(&mut nodes, None).unwrap();
        let got = angles(&nodes);
        assert_eq!(got, vec![90.0, 210.0, 330.0]);
    }

    #[test]
    fn test_free_items_are_distinct_and_evenly_gapped() {
        for n in 1..=12 {
            let mut nodes = items(n);
            assign_angles(&mut nodes, None).unwrap();
            let got = angles(&nodes);
            let expected_gap = 360.0 / n as f64;
            for i in 0..n {
                for j in (i + 1)..n {
                    assert!(
                        circular_distance(got[i], got[j]) > 1e-9,
                        "duplicate angle with {} items",
                        n
                    );
                }
            }
            // Sorted, consecutive items should sit one even gap apart.
            let mut sorted = got.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            for w in sorted.windows(2) {
                assert!((w[1] - w[0] - expected_gap).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_fixed_angles_must_increase() {
        let mut nodes = items(3);
        nodes[0].fixed_angle = Some(120.0);
        nodes[2].fixed_angle = Some(60.0);
        assert_eq!(assign_angles(&mut nodes, None), Err(AngleConflict));
    }

    #[test]
    fn test_equal_fixed_angles_rejected() {
        let mut nodes = items(2);
        nodes[0].fixed_angle = Some(45.0);
        nodes[1].fixed_angle = Some(45.0);
        assert_eq!(assign_angles(&mut nodes, None), Err(AngleConflict));
    }

    #[test]
    fn test_fixed_angle_out_of_range_rejected() {
        let mut nodes = items(2);
        nodes[0].fixed_angle = Some(360.0);
        assert_eq!(assign_angles(&mut nodes, None), Err(AngleConflict));

        let mut nodes = items(2);
        nodes[0].fixed_angle = Some(-3.0);
        assert_eq!(assign_angles(&mut nodes, None), Err(AngleConflict));
    }

    #[test]
    fn test_fixed_angle_near_back_link_rejected() {
        let mut nodes = items(2);
        nodes[0].fixed_angle = Some(90.5);
        assert_eq!(assign_angles(&mut nodes, Some(90.0)), Err(AngleConflict));

        // Clearance is circular: 0.2 is within a degree of 359.5.
        let mut nodes = items(2);
        nodes[0].fixed_angle = Some(0.2);
        assert_eq!(assign_angles(&mut nodes, Some(359.5)), Err(AngleConflict));

        // A full degree away is fine again.
        let mut nodes = items(2);
        nodes[0].fixed_angle = Some(91.5);
        assert!(assign_angles(&mut nodes, Some(90.0)).is_ok());
    }

    #[test]
    fn test_first_item_opposes_back_link() {
        // Back-link in the upper half: first item pinned at 270.
        let mut nodes = items(1);
        assign_angles(&mut nodes, Some(45.0)).unwrap();
        assert_eq!(nodes[0].angle, Some(270.0));

        // Back-link in the lower half: first item pinned at 90.
        let mut nodes = items(1);
        assign_angles(&mut nodes, Some(200.0)).unwrap();
        assert_eq!(nodes[0].angle, Some(90.0));
    }

    #[test]
    fn test_back_link_consumes_a_slot() {
        // First item pinned at 90, back-link at 180 inside the wedge.
        // Two slots of 120 degrees remain: the back-link takes the first
        // (210 is within half a gap of 180), pushing the item to 330.
        let mut nodes = items(2);
        assign_angles(&mut nodes, Some(180.0)).unwrap();
        assert_eq!(angles(&nodes), vec![90.0, 330.0]);
    }

    #[test]
    fn test_back_link_keeps_clearance_from_neighbours() {
        for n in 2..=8 {
            let parent = 135.0;
            let mut nodes = items(n);
            assign_angles(&mut nodes, Some(parent)).unwrap();
            for a in angles(&nodes) {
                assert!(
                    circular_distance(a, parent) >= 1.0,
                    "item at {} too close to back-link with {} items",
                    a,
                    n
                );
            }
        }
    }

    #[test]
    fn test_fixed_anchors_split_the_circle() {
        let mut nodes = items(3);
        nodes[0].fixed_angle = Some(10.0);
        nodes[2].fixed_angle = Some(350.0);
        assign_angles(&mut nodes, None).unwrap();
        // The free middle item is centered in the 10..350 wedge.
        assert_eq!(angles(&nodes), vec![10.0, 180.0, 350.0]);
    }

    #[test]
    fn test_wrap_around_wedge_is_filled() {
        // Two anchors; the second wedge wraps through 0. The free item at
        // index 2 sits between them, halfway through the wrapped span.
        let mut nodes = items(3);
        nodes[0].fixed_angle = Some(90.0);
        nodes[1].fixed_angle = Some(270.0);
        assign_angles(&mut nodes, None).unwrap();
        let got = angles(&nodes);
        assert_eq!(got[0], 90.0);
        assert_eq!(got[1], 270.0);
        assert!((got[2] - 0.0).abs() < 1e-9, "got {}", got[2]);
    }

    #[test]
    fn test_children_anchor_opposite_their_parent() {
        let mut nodes = items(1);
        nodes[0].children = items(1);
        assign_angles(&mut nodes, None).unwrap();
        // Parent sits at 90, so its children see a back-link at 270 and
        // the first child is pinned at 90 again.
        assert_eq!(nodes[0].angle, Some(90.0));
        assert_eq!(nodes[0].children[0].angle, Some(90.0));
    }

    #[test]
    fn test_back_link_tie_goes_to_back_link() {
        // One parent item at 90; its two children see the back-link at
        // 270. Slot positions land at 210/330 with a half-gap of 60, so
        // 210 + 60 == 270 is the documented tie: the back-link wins and
        // the second child shifts to 330.
        let mut nodes = items(1);
        nodes[0].children = items(2);
        assign_angles(&mut nodes, None).unwrap();
        let child_angles = angles(&nodes[0].children);
        assert_eq!(child_angles, vec![90.0, 330.0]);
    }

    #[test]
    fn test_deep_tree_fully_assigned() {
        let mut nodes = items(4);
        nodes[1].children = items(5);
        nodes[1].children[2].children = items(3);
        assign_angles(&mut nodes, None).unwrap();

        fn check(items: &[MenuItemNode]) {
            for item in items {
                let a = item.angle.expect("every node gets an angle");
                assert!((0.0..360.0).contains(&a));
                check(&item.children);
            }
        }
        check(&nodes);
    }

    #[test]
    fn test_conflict_in_subtree_propagates() {
        let mut nodes = items(1);
        nodes[0].children = items(2);
        nodes[0].children[0].fixed_angle = Some(300.0);
        nodes[0].children[1].fixed_angle = Some(100.0);
        assert_eq!(assign_angles(&mut nodes, None), Err(AngleConflict));
    }
}
