//! Safe ordering for overlapping region copies.
//!
//! Copying rectangles that overlap their own destination is only correct in
//! a particular order. This builds the dependency DAG the spec describes
//! (`A -> B` when copying `A` would overwrite pixels `B` still needs) and
//! resolves it with an explicit adjacency list plus Kahn's algorithm,
//! rather than the hand-rolled stack-of-nodes-plus-selection-sort the
//! original uses — correctness depends only on the edge rule, not the sort.

use crate::geometry::IRect;

/// Returns `rects` in an order safe to copy by `(dx, dy)`: for a positive X
/// offset, a rect strictly left of another must copy first (it would
/// otherwise be overwritten by the later copy reading from where it still
/// sits); symmetric for Y. Ties (no edge either way) keep their relative
/// input order, since no dependency constrains them.
pub fn safe_copy_order(rects: &[IRect], dx: i32, dy: i32) -> Vec<IRect> {
    let n = rects.len();
    if n <= 1 {
        return rects.to_vec();
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];

    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            if depends_before(&rects[a], &rects[b], dx, dy) {
                adjacency[a].push(b);
                in_degree[b] += 1;
            }
        }
    }

    let mut queue: std::collections::VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &next in &adjacency[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    // A cycle can't arise from the strict left-of/above-of edge rule (it's
    // a partial order along a single axis per call), but fall back to input
    // order defensively if in-degrees never fully drained.
    if order.len() != n {
        return rects.to_vec();
    }
    order.into_iter().map(|i| rects[i]).collect()
}

/// Whether `a` must be copied before `b` when shifting by `(dx, dy)`.
fn depends_before(a: &IRect, b: &IRect, dx: i32, dy: i32) -> bool {
    if dx > 0 && a.right <= b.left {
        return true;
    }
    if dx < 0 && a.left >= b.right {
        return true;
    }
    if dy > 0 && a.bottom <= b.top {
        return true;
    }
    if dy < 0 && a.top >= b.bottom {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_x_offset_orders_left_rects_first() {
        let left = IRect::from_wh(0, 0, 10, 10);
        let right = IRect::from_wh(20, 0, 10, 10);
        let order = safe_copy_order(&[right, left], 5, 0);
        assert_eq!(order, vec![left, right]);
    }

    #[test]
    fn negative_x_offset_orders_right_rects_first() {
        let left = IRect::from_wh(0, 0, 10, 10);
        let right = IRect::from_wh(20, 0, 10, 10);
        let order = safe_copy_order(&[left, right], -5, 0);
        assert_eq!(order, vec![right, left]);
    }

    #[test]
    fn unrelated_rects_keep_input_order() {
        let a = IRect::from_wh(0, 0, 10, 10);
        let b = IRect::from_wh(0, 100, 10, 10);
        let order = safe_copy_order(&[a, b], 5, 0);
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn single_rect_is_unchanged() {
        let a = IRect::from_wh(0, 0, 10, 10);
        assert_eq!(safe_copy_order(&[a], 1, 0), vec![a]);
    }
}
