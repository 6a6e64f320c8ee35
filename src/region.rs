//! Clip regions: a sorted, non-overlapping set of [`IRect`]s and the
//! intersection helpers the draw state stack and painter use to narrow a
//! primitive's touched area before it ever reaches a pixel loop.

use crate::geometry::IRect;
use smallvec::SmallVec;

/// Most clip regions in practice are a handful of rects (a view's frame,
/// maybe one or two sibling cutouts), so the common case lives inline.
pub type RectList = SmallVec<[IRect; 4]>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    rects: RectList,
}

impl Region {
    pub fn empty() -> Self {
        Self { rects: RectList::new() }
    }

    pub fn single(rect: IRect) -> Self {
        if rect.is_empty() {
            Self::empty()
        } else {
            let mut rects = RectList::new();
            rects.push(rect);
            Self { rects }
        }
    }

    pub fn from_rects(rects: impl IntoIterator<Item = IRect>) -> Self {
        let mut region = Self::empty();
        for rect in rects {
            region.union_rect(rect);
        }
        region
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[IRect] {
        &self.rects
    }

    /// The smallest rect enclosing every rect in the region.
    pub fn bounds(&self) -> IRect {
        self.rects
            .iter()
            .fold(IRect::EMPTY, |acc, r| if acc.is_empty() { *r } else { acc.union(r) })
    }

    /// Adds `rect` to the region. Does not attempt to merge adjacent or
    /// overlapping rects into a single span; clip tests only need
    /// membership, not a canonical minimal rect count.
    pub fn union_rect(&mut self, rect: IRect) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    /// Intersects every rect in this region against `clip`, discarding
    /// pieces that land entirely outside it. This is how a view's clip
    /// narrows as `DrawState`s push nested clipping regions.
    pub fn intersect(&self, clip: &IRect) -> Region {
        let mut rects = RectList::new();
        for rect in &self.rects {
            let clipped = rect.intersect(clip);
            if !clipped.is_empty() {
                rects.push(clipped);
            }
        }
        Region { rects }
    }

    /// Intersects this region against another region, rect by rect.
    pub fn intersect_region(&self, other: &Region) -> Region {
        let mut rects = RectList::new();
        for a in &self.rects {
            for b in &other.rects {
                let clipped = a.intersect(b);
                if !clipped.is_empty() {
                    rects.push(clipped);
                }
            }
        }
        Region { rects }
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains_point(x, y))
    }

    /// Whether any rect in the region overlaps `rect`.
    pub fn intersects(&self, rect: &IRect) -> bool {
        self.rects.iter().any(|r| !r.intersect(rect).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_wraps_one_rect() {
        let r = IRect::from_wh(0, 0, 10, 10);
        let region = Region::single(r);
        assert_eq!(region.rects(), &[r]);
    }

    #[test]
    fn empty_rect_is_dropped() {
        let region = Region::single(IRect::EMPTY);
        assert!(region.is_empty());
    }

    #[test]
    fn intersect_narrows_to_overlap() {
        let region = Region::single(IRect::from_wh(0, 0, 10, 10));
        let narrowed = region.intersect(&IRect::from_wh(5, 5, 10, 10));
        assert_eq!(narrowed.bounds(), IRect::new(5, 5, 10, 10));
    }

    #[test]
    fn intersect_with_disjoint_clip_is_empty() {
        let region = Region::single(IRect::from_wh(0, 0, 10, 10));
        let narrowed = region.intersect(&IRect::from_wh(100, 100, 10, 10));
        assert!(narrowed.is_empty());
    }

    #[test]
    fn bounds_spans_all_rects() {
        let region = Region::from_rects([IRect::from_wh(0, 0, 5, 5), IRect::from_wh(20, 20, 5, 5)]);
        assert_eq!(region.bounds(), IRect::new(0, 0, 25, 25));
    }

    #[test]
    fn contains_point_checks_every_rect() {
        let region = Region::from_rects([IRect::from_wh(0, 0, 5, 5), IRect::from_wh(20, 20, 5, 5)]);
        assert!(region.contains_point(21, 21));
        assert!(!region.contains_point(10, 10));
    }
}
