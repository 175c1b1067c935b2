use crate::{Distance, Pt3D};

/// Answers nearest-point queries over a keyed set of points with a plain
/// scan; the sets queried here (waypoints, scenario triggers, one route's
/// dense path) are small enough that an acceleration structure doesn't pay.
///
/// When several points are exactly equidistant from the query, the one added
/// earliest wins, so tie-breaks are stable across runs.
pub struct FindClosest<K> {
    entries: Vec<(K, Pt3D)>,
}

impl<K: Clone> FindClosest<K> {
    pub fn new() -> FindClosest<K> {
        FindClosest {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K, pt: Pt3D) {
        self.entries.push((key, pt));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The closest point to `query`, no matter how far away.
    pub fn closest(&self, query: Pt3D) -> Option<(K, Pt3D, Distance)> {
        let mut best: Option<(usize, Distance)> = None;
        for (idx, (_, pt)) in self.entries.iter().enumerate() {
            let dist = pt.dist_to(query);
            if best.map(|(_, d)| dist < d).unwrap_or(true) {
                best = Some((idx, dist));
            }
        }
        best.map(|(idx, dist)| {
            let (key, pt) = &self.entries[idx];
            (key.clone(), *pt, dist)
        })
    }

    /// The closest point, but only if it lies strictly within `max_dist` of
    /// the query.
    pub fn closest_within(&self, query: Pt3D, max_dist: Distance) -> Option<(K, Pt3D, Distance)> {
        self.closest(query).filter(|(_, _, dist)| *dist < max_dist)
    }
}

impl<K: Clone> Default for FindClosest<K> {
    fn default() -> FindClosest<K> {
        FindClosest::new()
    }
}
