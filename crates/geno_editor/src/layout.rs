//! Layout state: where each node sits and how big it is.
//!
//! Kept apart from the genogram so that moving or resizing never touches
//! domain records. Only people and annotations are placed; relationship
//! routes are derived by the renderer.

use std::collections::BTreeMap;

use geno_core::{EntityId, GridPoint, Rect, SizeClass};
use serde::{Deserialize, Serialize};

/// Geometry of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Top-left corner, on the grid
    pub position: GridPoint,
    #[serde(default)]
    pub size: SizeClass,
}

impl Placement {
    pub fn new(position: GridPoint, size: SizeClass) -> Self {
        Self { position, size }
    }

    /// Placement snapped onto the grid
    pub fn snapped(position: GridPoint, size: SizeClass) -> Self {
        Self {
            position: position.snapped(),
            size,
        }
    }

    pub fn bounds(&self) -> Rect {
        let extent = self.size.extent();
        Rect {
            x: self.position.x,
            y: self.position.y,
            width: extent,
            height: extent,
        }
    }

    /// Center of the bounding box, where edges attach
    pub fn center(&self) -> GridPoint {
        let half = self.size.extent() / 2;
        GridPoint::new(self.position.x + half, self.position.y + half)
    }
}

/// Entity id to placement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutState {
    placements: BTreeMap<EntityId, Placement>,
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: EntityId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.placements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Placement)> {
        self.placements.iter().map(|(id, placement)| (*id, placement))
    }

    /// Entities whose bounding box contains `point`, in id order
    pub fn hit_test(&self, point: GridPoint) -> impl Iterator<Item = EntityId> + '_ {
        self.placements
            .iter()
            .filter(move |(_, placement)| placement.bounds().contains(point))
            .map(|(id, _)| *id)
    }

    /// Union of all bounding boxes, `None` when nothing is placed
    pub fn extent(&self) -> Option<Rect> {
        let mut iter = self.placements.values().map(Placement::bounds);
        let first = iter.next()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x + first.width, first.y + first.height);
        for rect in iter {
            min_x = min_x.min(rect.x);
            min_y = min_y.min(rect.y);
            max_x = max_x.max(rect.x + rect.width);
            max_y = max_y.max(rect.y + rect.height);
        }
        Some(Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    pub(crate) fn insert(&mut self, id: EntityId, placement: Placement) -> Option<Placement> {
        self.placements.insert(id, placement)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Placement> {
        self.placements.remove(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Placement> {
        self.placements.get_mut(&id)
    }
}
