//! Revealer Registry
//!
//! Tracks which identities currently grant vision and how far they see.
//! Positions are not stored here: they are looked up through a
//! [`PositionSource`] every tick so a moving revealer is never stale.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::warn;

use crate::mapping::WorldPoint;

/// Supplies the live world position of a revealer.
///
/// Returning `None` means the position is unavailable this tick (the owning
/// entity was destroyed or lost its transform). The revealer is skipped, not
/// removed.
pub trait PositionSource<K> {
    fn position(&self, id: &K) -> Option<WorldPoint>;
}

impl<K, F> PositionSource<K> for F
where
    F: Fn(&K) -> Option<WorldPoint>,
{
    fn position(&self, id: &K) -> Option<WorldPoint> {
        self(id)
    }
}

impl<K: Eq + Hash> PositionSource<K> for HashMap<K, WorldPoint> {
    fn position(&self, id: &K) -> Option<WorldPoint> {
        self.get(id).copied()
    }
}

/// A registered revealer with its position resolved for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveRevealer<'a, K> {
    pub id: &'a K,
    pub position: WorldPoint,
    pub radius: f32,
}

/// Set of revealers keyed by identity. Each identity appears at most once.
#[derive(Debug, Clone)]
pub struct RevealerRegistry<K> {
    radii: HashMap<K, f32>,
}

impl<K> Default for RevealerRegistry<K> {
    fn default() -> Self {
        Self {
            radii: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> RevealerRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a revealer. Returns `false` (and keeps the existing radius) if
    /// the identity is already registered.
    pub fn register(&mut self, id: K, radius: f32) -> bool {
        if self.radii.contains_key(&id) {
            return false;
        }
        self.radii.insert(id, sanitize_radius(radius));
        true
    }

    /// Removes a revealer. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: &K) -> bool {
        self.radii.remove(id).is_some()
    }

    /// Changes the radius of a registered revealer. Returns `false` if the
    /// identity is unknown.
    pub fn set_radius(&mut self, id: &K, radius: f32) -> bool {
        match self.radii.get_mut(id) {
            Some(r) => {
                *r = sanitize_radius(radius);
                true
            }
            None => false,
        }
    }

    pub fn radius(&self, id: &K) -> Option<f32> {
        self.radii.get(id).copied()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.radii.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn clear(&mut self) {
        self.radii.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.radii.keys()
    }

    /// Iterates the members whose position can be resolved right now.
    pub fn active<'a, P>(&'a self, positions: &'a P) -> impl Iterator<Item = ActiveRevealer<'a, K>> + 'a
    where
        P: PositionSource<K> + ?Sized,
    {
        self.radii.iter().filter_map(move |(id, &radius)| {
            positions.position(id).map(|position| ActiveRevealer {
                id,
                position,
                radius,
            })
        })
    }
}

fn sanitize_radius(radius: f32) -> f32 {
    if radius.is_finite() && radius >= 0.0 {
        radius
    } else {
        warn!(radius, "invalid vision radius clamped to zero");
        0.0
    }
}
