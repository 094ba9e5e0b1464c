//! Delivery locations and bandit drop-offs.

use courier_events::{DeliveryId, HqId, PackageId};
use glam::Vec3;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// A fixed place packages are delivered to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryLocation {
    pub id: DeliveryId,
    pub position: Vec3,
    pub radius: f32,
}

impl DeliveryLocation {
    pub fn contains(&self, point: Vec3) -> bool {
        self.position.distance(point) <= self.radius
    }
}

/// A bandit drop-off point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BanditHq {
    pub id: HqId,
    pub position: Vec3,
    pub radius: f32,
}

impl BanditHq {
    pub fn contains(&self, point: Vec3) -> bool {
        self.position.distance(point) <= self.radius
    }
}

/// Registry of HQs and which HQ each stolen package is bound for.
#[derive(Debug, Clone, Default)]
pub struct BanditHqs {
    hqs: Vec<BanditHq>,
    claims: BTreeMap<PackageId, HqId>,
}

impl BanditHqs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, position: Vec3, radius: f32) -> HqId {
        let id = HqId(self.hqs.len() as u32);
        self.hqs.push(BanditHq {
            id,
            position,
            radius,
        });
        id
    }

    pub fn get(&self, id: HqId) -> Option<&BanditHq> {
        self.hqs.get(id.index() as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BanditHq> {
        self.hqs.iter()
    }

    pub fn len(&self) -> usize {
        self.hqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hqs.is_empty()
    }

    /// Binds a package to a random HQ. A package keeps the HQ it was first
    /// bound to. Returns the HQ and whether the claim is new.
    pub fn claim<R: Rng>(&mut self, package: PackageId, rng: &mut R) -> Option<(HqId, bool)> {
        if let Some(hq) = self.claims.get(&package) {
            return Some((*hq, false));
        }
        if self.hqs.is_empty() {
            return None;
        }
        let hq = self.hqs[rng.gen_range(0..self.hqs.len())].id;
        self.claims.insert(package, hq);
        debug!(%package, %hq, "package claimed");
        Some((hq, true))
    }

    /// The HQ a package is bound for.
    pub fn claimed_hq(&self, package: PackageId) -> Option<&BanditHq> {
        self.claims.get(&package).and_then(|id| self.get(*id))
    }

    pub fn release(&mut self, package: PackageId) -> bool {
        self.claims.remove(&package).is_some()
    }

    pub fn clear_claims(&mut self) {
        self.claims.clear();
    }
}
