//! Representative selection.
//!
//! Clusters are visited in ascending id order and every draw comes from the
//! caller's RNG, so a fixed seed gives a fixed selection.

#[cfg(test)]
mod tests;

use crate::clusterer::Cluster;
use crate::corpus::SeedId;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

pub const DEFAULT_PER_CLUSTER: usize = 1;

/// Seeds picked for one cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPick {
    pub cluster: u32,
    pub seeds: Vec<SeedId>,
    /// How many of `seeds` had already been selected for an earlier cluster
    pub reused: usize,
}

/// The seeds chosen for output
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    seeds: BTreeSet<SeedId>,
    picks: Vec<ClusterPick>,
}

impl SelectionSet {
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn contains(&self, id: SeedId) -> bool {
        self.seeds.contains(&id)
    }

    /// Selected ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = SeedId> + '_ {
        self.seeds.iter().copied()
    }

    pub fn picks(&self) -> &[ClusterPick] {
        &self.picks
    }

    /// First cluster that picked `id`
    pub fn cluster_of(&self, id: SeedId) -> Option<u32> {
        self.picks
            .iter()
            .find(|p| p.seeds.contains(&id))
            .map(|p| p.cluster)
    }
}

#[derive(Debug, Clone)]
pub struct SeedSelector {
    pub per_cluster: usize,
    /// Draw from members already selected for an earlier cluster first
    pub prefer_overlap: bool,
}

impl SeedSelector {
    pub fn new(per_cluster: usize) -> Self {
        Self {
            per_cluster,
            prefer_overlap: true,
        }
    }

    pub fn prefer_overlap(mut self, enabled: bool) -> Self {
        self.prefer_overlap = enabled;
        self
    }

    pub fn select<R: Rng + ?Sized>(&self, clusters: &[Cluster], rng: &mut R) -> SelectionSet {
        let mut ordered: Vec<&Cluster> = clusters.iter().collect();
        ordered.sort_by_key(|c| c.id);

        let mut selection = SelectionSet::default();

        for cluster in ordered {
            let mut members = cluster.members.clone();
            members.sort_unstable();
            members.dedup();

            let quota = self.per_cluster.min(members.len());
            let (overlap, fresh): (Vec<SeedId>, Vec<SeedId>) = if self.prefer_overlap {
                members
                    .into_iter()
                    .partition(|id| selection.seeds.contains(id))
            } else {
                (Vec::new(), members)
            };

            let mut chosen: Vec<SeedId> = Vec::with_capacity(quota);
            if !overlap.is_empty() {
                chosen.extend(overlap.choose_multiple(rng, quota).copied());
            }
            let reused = chosen.len();
            chosen.extend(fresh.choose_multiple(rng, quota - reused).copied());
            chosen.sort_unstable();

            debug!(cluster = cluster.id, picked = chosen.len(), reused, "selected representatives");

            selection.seeds.extend(chosen.iter().copied());
            selection.picks.push(ClusterPick {
                cluster: cluster.id,
                seeds: chosen,
                reused,
            });
        }

        selection
    }
}

impl Default for SeedSelector {
    fn default() -> Self {
        Self::new(DEFAULT_PER_CLUSTER)
    }
}
