use crate::corpus::SeedId;
use crate::reducer::ProjectedPoint;

#[derive(Debug, Clone)]
pub struct Cluster {
    pub id: u32,
    pub members: Vec<SeedId>,
    pub center: ProjectedPoint,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ClusterResult {
    pub clusters: Vec<Cluster>,
    /// Cluster id of every input point, in input order
    pub labels: Vec<u32>,
    /// Bandwidth the clustering actually ran with
    pub bandwidth: f64,
    /// Set when the bandwidth was unusable and everything fell into one cluster
    pub degenerate: bool,
}

impl ClusterResult {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
