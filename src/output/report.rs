use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::pipeline::Reduction;
use crate::reducer::ProjectedPoint;
use crate::trace::TraceStore;

#[derive(Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub generator: String,
    pub created_at: String,
    pub rng_seed: u64,
    pub stats: ReportStats,
    pub bandwidth: f64,
    pub degenerate: bool,
    pub clusters: Vec<ClusterSummary>,
    pub selected: Vec<SelectedSeed>,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportStats {
    pub seed_count: usize,
    pub skipped_count: usize,
    pub sample_size: usize,
    pub cluster_count: usize,
    pub selected_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: u32,
    pub center: ProjectedPoint,
    pub size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectedSeed {
    pub name: String,
    pub cluster: u32,
    pub size: u64,
    pub sha256: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: String,
}

/// SHA-256 of a file, streamed through the hasher
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

impl RunReport {
    /// Summarise a finished reduction. Hashes every selected seed file.
    pub fn build(store: &TraceStore, reduction: &Reduction) -> Result<Self> {
        let clusters = reduction
            .clusters
            .clusters
            .iter()
            .map(|c| ClusterSummary {
                id: c.id,
                center: c.center,
                size: c.len(),
            })
            .collect();

        let mut selected = Vec::with_capacity(reduction.selection.len());
        for id in reduction.selection.iter() {
            let seed = store
                .seed(id)
                .context(format!("Selected seed {} missing from store", id))?;
            let sha256 = hash_file(&seed.path)
                .context(format!("Failed to hash seed {}", seed.name))?;

            selected.push(SelectedSeed {
                name: seed.name.clone(),
                cluster: reduction.selection.cluster_of(id).unwrap_or_default(),
                size: seed.size,
                sha256,
            });
        }

        let skipped = store
            .skipped()
            .iter()
            .map(|s| SkippedEntry {
                name: s.name.clone(),
                reason: s.reason.to_string(),
            })
            .collect();

        Ok(Self {
            generator: format!("seedsift v{}", env!("CARGO_PKG_VERSION")),
            created_at: Utc::now().to_rfc3339(),
            rng_seed: reduction.rng_seed,
            stats: ReportStats {
                seed_count: store.len(),
                skipped_count: store.skipped().len(),
                sample_size: reduction.sample_size,
                cluster_count: reduction.clusters.len(),
                selected_count: reduction.selection.len(),
            },
            bandwidth: reduction.clusters.bandwidth,
            degenerate: reduction.clusters.degenerate,
            clusters,
            selected,
            skipped,
        })
    }

    /// Write the report as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(path, json).context(format!("Failed to write report to {}", path.display()))?;
        Ok(())
    }
}
