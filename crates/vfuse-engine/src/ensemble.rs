//! Multi-detector ensemble fusion.
//!
//! Reconciles the outputs of several independent detectors for one frame
//! into one detection per real object. An object survives only when at
//! least two detectors agree on it.
//!
//! # Algorithm
//! 1. Pool every detection, detectors in priority order.
//! 2. Walk the pool; each unconsumed detection seeds a cluster and absorbs
//!    every later unconsumed detection of the same class whose IoU with the
//!    seed exceeds the threshold.
//! 3. Emit clusters backed by enough distinct detectors as one averaged box
//!    with boosted confidence; drop the rest.
//!
//! Seeding is greedy and order-dependent: the pool order decides which
//! detections merge first on ambiguous overlaps. Clustering compares every
//! unconsumed pair per seed, so cost grows quadratically with the number of
//! boxes in a frame.

use tracing::debug;
use vfuse_models::{Detection, DetectorOutput, TrackId};

use crate::config::FusionConfig;
use crate::geometry;

/// Result of fusing one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FusedFrame {
    /// Agreed detections
    pub detections: Vec<Detection>,
    /// Clusters emitted
    pub clusters_emitted: usize,
    /// Clusters dropped for lack of agreement
    pub clusters_dropped: usize,
    /// True when a single detector's output passed through unfused
    pub passthrough: bool,
}

/// A pooled detection with the detector it came from.
struct Pooled<'a> {
    /// Index of the detector output after priority ordering
    source: usize,
    priority: u8,
    detection: &'a Detection,
}

/// Cross-validates detections from several detectors.
#[derive(Debug, Clone, Default)]
pub struct EnsembleFuser {
    config: FusionConfig,
}

impl EnsembleFuser {
    /// Create a fuser with the given configuration.
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FusionConfig::default())
    }

    /// Fuse the outputs every detector produced for one frame.
    ///
    /// With a single detector the output passes through unchanged; with none
    /// the result is empty.
    pub fn fuse_frame(&self, outputs: &[DetectorOutput]) -> FusedFrame {
        match outputs {
            [] => FusedFrame::default(),
            [single] => FusedFrame {
                detections: single.detections.clone(),
                passthrough: true,
                ..Default::default()
            },
            _ => self.fuse_clusters(outputs),
        }
    }

    fn fuse_clusters(&self, outputs: &[DetectorOutput]) -> FusedFrame {
        let mut ordered: Vec<&DetectorOutput> = outputs.iter().collect();
        ordered.sort_by_key(|o| o.detector.priority);

        let pool: Vec<Pooled<'_>> = ordered
            .iter()
            .enumerate()
            .flat_map(|(source, output)| {
                output.detections.iter().map(move |detection| Pooled {
                    source,
                    priority: output.detector.priority,
                    detection,
                })
            })
            .collect();

        let mut consumed = vec![false; pool.len()];
        let mut result = FusedFrame::default();

        for seed_idx in 0..pool.len() {
            if consumed[seed_idx] {
                continue;
            }
            consumed[seed_idx] = true;

            let seed = &pool[seed_idx];
            let mut cluster = vec![seed];

            for candidate_idx in (seed_idx + 1)..pool.len() {
                if consumed[candidate_idx] {
                    continue;
                }
                let candidate = &pool[candidate_idx];
                if candidate.detection.class_id != seed.detection.class_id {
                    continue;
                }
                if geometry::iou(&seed.detection.bbox, &candidate.detection.bbox)
                    > self.config.iou_threshold
                {
                    consumed[candidate_idx] = true;
                    cluster.push(candidate);
                }
            }

            if distinct_sources(&cluster) >= self.config.min_agreeing_detectors {
                if let Some(merged) = self.merge(&cluster) {
                    result.detections.push(merged);
                    result.clusters_emitted += 1;
                }
            } else {
                result.clusters_dropped += 1;
            }
        }

        debug!(
            detectors = outputs.len(),
            pooled = pool.len(),
            emitted = result.clusters_emitted,
            dropped = result.clusters_dropped,
            "Fused frame"
        );

        result
    }

    /// Merge an agreed cluster into one detection.
    fn merge(&self, cluster: &[&Pooled<'_>]) -> Option<Detection> {
        let seed = cluster.first()?.detection;
        let bbox = geometry::average(cluster.iter().map(|p| &p.detection.bbox))?;

        let mean_confidence =
            cluster.iter().map(|p| p.detection.confidence).sum::<f64>() / cluster.len() as f64;
        let confidence = (mean_confidence * self.config.agreement_bonus).clamp(0.0, 1.0);

        Some(Detection {
            frame: seed.frame,
            timestamp: seed.timestamp,
            class_id: seed.class_id,
            class_name: seed.class_name.clone(),
            confidence,
            bbox,
            track_id: forwarded_track_id(cluster),
            area: bbox.area(),
        })
    }
}

/// Number of distinct detectors contributing to a cluster.
fn distinct_sources(cluster: &[&Pooled<'_>]) -> usize {
    let mut sources: Vec<usize> = cluster.iter().map(|p| p.source).collect();
    sources.sort_unstable();
    sources.dedup();
    sources.len()
}

/// Track id of the highest-priority member that carries one.
fn forwarded_track_id(cluster: &[&Pooled<'_>]) -> Option<TrackId> {
    cluster
        .iter()
        .filter_map(|p| p.detection.track_id.map(|id| (p.priority, id)))
        .min_by_key(|(priority, _)| *priority)
        .map(|(_, id)| id)
}
