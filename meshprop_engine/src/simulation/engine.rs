//! Simulation engine implementation.
//!
//! The `SimulationEngine` implements the `MeshEngine` trait on top of
//! volume-only meshes, so the propagation controller can be developed and
//! tested without a real mesh-tracking backend.

use std::cell::Cell;
use std::collections::BTreeMap;

use tracing::{debug, info};

use meshprop_common::engine::{EngineDiagnostics, EngineError, MeshEngine};
use meshprop_common::track::{FrameIndex, MeshSlot, TrackId};

use super::mesh::{SimMesh, SimTrack, SimTrackConfig};

/// Simulation engine implementing the `MeshEngine` trait.
#[derive(Debug)]
pub struct SimulationEngine {
    /// Sequence length.
    frame_count: FrameIndex,
    /// Tracks keyed by id.
    tracks: BTreeMap<TrackId, SimTrack>,
    /// Next id handed out by `add_track`.
    next_id: u32,
    /// Call counters (volume queries go through `&self`).
    seeds: u64,
    deforms: u64,
    remeshes: u64,
    volume_queries: Cell<u64>,
}

impl SimulationEngine {
    /// Create an empty engine over a sequence of `frame_count` frames.
    pub fn new(frame_count: FrameIndex) -> Self {
        Self {
            frame_count,
            tracks: BTreeMap::new(),
            next_id: 0,
            seeds: 0,
            deforms: 0,
            remeshes: 0,
            volume_queries: Cell::new(0),
        }
    }

    /// Build an engine from scenario track descriptions.
    ///
    /// Ids are assigned in order: `TrackId(0)` for the first entry, and so on.
    ///
    /// # Errors
    /// `EngineError::FrameOutOfRange` if a configured frame is outside the sequence.
    pub fn from_configs(
        frame_count: FrameIndex,
        start_frame: FrameIndex,
        configs: &[SimTrackConfig],
    ) -> Result<Self, EngineError> {
        let mut engine = Self::new(frame_count);
        for config in configs {
            engine.add_track(SimTrack::from_config(config, start_frame))?;
        }
        info!(
            "Simulation engine ready: {} tracks over {} frames",
            engine.tracks.len(),
            frame_count
        );
        Ok(engine)
    }

    /// Register a track and return its id.
    pub fn add_track(&mut self, track: SimTrack) -> Result<TrackId, EngineError> {
        if let Some(frame) = track.frames().find(|&f| f >= self.frame_count) {
            return Err(EngineError::FrameOutOfRange {
                frame,
                frame_count: self.frame_count,
            });
        }
        let id = TrackId(self.next_id);
        self.next_id += 1;
        debug!("Registered simulated track {} as {id}", track.name);
        self.tracks.insert(id, track);
        Ok(id)
    }

    /// Look up a track by id.
    pub fn track(&self, id: TrackId) -> Option<&SimTrack> {
        self.tracks.get(&id)
    }

    /// Look up a track id by name.
    pub fn find_track(&self, name: &str) -> Option<TrackId> {
        self.tracks
            .iter()
            .find(|(_, t)| t.name == name)
            .map(|(&id, _)| id)
    }

    /// All track ids, ascending.
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.tracks.keys().copied().collect()
    }

    /// Mesh in `slot`, if any.
    pub fn mesh(&self, slot: MeshSlot) -> Option<&SimMesh> {
        self.tracks.get(&slot.track)?.meshes.get(&slot.frame)
    }

    fn mesh_mut(&mut self, slot: MeshSlot) -> Result<&mut SimMesh, EngineError> {
        self.tracks
            .get_mut(&slot.track)
            .ok_or(EngineError::UnknownTrack(slot.track))?
            .meshes
            .get_mut(&slot.frame)
            .ok_or(EngineError::MissingMesh(slot))
    }

    /// Copy the mesh at `from` into `to`, applying a collapse if configured.
    fn seed_between(
        &mut self,
        id: TrackId,
        from: FrameIndex,
        to: Option<FrameIndex>,
    ) -> Result<(), EngineError> {
        let frame_count = self.frame_count;
        let track = self
            .tracks
            .get_mut(&id)
            .ok_or(EngineError::UnknownTrack(id))?;
        let source = track
            .meshes
            .get(&from)
            .ok_or(EngineError::MissingNeighborMesh {
                track: id,
                frame: from,
            })?;
        let to = match to {
            Some(to) if to < frame_count => to,
            Some(to) => {
                return Err(EngineError::FrameOutOfRange {
                    frame: to,
                    frame_count,
                });
            }
            None => {
                return Err(EngineError::FrameOutOfRange {
                    frame: from,
                    frame_count,
                });
            }
        };
        if track.meshes.contains_key(&to) {
            return Ok(());
        }

        let mut seeded = source.seeded_copy();
        if track.collapse_at == Some(to) {
            seeded.volume *= track.collapse_factor;
            debug!("{id} collapses at frame {to}: volume -> {}", seeded.volume);
        }
        track.meshes.insert(to, seeded);
        self.seeds += 1;
        Ok(())
    }
}

impl MeshEngine for SimulationEngine {
    fn frame_count(&self) -> FrameIndex {
        self.frame_count
    }

    fn has_frame(&self, track: TrackId, frame: FrameIndex) -> bool {
        self.mesh(MeshSlot::new(track, frame)).is_some()
    }

    fn track_forward(&mut self, track: TrackId, from: FrameIndex) -> Result<(), EngineError> {
        self.seed_between(track, from, from.checked_add(1))
    }

    fn track_backward(&mut self, track: TrackId, from: FrameIndex) -> Result<(), EngineError> {
        self.seed_between(track, from, from.checked_sub(1))
    }

    fn deform(&mut self, slot: MeshSlot, _iterations: u32) -> Result<(), EngineError> {
        let rate = self
            .tracks
            .get(&slot.track)
            .ok_or(EngineError::UnknownTrack(slot.track))?
            .deform_rate;
        let mesh = self.mesh_mut(slot)?;
        mesh.volume *= 1.0 + rate;
        mesh.deform_passes += 1;
        self.deforms += 1;
        Ok(())
    }

    fn remesh(&mut self, slot: MeshSlot, min_len: f64, max_len: f64) -> Result<(), EngineError> {
        if min_len >= max_len {
            return Err(EngineError::Backend(format!(
                "remesh bounds [{min_len}, {max_len}] are empty"
            )));
        }
        let mesh = self.mesh_mut(slot)?;
        mesh.remesh_passes += 1;
        self.remeshes += 1;
        Ok(())
    }

    fn compute_volume(&self, slot: MeshSlot) -> Result<f64, EngineError> {
        let track = self
            .tracks
            .get(&slot.track)
            .ok_or(EngineError::UnknownTrack(slot.track))?;
        let mesh = track
            .meshes
            .get(&slot.frame)
            .ok_or(EngineError::MissingMesh(slot))?;
        self.volume_queries.set(self.volume_queries.get() + 1);
        Ok(mesh.volume)
    }

    fn track_name(&self, track: TrackId) -> Option<&str> {
        self.tracks.get(&track).map(|t| t.name.as_str())
    }

    fn diagnostics(&self) -> Option<EngineDiagnostics> {
        Some(EngineDiagnostics {
            seeds: self.seeds,
            deforms: self.deforms,
            remeshes: self.remeshes,
            volume_queries: self.volume_queries.get(),
        })
    }
}
