//! Owns the loaded chunks and drives lighting for loads, unloads, and edits.
#![forbid(unsafe_code)]

use std::error::Error;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use hashbrown::HashSet;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Deserialize;
use voxlight_blocks::{Block, BlockRegistry};
use voxlight_chunk::{Chunk, ChunkMap};
use voxlight_lighting::{
    LightPassStats, LightSample, LightingEngine, RemeshSink, apply_block_change, cast_columns,
    light_at,
};
use voxlight_world::{BlockPos, ChunkCoord, WorldDims};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Threads for first-load column casts; defaults to available parallelism.
    pub workers: Option<usize>,
}

/// Forwards remesh requests into a crossbeam channel.
#[derive(Clone)]
pub struct ChannelSink {
    tx: Sender<ChunkCoord>,
}

impl ChannelSink {
    pub fn new(tx: Sender<ChunkCoord>) -> Self {
        Self { tx }
    }
}

impl RemeshSink for ChannelSink {
    fn request_remesh(&mut self, coord: ChunkCoord) {
        // Fails only once every receiver is gone.
        let _ = self.tx.send(coord);
    }
}

pub struct LightRuntime {
    reg: Arc<BlockRegistry>,
    map: ChunkMap,
    cast_pool: ThreadPool,
    remesh_tx: Sender<ChunkCoord>,
    remesh_rx: Receiver<ChunkCoord>,
}

impl LightRuntime {
    pub fn new(
        reg: Arc<BlockRegistry>,
        dims: WorldDims,
        cfg: &RuntimeConfig,
    ) -> Result<Self, Box<dyn Error>> {
        dims.validate()?;
        let workers = cfg
            .workers
            .filter(|&n| n > 0)
            .unwrap_or_else(|| thread::available_parallelism().map(|n| n.get()).unwrap_or(4));
        let cast_pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("voxlight-cast-{i}"))
            .build()?;
        let (remesh_tx, remesh_rx) = unbounded::<ChunkCoord>();
        log::info!("light runtime: {} cast workers, dims {:?}", workers, dims);
        Ok(Self {
            reg,
            map: ChunkMap::new(dims),
            cast_pool,
            remesh_tx,
            remesh_rx,
        })
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    pub fn map(&self) -> &ChunkMap {
        &self.map
    }

    pub fn dims(&self) -> WorldDims {
        self.map.dims()
    }

    pub fn workers(&self) -> usize {
        self.cast_pool.current_num_threads()
    }

    /// Extra receiver for consumers on other threads.
    pub fn remesh_receiver(&self) -> Receiver<ChunkCoord> {
        self.remesh_rx.clone()
    }

    /// Light and insert freshly generated or loaded chunks. Column casts run
    /// on the worker pool; seeding and propagation then run here, one chunk
    /// at a time. Every loaded chunk is queued for a remesh.
    pub fn load_chunks(
        &mut self,
        mut chunks: Vec<Chunk>,
    ) -> Result<LightPassStats, Box<dyn Error>> {
        let dims = self.map.dims();
        let mut seen = HashSet::new();
        for c in &chunks {
            if c.dims != dims {
                return Err(format!(
                    "chunk {:?} has dims {:?}, runtime expects {:?}",
                    c.coord, c.dims, dims
                )
                .into());
            }
            if !seen.insert(c.coord) {
                return Err(format!("chunk {:?} appears twice in one load", c.coord).into());
            }
        }

        let reg = self.reg.as_ref();
        let lit: usize = self
            .cast_pool
            .install(|| chunks.par_iter_mut().map(|c| cast_columns(c, reg)).sum());

        let coords: Vec<ChunkCoord> = chunks.iter().map(|c| c.coord).collect();
        for chunk in chunks {
            if let Some(old) = self.map.insert(chunk)? {
                log::warn!("chunk {:?} reloaded without unload", old.coord);
            }
        }

        let engine = LightingEngine::new(&self.reg);
        let mut sink = ChannelSink::new(self.remesh_tx.clone());
        let mut total = LightPassStats::default();
        for &coord in &coords {
            engine.seed_first_time(&mut self.map, coord);
            add_stats(&mut total, engine.calculate_light(&mut self.map, coord, &mut sink));
        }
        for &coord in &coords {
            sink.request_remesh(coord);
        }
        log::info!(
            "loaded {} chunks: {} open cells cast, {} light nodes",
            coords.len(),
            lit,
            total.nodes()
        );
        Ok(total)
    }

    /// Drop `coord` from the map. The returned chunk has its light and queues
    /// reset, ready to be loaded again.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let mut chunk = self.map.remove(coord)?;
        chunk.reset_light();
        log::info!("unloaded chunk {:?}", coord);
        Some(chunk)
    }

    /// Edit one block and relight. Returns the replaced block, or `None` if
    /// `pos` is not loaded.
    pub fn set_block(&mut self, pos: BlockPos, block: Block) -> Option<Block> {
        let old = apply_block_change(&mut self.map, &self.reg, pos, block)?;
        let home = self.map.dims().chunk_of(pos);
        let engine = LightingEngine::new(&self.reg);
        let mut sink = ChannelSink::new(self.remesh_tx.clone());
        engine.calculate_light(&mut self.map, home, &mut sink);
        sink.request_remesh(home);
        for c in self.map.neighbor_chunks(pos) {
            sink.request_remesh(c);
        }
        Some(old)
    }

    /// Run `calculate_light` on every chunk that still has queued work.
    pub fn flush(&mut self) -> usize {
        let engine = LightingEngine::new(&self.reg);
        let mut sink = ChannelSink::new(self.remesh_tx.clone());
        let pending: Vec<ChunkCoord> = self
            .map
            .iter()
            .filter(|c| !c.queues.is_drained())
            .map(|c| c.coord)
            .collect();
        for &coord in &pending {
            engine.calculate_light(&mut self.map, coord, &mut sink);
        }
        pending.len()
    }

    /// Non-blocking pull of every remesh request so far.
    pub fn drain_remesh(&self) -> Vec<ChunkCoord> {
        self.remesh_rx.try_iter().collect()
    }

    pub fn light_at(&self, pos: BlockPos) -> LightSample {
        light_at(&self.map, pos)
    }

    pub fn block_at(&self, pos: BlockPos) -> Option<Block> {
        self.map.voxel(pos).map(|v| self.map.block(v))
    }
}

fn add_stats(total: &mut LightPassStats, s: LightPassStats) {
    total.sky_removed += s.sky_removed;
    total.sky_placed += s.sky_placed;
    total.block_removed += s.block_removed;
    total.block_placed += s.block_placed;
    total.columns += s.columns;
    total.remeshed += s.remeshed;
}
