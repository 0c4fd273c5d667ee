use voxlight_blocks::{BlockRegistry, MAX_LIGHT};
use voxlight_chunk::{ChunkMap, LightNode, LightQueues, VoxelRef};
use voxlight_world::{ChunkCoord, Face};

use crate::RemeshSink;

/// Work done by one `calculate_light` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightPassStats {
    pub sky_removed: usize,
    pub sky_placed: usize,
    pub block_removed: usize,
    pub block_placed: usize,
    /// Sun rays extended or cut from the column worklists.
    pub columns: usize,
    pub remeshed: usize,
}

impl LightPassStats {
    pub fn nodes(&self) -> usize {
        self.sky_removed + self.sky_placed + self.block_removed + self.block_placed
    }

    pub fn is_empty(&self) -> bool {
        self.nodes() == 0 && self.columns == 0 && self.remeshed == 0
    }
}

/// Incremental sky and block light propagation over a `ChunkMap`.
#[derive(Clone, Copy)]
pub struct LightingEngine<'r> {
    reg: &'r BlockRegistry,
}

impl<'r> LightingEngine<'r> {
    pub fn new(reg: &'r BlockRegistry) -> Self {
        Self { reg }
    }

    #[inline]
    pub fn registry(&self) -> &'r BlockRegistry {
        self.reg
    }

    /// Drain every queue owned by chunk `coord`, then notify `sink` once for
    /// each other chunk whose light changed.
    pub fn calculate_light<S: RemeshSink + ?Sized>(
        &self,
        map: &mut ChunkMap,
        coord: ChunkCoord,
        sink: &mut S,
    ) -> LightPassStats {
        let Some(chunk) = map.get_mut(coord) else {
            log::warn!("calculate_light on unloaded chunk {:?}", coord);
            return LightPassStats::default();
        };
        let mut queues = std::mem::take(&mut chunk.queues);
        let mut stats = LightPassStats::default();

        let mut pass = LightPass {
            reg: self.reg,
            map: &mut *map,
            queues: &mut queues,
            home: coord,
        };
        stats.columns = pass.run_columns();
        while let Some(node) = pass.queues.sky_remove.pop_front() {
            pass.remove_sky(node);
            stats.sky_removed += 1;
        }
        while let Some(node) = pass.queues.sky_place.pop_front() {
            pass.place_sky(node);
            stats.sky_placed += 1;
        }
        while let Some(node) = pass.queues.block_remove.pop_front() {
            pass.remove_block(node);
            stats.block_removed += 1;
        }
        while let Some(node) = pass.queues.block_place.pop_front() {
            pass.place_block(node);
            stats.block_placed += 1;
        }

        let mut dirty: Vec<ChunkCoord> = queues.dirty.drain().collect();
        dirty.sort();
        for c in &dirty {
            sink.request_remesh(*c);
        }
        stats.remeshed = dirty.len();

        if let Some(chunk) = map.get_mut(coord) {
            chunk.queues = queues;
        }
        if !stats.is_empty() {
            log::debug!(
                "light {:?}: sky -{} +{}, block -{} +{}, columns {}, remesh {}",
                coord,
                stats.sky_removed,
                stats.sky_placed,
                stats.block_removed,
                stats.block_placed,
                stats.columns,
                stats.remeshed
            );
        }
        stats
    }
}

/// One chunk's queues checked out against the map for the length of a pass.
pub(crate) struct LightPass<'a> {
    pub(crate) reg: &'a BlockRegistry,
    pub(crate) map: &'a mut ChunkMap,
    pub(crate) queues: &'a mut LightQueues,
    pub(crate) home: ChunkCoord,
}

impl LightPass<'_> {
    #[inline]
    fn is_opaque_at(&self, v: VoxelRef) -> bool {
        self.reg.opacity(self.map.block(v)) >= MAX_LIGHT
    }

    /// Cut then extend the queued sun rays. Runs before the four passes so
    /// that the nodes it produces are drained in the same call.
    fn run_columns(&mut self) -> usize {
        let mut n = 0;
        let blocked = std::mem::take(&mut self.queues.sky_block);
        for v in blocked {
            if self.map.contains(v.chunk) && self.map.sky_light(v) == 0 {
                self.block_sun_ray(v);
                n += 1;
            }
        }
        let extended = std::mem::take(&mut self.queues.sky_extend);
        for v in extended {
            if self.map.contains(v.chunk) && self.map.sky_light(v) == MAX_LIGHT {
                self.extend_sun_ray(v);
                n += 1;
            }
        }
        n
    }

    pub(crate) fn remove_sky(&mut self, node: LightNode) {
        let next = node.level.saturating_sub(1);
        for n in self.map.neighbors(node.voxel).into_iter().flatten() {
            let level = self.map.sky_light(n);
            if level == 0 {
                continue;
            }
            if level <= next {
                self.map.set_sky_light(n, 0);
                self.mark_edge_if_needed(n);
                self.queues.sky_remove.push_back(LightNode::new(n, level));
            } else {
                self.queues.sky_place.push_back(LightNode::new(n, level));
            }
        }
    }

    pub(crate) fn remove_block(&mut self, node: LightNode) {
        for n in self.map.neighbors(node.voxel).into_iter().flatten() {
            let level = self.map.block_light(n);
            if level == 0 {
                continue;
            }
            if level < node.level {
                self.map.set_block_light(n, 0);
                self.mark_edge_if_needed(n);
                self.queues.block_remove.push_back(LightNode::new(n, level));
                // An emitter caught in the wave relights from its own emission.
                let emission = self.reg.emission(self.map.block(n));
                if emission > 0 {
                    self.queues.block_place.push_back(LightNode::new(n, emission));
                }
            } else {
                self.queues.block_place.push_back(LightNode::new(n, level));
            }
        }
    }

    pub(crate) fn place_sky(&mut self, node: LightNode) {
        let v = node.voxel;
        if !self.map.contains(v.chunk) {
            return;
        }
        let incoming = node.level.min(MAX_LIGHT);
        let current = self.map.sky_light(v);
        let level = if incoming > current {
            self.map.set_sky_light(v, incoming);
            self.mark_edge_if_needed(v);
            incoming
        } else {
            current
        };
        if level <= 1 {
            return;
        }
        let next = level - 1;
        for n in self.map.neighbors(v).into_iter().flatten() {
            if self.is_opaque_at(n) {
                continue;
            }
            if self.map.sky_light(n) < next {
                self.map.set_sky_light(n, next);
                self.mark_edge_if_needed(n);
                self.queues.sky_place.push_back(LightNode::new(n, next));
            }
        }
    }

    pub(crate) fn place_block(&mut self, node: LightNode) {
        let v = node.voxel;
        if !self.map.contains(v.chunk) {
            return;
        }
        let incoming = node.level.min(MAX_LIGHT);
        if incoming > self.map.block_light(v) {
            self.map.set_block_light(v, incoming);
            self.mark_edge_if_needed(v);
        }
        let current = self.map.block_light(v);
        if current <= 1 {
            return;
        }
        let next = current - 1;
        for n in self.map.neighbors(v).into_iter().flatten() {
            if self.is_opaque_at(n) {
                continue;
            }
            if self.map.block_light(n) < next {
                self.map.set_block_light(n, next);
                self.mark_edge_if_needed(n);
                self.queues.block_place.push_back(LightNode::new(n, next));
            }
        }
    }

    /// Queue full sunlight down the open cells below `v`.
    pub(crate) fn extend_sun_ray(&mut self, v: VoxelRef) {
        let mut below = self.map.neighbor(v, Face::NegY);
        let mut len = 0usize;
        while let Some(c) = below {
            if self.is_opaque_at(c) {
                break;
            }
            if self.map.sky_light(c) != MAX_LIGHT {
                self.queues.sky_place.push_back(LightNode::new(c, MAX_LIGHT));
                len += 1;
            }
            below = self.map.neighbor(c, Face::NegY);
        }
        log::trace!("sun ray extended below {:?}: {} cells", v.pos, len);
    }

    /// Darken the run of full-sunlight cells below `v`. The whole run is
    /// zeroed before any removal so the walk never re-propagates ray cells.
    pub(crate) fn block_sun_ray(&mut self, v: VoxelRef) {
        let mut run = Vec::new();
        let mut below = self.map.neighbor(v, Face::NegY);
        while let Some(c) = below {
            if self.map.sky_light(c) != MAX_LIGHT {
                break;
            }
            self.map.set_sky_light(c, 0);
            run.push(c);
            below = self.map.neighbor(c, Face::NegY);
        }
        log::trace!("sun ray blocked below {:?}: {} cells", v.pos, run.len());
        for c in run {
            self.mark_edge_if_needed(c);
            self.remove_sky(LightNode::new(c, MAX_LIGHT));
        }
    }

    pub(crate) fn mark_edge_if_needed(&mut self, v: VoxelRef) {
        if v.chunk != self.home {
            self.queues.dirty.insert(v.chunk);
        } else if self.map.dims().is_border(v.local) {
            for c in self.map.neighbor_chunks(v.pos) {
                self.queues.dirty.insert(c);
            }
        }
    }
}
