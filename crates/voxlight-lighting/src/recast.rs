use voxlight_blocks::{BlockRegistry, MAX_LIGHT};
use voxlight_chunk::{Chunk, ChunkMap, LightNode, VoxelRef};
use voxlight_world::{ChunkCoord, LocalPos};

use crate::LightingEngine;

/// Reset `chunk`'s light and cast a vertical sun ray down every column. Cells
/// above the first voxel with any opacity get full sky; that voxel and
/// everything below it stay dark. Touches only `chunk`, so independent chunks
/// may be cast in parallel.
pub fn cast_columns(chunk: &mut Chunk, reg: &BlockRegistry) -> usize {
    chunk.reset_light();
    let size = chunk.size();
    let height = chunk.height();
    let mut lit = 0;
    for z in 0..size {
        for x in 0..size {
            for y in (0..height).rev() {
                let p = LocalPos::new(x, y, z);
                if reg.opacity(chunk.block(p)) > 0 {
                    break;
                }
                chunk.set_sky_light(p, MAX_LIGHT);
                lit += 1;
            }
        }
    }
    log::trace!("cast {:?}: {} open cells", chunk.coord, lit);
    lit
}

impl LightingEngine<'_> {
    /// Queue the freshly cast light of `coord` for propagation: its lit
    /// cells, its emitters, and the lit border cells of loaded neighbors
    /// that face it.
    pub fn seed_first_time(&self, map: &mut ChunkMap, coord: ChunkCoord) -> usize {
        let border = border_seeds(map, coord);
        let reg = self.registry();
        let Some(chunk) = map.get_mut(coord) else {
            log::warn!("seed_first_time on unloaded chunk {:?}", coord);
            return 0;
        };
        let mut seeded = 0;
        for local in chunk.positions() {
            let v = VoxelRef {
                chunk: coord,
                local,
                pos: chunk.world_pos(local),
            };
            let sky = chunk.sky_light(local);
            if sky > 0 {
                chunk.queues.sky_place.push_back(LightNode::new(v, sky));
                seeded += 1;
            }
            let emission = reg.emission(chunk.block(local));
            if emission > 0 {
                chunk.set_block_light(local, emission);
                chunk.queues.block_place.push_back(LightNode::new(v, emission));
                seeded += 1;
            }
        }
        for (v, sky, block) in border {
            if sky > 0 {
                chunk.queues.sky_place.push_back(LightNode::new(v, sky));
                seeded += 1;
            }
            if block > 0 {
                chunk.queues.block_place.push_back(LightNode::new(v, block));
                seeded += 1;
            }
        }
        log::debug!("seeded {:?}: {} nodes", coord, seeded);
        seeded
    }

    /// First-load lighting of `coord`: column cast plus seeding. Bypasses the
    /// removal passes, so only use it on a chunk that was just created or
    /// loaded.
    pub fn recast_first_time(&self, map: &mut ChunkMap, coord: ChunkCoord) -> usize {
        let Some(chunk) = map.get_mut(coord) else {
            log::warn!("recast_first_time on unloaded chunk {:?}", coord);
            return 0;
        };
        cast_columns(chunk, self.registry());
        self.seed_first_time(map, coord)
    }
}

/// Lit cells of already-loaded neighbors that sit against `coord`.
fn border_seeds(map: &ChunkMap, coord: ChunkCoord) -> Vec<(VoxelRef, u8, u8)> {
    let dims = map.dims();
    let last = dims.chunk_size - 1;
    let mut out = Vec::new();
    for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
        let nc = coord.offset(dx, dz);
        let Some(neighbor) = map.get(nc) else {
            continue;
        };
        for y in 0..dims.world_height {
            for i in 0..dims.chunk_size {
                let (x, z) = match (dx, dz) {
                    (-1, _) => (last, i),
                    (1, _) => (0, i),
                    (_, -1) => (i, last),
                    _ => (i, 0),
                };
                let local = LocalPos::new(x, y, z);
                let sky = neighbor.sky_light(local);
                let block = neighbor.block_light(local);
                if sky == 0 && block == 0 {
                    continue;
                }
                let v = VoxelRef {
                    chunk: nc,
                    local,
                    pos: neighbor.world_pos(local),
                };
                out.push((v, sky, block));
            }
        }
    }
    out
}
