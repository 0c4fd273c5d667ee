use voxlight_blocks::{Block, BlockRegistry, MAX_LIGHT};
use voxlight_chunk::{ChunkMap, LightNode};
use voxlight_world::{BlockPos, Face};

/// Write `new_block` at `pos` and queue the light work the change implies on
/// the owning chunk. Nothing propagates until `calculate_light` runs for that
/// chunk. Returns the replaced block, or `None` if `pos` is not loaded.
pub fn apply_block_change(
    map: &mut ChunkMap,
    reg: &BlockRegistry,
    pos: BlockPos,
    new_block: Block,
) -> Option<Block> {
    let v = map.voxel(pos)?;
    let neighbors = map.neighbors(v);
    let open_above = map
        .neighbor(v, Face::PosY)
        .is_none_or(|above| map.sky_light(above) == MAX_LIGHT);
    let lit_neighbors: Vec<(LightNode, LightNode)> = neighbors
        .into_iter()
        .flatten()
        .map(|n| (LightNode::new(n, map.sky_light(n)), LightNode::new(n, map.block_light(n))))
        .collect();

    let chunk = map.get_mut(v.chunk)?;
    let old = chunk.set_block(v.local, new_block);
    if old == new_block {
        return Some(old);
    }
    let opaque = reg.opacity(new_block) >= MAX_LIGHT;
    let emission = reg.emission(new_block);
    let old_sky = chunk.sky_light(v.local);
    let old_block_light = chunk.block_light(v.local);

    let drop_block_light = old_block_light > 0 && (opaque || reg.emission(old) > 0);
    if drop_block_light {
        chunk.set_block_light(v.local, 0);
        chunk.queues.block_place.retain(|n| n.voxel != v);
        chunk.queues.block_remove.push_back(LightNode::new(v, old_block_light));
    }

    if opaque {
        if old_sky > 0 {
            chunk.set_sky_light(v.local, 0);
            let q = &mut chunk.queues;
            q.sky_place.retain(|n| n.voxel != v);
            q.sky_extend.retain(|e| *e != v);
            q.sky_remove.push_back(LightNode::new(v, old_sky));
            if old_sky == MAX_LIGHT {
                q.sky_block.push(v);
            }
        }
    } else {
        for (sky, block) in lit_neighbors {
            if sky.level > 0 {
                chunk.queues.sky_place.push_back(sky);
            }
            if block.level > 0 && !drop_block_light {
                chunk.queues.block_place.push_back(block);
            }
        }
        if open_above && old_sky < MAX_LIGHT {
            chunk.set_sky_light(v.local, MAX_LIGHT);
            chunk.queues.sky_place.push_back(LightNode::new(v, MAX_LIGHT));
            chunk.queues.sky_extend.push(v);
        }
    }

    if emission > 0 {
        if emission > chunk.block_light(v.local) {
            chunk.set_block_light(v.local, emission);
        }
        chunk.queues.block_place.push_back(LightNode::new(v, emission));
    }
    log::trace!("block {:?} -> {:?} at {:?}", old, new_block, pos);
    Some(old)
}
