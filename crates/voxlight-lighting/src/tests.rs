use super::*;
use crate::engine::LightPass;
use voxlight_blocks::{Block, BlockRegistry, MAX_LIGHT};
use voxlight_chunk::{Chunk, ChunkMap, LightNode, LightQueues};
use voxlight_world::{BlockPos, ChunkCoord, Face, WorldDims};

const BLOCKS: &str = r#"
    [[blocks]]
    name = "air"
    shape = "empty"

    [[blocks]]
    name = "stone"

    [[blocks]]
    name = "glass"
    opacity = 0

    [[blocks]]
    name = "torch"
    shape = "cross"
    emission = 14

    [[blocks]]
    name = "leaves"
    opacity = 1

    [[blocks]]
    name = "lamp"
    shape = "cross"
    emission = 8

    [[blocks]]
    name = "glowstone"
    emission = 10
"#;

const STONE: Block = Block::new(1);
const TORCH: Block = Block::new(3);
const LEAVES: Block = Block::new(4);
const LAMP: Block = Block::new(5);
const GLOWSTONE: Block = Block::new(6);

fn make_test_registry() -> BlockRegistry {
    BlockRegistry::from_toml_str(BLOCKS).unwrap()
}

fn make_map(dims: WorldDims, coords: &[(i32, i32)], f: impl Fn(BlockPos) -> Block) -> ChunkMap {
    let mut map = ChunkMap::new(dims);
    for &c in coords {
        let coord = ChunkCoord::from(c);
        let chunk = Chunk::from_fn(coord, dims, |l| f(dims.world_of(coord, l)));
        map.insert(chunk).unwrap();
    }
    map
}

fn light_all(engine: &LightingEngine, map: &mut ChunkMap) -> Vec<ChunkCoord> {
    let mut sink = Vec::new();
    for c in map.coords() {
        engine.recast_first_time(map, c);
    }
    for c in map.coords() {
        engine.calculate_light(map, c, &mut sink);
    }
    sink
}

fn sky(map: &ChunkMap, x: i32, y: i32, z: i32) -> u8 {
    light_at(map, BlockPos::new(x, y, z)).sky
}

fn blk(map: &ChunkMap, x: i32, y: i32, z: i32) -> u8 {
    light_at(map, BlockPos::new(x, y, z)).block
}

fn snapshot(map: &ChunkMap) -> Vec<Vec<u8>> {
    map.coords()
        .into_iter()
        .flat_map(|c| {
            let sections = &map.get(c).unwrap().sections;
            sections.iter().map(|s| s.light.as_bytes().to_vec()).collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn enclosed_shaft_attenuates_linearly() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 16, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |p| {
        if p.x == 3 && p.z == 3 && (1..=6).contains(&p.y) {
            Block::AIR
        } else {
            STONE
        }
    });
    let top = map.voxel(BlockPos::new(3, 6, 3)).unwrap();
    map.set_sky_light(top, MAX_LIGHT);
    map.get_mut(top.chunk)
        .unwrap()
        .queues
        .sky_place
        .push_back(LightNode::new(top, MAX_LIGHT));

    let mut sink = Vec::new();
    let stats = engine.calculate_light(&mut map, top.chunk, &mut sink);
    let column: Vec<u8> = (1..=6).rev().map(|y| sky(&map, 3, y, 3)).collect();
    assert_eq!(column, vec![15, 14, 13, 12, 11, 10]);
    assert_eq!(sky(&map, 3, 7, 3), 0);
    assert_eq!(sky(&map, 3, 0, 3), 0);
    assert_eq!(stats.sky_placed, 6);
    assert!(sink.is_empty());
}

#[test]
fn first_load_obstructs_below_opaque_voxel() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(4, 10, 5).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |p| if p.y == 4 { STONE } else { Block::AIR });
    light_all(&engine, &mut map);
    for x in 0..4 {
        for z in 0..4 {
            for y in 5..10 {
                assert_eq!(sky(&map, x, y, z), 15, "({x},{y},{z})");
            }
            for y in 0..5 {
                assert_eq!(sky(&map, x, y, z), 0, "({x},{y},{z})");
            }
        }
    }
    assert!(map.get(ChunkCoord::new(0, 0)).unwrap().queues.is_drained());
}

#[test]
fn second_pass_without_edits_is_a_no_op() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 16, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0), (1, 0)], |p| {
        if p.y < 5 || (p.x == 6 && p.y == 9) {
            STONE
        } else if p == BlockPos::new(9, 5, 2) {
            TORCH
        } else {
            Block::AIR
        }
    });
    light_all(&engine, &mut map);
    let before = snapshot(&map);
    for c in map.coords() {
        let mut sink = Vec::new();
        let stats = engine.calculate_light(&mut map, c, &mut sink);
        assert!(stats.is_empty());
        assert!(sink.is_empty());
    }
    assert_eq!(snapshot(&map), before);
}

#[test]
fn removing_the_only_torch_darkens_the_room() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 16, 8).unwrap();
    let room = |p: BlockPos| {
        (2..=5).contains(&p.x) && (4..=6).contains(&p.y) && (2..=5).contains(&p.z)
    };
    let mut map = make_map(dims, &[(0, 0)], |p| {
        if p.y >= 12 || room(p) { Block::AIR } else { STONE }
    });
    light_all(&engine, &mut map);
    let coord = ChunkCoord::new(0, 0);
    let mut sink = Vec::new();

    let torch_at = BlockPos::new(3, 5, 3);
    assert_eq!(apply_block_change(&mut map, &reg, torch_at, TORCH), Some(Block::AIR));
    engine.calculate_light(&mut map, coord, &mut sink);
    assert_eq!(blk(&map, 3, 5, 3), 14);
    assert_eq!(blk(&map, 4, 5, 3), 13);
    assert_eq!(blk(&map, 5, 6, 5), 9);
    assert_eq!(blk(&map, 6, 5, 3), 0);
    assert_eq!(sky(&map, 3, 5, 3), 0);

    assert_eq!(apply_block_change(&mut map, &reg, torch_at, Block::AIR), Some(TORCH));
    let stats = engine.calculate_light(&mut map, coord, &mut sink);
    assert!(stats.block_removed > 0);
    assert_eq!(stats.block_placed, 0);
    let chunk = map.get(coord).unwrap();
    assert!(chunk.positions().all(|p| chunk.block_light(p) == 0));
    assert!(chunk.queues.is_drained());
}

#[test]
fn border_crossing_notifies_neighbor_once() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 8, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0), (1, 0)], |_| Block::AIR);
    apply_block_change(&mut map, &reg, BlockPos::new(7, 2, 3), TORCH);

    let mut sink = Vec::new();
    let stats = engine.calculate_light(&mut map, ChunkCoord::new(0, 0), &mut sink);
    assert_eq!(sink, vec![ChunkCoord::new(1, 0)]);
    assert_eq!(stats.remeshed, 1);
    assert_eq!(blk(&map, 8, 2, 3), 13);
    assert_eq!(blk(&map, 10, 2, 3), 11);
    let east = map.get(ChunkCoord::new(1, 0)).unwrap();
    assert!(east.positions().filter(|&p| east.block_light(p) > 0).count() > 1);
    assert!(east.queues.is_drained());
}

#[test]
fn opaque_voxels_stay_dark() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 16, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |p| {
        if p.y < 4 || p == BlockPos::new(4, 8, 4) || p == BlockPos::new(1, 15, 1) {
            STONE
        } else if p == BlockPos::new(5, 8, 4) {
            TORCH
        } else {
            Block::AIR
        }
    });
    light_all(&engine, &mut map);
    assert_eq!(blk(&map, 5, 8, 4), 14);
    let chunk = map.get(ChunkCoord::new(0, 0)).unwrap();
    for p in chunk.positions().filter(|&p| chunk.block(p) == STONE) {
        assert_eq!(chunk.sky_light(p), 0, "{p:?}");
        assert_eq!(chunk.block_light(p), 0, "{p:?}");
    }
}

#[test]
fn removal_keeps_equal_neighbors_and_clears_lower_ones() {
    let reg = make_test_registry();
    let dims = WorldDims::new(8, 8, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |_| Block::AIR);
    let home = ChunkCoord::new(0, 0);
    let v = map.voxel(BlockPos::new(3, 3, 3)).unwrap();
    let equal = map.neighbor(v, Face::PosX).unwrap();
    let lower = map.neighbor(v, Face::NegX).unwrap();
    let higher = map.neighbor(v, Face::PosZ).unwrap();

    for (v_level, eq, lo, hi) in [(5u8, 5u8, 4u8, 6u8), (1, 1, 0, 2)] {
        for sky_channel in [true, false] {
            let set = |map: &mut ChunkMap, at, level| {
                if sky_channel {
                    map.set_sky_light(at, level)
                } else {
                    map.set_block_light(at, level)
                }
            };
            for n in [v, equal, lower, higher] {
                set(&mut map, n, 0);
            }
            set(&mut map, equal, eq);
            set(&mut map, lower, lo);
            set(&mut map, higher, hi);

            let mut queues = LightQueues::default();
            let mut pass = LightPass {
                reg: &reg,
                map: &mut map,
                queues: &mut queues,
                home,
            };
            let node = LightNode::new(v, v_level);
            let (removed, placed) = if sky_channel {
                pass.remove_sky(node);
                (&queues.sky_remove, &queues.sky_place)
            } else {
                pass.remove_block(node);
                (&queues.block_remove, &queues.block_place)
            };
            let read = |at| if sky_channel { map.sky_light(at) } else { map.block_light(at) };

            assert_eq!(read(equal), eq, "equal neighbor must survive");
            assert_eq!(read(higher), hi);
            assert_eq!(read(lower), 0);
            let placed: Vec<_> = placed.iter().map(|n| (n.voxel, n.level)).collect();
            assert_eq!(placed, vec![(equal, eq), (higher, hi)]);
            let removed: Vec<_> = removed.iter().map(|n| (n.voxel, n.level)).collect();
            if lo > 0 {
                assert_eq!(removed, vec![(lower, lo)]);
            } else {
                assert!(removed.is_empty());
            }
        }
    }
}

#[test]
fn roof_cuts_and_restores_the_sun_ray() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 16, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |_| Block::AIR);
    light_all(&engine, &mut map);
    let coord = ChunkCoord::new(0, 0);
    let roof = BlockPos::new(3, 15, 3);
    let mut sink = Vec::new();

    assert_eq!(apply_block_change(&mut map, &reg, roof, STONE), Some(Block::AIR));
    let stats = engine.calculate_light(&mut map, coord, &mut sink);
    assert_eq!(stats.columns, 1);
    assert_eq!(sky(&map, 3, 15, 3), 0);
    for y in 0..15 {
        assert_eq!(sky(&map, 3, y, 3), 14, "y={y}");
        assert_eq!(sky(&map, 4, y, 3), 15, "y={y}");
    }

    assert_eq!(apply_block_change(&mut map, &reg, roof, Block::AIR), Some(STONE));
    engine.calculate_light(&mut map, coord, &mut sink);
    for y in 0..16 {
        assert_eq!(sky(&map, 3, y, 3), 15, "y={y}");
    }
    assert!(map.get(coord).unwrap().queues.is_drained());
}

#[test]
fn partial_opacity_blocks_first_cast_but_not_extension() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 16, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |p| {
        if p == BlockPos::new(3, 15, 3) {
            STONE
        } else if p == BlockPos::new(3, 10, 3) {
            LEAVES
        } else {
            Block::AIR
        }
    });
    light_all(&engine, &mut map);
    assert_eq!(sky(&map, 3, 10, 3), 14);
    assert_eq!(sky(&map, 3, 9, 3), 14);

    apply_block_change(&mut map, &reg, BlockPos::new(3, 15, 3), Block::AIR);
    engine.calculate_light(&mut map, ChunkCoord::new(0, 0), &mut Vec::new());
    assert_eq!(sky(&map, 3, 10, 3), 15);
    assert_eq!(sky(&map, 3, 9, 3), 15);
    assert_eq!(sky(&map, 3, 0, 3), 15);
}

#[test]
fn new_chunk_pulls_light_from_loaded_neighbor() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 16, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |_| Block::AIR);
    light_all(&engine, &mut map);

    let east = ChunkCoord::new(1, 0);
    let chunk = Chunk::from_fn(east, dims, |l| if l.y == 15 { STONE } else { Block::AIR });
    map.insert(chunk).unwrap();
    assert!(engine.recast_first_time(&mut map, east) > 0);
    let mut sink = Vec::new();
    engine.calculate_light(&mut map, east, &mut sink);

    assert_eq!(sky(&map, 8, 10, 3), 14);
    assert_eq!(sky(&map, 9, 10, 3), 13);
    assert_eq!(sky(&map, 8, 15, 3), 0);
    assert_eq!(sky(&map, 7, 10, 3), 15);
    assert!(sink.contains(&ChunkCoord::new(0, 0)));
}

#[test]
fn sampling_outside_the_loaded_world_reads_open_air() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 16, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |p| if p.y < 8 { STONE } else { Block::AIR });
    light_all(&engine, &mut map);

    assert_eq!(light_at(&map, BlockPos::new(100, 4, 100)), LightSample::OPEN_AIR);
    assert_eq!(light_at(&map, BlockPos::new(2, -1, 2)), LightSample::OPEN_AIR);
    assert_eq!(light_at(&map, BlockPos::new(2, 16, 2)), LightSample { sky: 15, block: 0 });
    assert_eq!(light_at(&map, BlockPos::new(2, 4, 2)), LightSample { sky: 0, block: 0 });
    assert_eq!(light_at(&map, BlockPos::new(2, 9, 2)).combined(), 15);
}

#[test]
fn unloaded_targets_are_silent() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 8, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |_| Block::AIR);
    assert_eq!(apply_block_change(&mut map, &reg, BlockPos::new(50, 1, 1), STONE), None);
    assert_eq!(apply_block_change(&mut map, &reg, BlockPos::new(1, 8, 1), STONE), None);
    let mut sink = Vec::new();
    assert!(engine.calculate_light(&mut map, ChunkCoord::new(9, 9), &mut sink).is_empty());
    assert_eq!(engine.recast_first_time(&mut map, ChunkCoord::new(9, 9)), 0);
    assert!(sink.is_empty());
}

#[test]
fn swapping_emitters_relights_at_new_strength() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 8, 8).unwrap();
    let mut map = make_map(dims, &[(0, 0)], |_| Block::AIR);
    let coord = ChunkCoord::new(0, 0);
    let at = BlockPos::new(3, 3, 3);

    apply_block_change(&mut map, &reg, at, TORCH);
    engine.calculate_light(&mut map, coord, &mut Vec::new());
    assert_eq!(blk(&map, 5, 3, 3), 12);

    assert_eq!(apply_block_change(&mut map, &reg, at, LAMP), Some(TORCH));
    engine.calculate_light(&mut map, coord, &mut Vec::new());
    assert_eq!(blk(&map, 3, 3, 3), 8);
    assert_eq!(blk(&map, 5, 3, 3), 6);
    assert_eq!(blk(&map, 7, 3, 3), 4);
}

#[test]
fn weaker_emitters_survive_a_stronger_removal() {
    let reg = make_test_registry();
    let engine = LightingEngine::new(&reg);
    let dims = WorldDims::new(8, 8, 8).unwrap();
    // Corridor x = 1..=6 at y = 3, z = 3, closed by a glowstone wall at x = 7.
    let mut map = make_map(dims, &[(0, 0)], |p| match (p.x, p.y, p.z) {
        (3, 3, 3) => TORCH,
        (5, 3, 3) => LAMP,
        (7, 3, 3) => GLOWSTONE,
        (1..=6, 3, 3) => Block::AIR,
        _ => STONE,
    });
    light_all(&engine, &mut map);
    let corridor = |map: &ChunkMap| (1..=7).map(|x| blk(map, x, 3, 3)).collect::<Vec<_>>();
    assert_eq!(corridor(&map), vec![12, 13, 14, 13, 12, 11, 10]);

    let coord = ChunkCoord::new(0, 0);
    let torch_at = BlockPos::new(3, 3, 3);
    assert_eq!(apply_block_change(&mut map, &reg, torch_at, Block::AIR), Some(TORCH));
    engine.calculate_light(&mut map, coord, &mut Vec::new());
    assert_eq!(corridor(&map), vec![4, 5, 6, 7, 8, 9, 10]);
    assert!(map.get(coord).unwrap().queues.is_drained());
}
