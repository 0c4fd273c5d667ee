use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use voxlight_blocks::BlockRegistry;
use voxlight_runtime::LightRuntime;
use voxlight_world::BlockPos;

mod scene;

use scene::Scene;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Channel {
    Sky,
    Block,
    Combined,
}

/// Light a flat test scene, apply its scripted edits, and print a vertical
/// light slice.
#[derive(Parser, Debug)]
#[command(name = "voxlight", version)]
struct Args {
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    #[arg(long, default_value = "assets/scene.toml")]
    scene: PathBuf,
    /// World z of the printed slice; defaults to the first edit's z.
    #[arg(long)]
    z: Option<i32>,
    /// Highest y printed; defaults to the world height.
    #[arg(long)]
    top: Option<i32>,
    #[arg(long, value_enum, default_value_t = Channel::Combined)]
    channel: Channel,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let reg = Arc::new(BlockRegistry::load_from_path(&args.blocks)?);
    let scene = Scene::load_from_path(&args.scene)?;
    let mut rt = LightRuntime::new(reg.clone(), scene.dims, &scene.runtime)?;

    let stats = rt.load_chunks(scene.build_chunks(&reg))?;
    log::info!(
        "first load: {} nodes, {} remesh requests",
        stats.nodes(),
        rt.drain_remesh().len()
    );

    for edit in &scene.edits {
        let block = reg
            .block_by_name(&edit.block)
            .ok_or_else(|| format!("scene edit uses unknown block `{}`", edit.block))?;
        match rt.set_block(edit.pos(), block) {
            Some(old) => log::info!("{:?}: {:?} -> {}", edit.at, old, edit.block),
            None => log::warn!("{:?} is outside the loaded chunks", edit.at),
        }
    }
    let mut remesh = rt.drain_remesh();
    remesh.sort();
    remesh.dedup();
    log::info!("edits touched {} chunks", remesh.len());

    let z = args.z.or_else(|| scene.edits.first().map(|e| e.at[2])).unwrap_or(0);
    let top = args.top.unwrap_or(scene.dims.world_height as i32 - 1);
    print_slice(&rt, &scene, z, top, args.channel);
    Ok(())
}

/// One row per y, top first. Opaque voxels print as `#`, light levels as hex.
fn print_slice(rt: &LightRuntime, scene: &Scene, z: i32, top: i32, channel: Channel) {
    let size = scene.dims.chunk_size as i32;
    let x0 = -scene.radius * size;
    let x1 = (scene.radius + 1) * size;
    println!("z = {z}, x = {x0}..{x1}, channel {channel:?}");
    for y in (0..=top).rev() {
        let row: String = (x0..x1)
            .map(|x| {
                let pos = BlockPos::new(x, y, z);
                match rt.block_at(pos) {
                    Some(b) if rt.registry().is_opaque(b) => '#',
                    _ => {
                        let s = rt.light_at(pos);
                        let level = match channel {
                            Channel::Sky => s.sky,
                            Channel::Block => s.block,
                            Channel::Combined => s.combined(),
                        };
                        char::from_digit(u32::from(level), 16).unwrap_or('?')
                    }
                }
            })
            .collect();
        println!("{y:>4} {row}");
    }
}
