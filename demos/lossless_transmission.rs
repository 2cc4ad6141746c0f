//! Progressive transmission demo
//!
//! Reads one closed triangle mesh from an OBJ file, encodes it over a number
//! of levels and writes every reduced level next to the input:
//!
//! ```text
//! lossless_transmission sphere.obj --iterations 3
//! # sphere_0.obj, sphere_1.obj, sphere_2.obj
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use progmesh_codec::{EncoderParams, ProgressiveEncoder, SeedPolicy};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SeedMode {
    /// Agreed gates for the reference asset, random afterwards
    Legacy,
    /// Smallest gate of each level
    First,
    /// Uniformly drawn gate
    Random,
}

/// Encode a mesh level by level and write each level as OBJ
#[derive(Parser)]
#[command(name = "lossless_transmission")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input OBJ file
    input: PathBuf,

    /// Number of levels to produce
    #[arg(short, long, default_value_t = 2)]
    iterations: usize,

    /// How each level's seed gate is chosen
    #[arg(long, value_enum, default_value_t = SeedMode::Legacy)]
    seed_mode: SeedMode,

    /// RNG seed for the random fallback
    #[arg(long, default_value_t = 0)]
    rng_seed: u64,

    /// Directory for the level files, defaults to the input's directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn seed_policy(mode: SeedMode, rng_seed: u64) -> SeedPolicy {
    match mode {
        SeedMode::Legacy => {
            let mut policy = SeedPolicy::legacy();
            policy.fallback = progmesh_codec::SeedStrategy::Random { seed: rng_seed };
            policy
        }
        SeedMode::First => SeedPolicy::first(),
        SeedMode::Random => SeedPolicy::random(rng_seed),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mesh = progmesh_io::read_mesh(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    println!(
        "Loaded {}: {} vertices, {} faces",
        cli.input.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );

    let params = EncoderParams::new()
        .with_iterations(cli.iterations)
        .with_seeds(seed_policy(cli.seed_mode, cli.rng_seed));
    let levels = ProgressiveEncoder::with_params(params)
        .encode(&mesh)
        .context("encoding failed")?;

    let stem = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input path has no file name")?;
    let output_dir = match cli.output_dir {
        Some(dir) => dir,
        None => cli
            .input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default(),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    for level in &levels {
        let path = output_dir.join(format!("{}_{}.obj", stem, level.iteration));
        progmesh_io::write_mesh(&level.mesh.to_triangle_mesh(), &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!(
            "Level {} (seed {}): removed {}, {} vertices, {} faces -> {}",
            level.iteration,
            level.seed,
            level.removed_count(),
            level.mesh.vertex_count(),
            level.mesh.face_count(),
            path.display()
        );
        if !level.sew.unmatched.is_empty() {
            println!("  {} unmatched gates", level.sew.unmatched.len());
        }
    }

    if levels.len() < cli.iterations {
        println!(
            "Stopped after {} of {} levels",
            levels.len(),
            cli.iterations
        );
    }
    Ok(())
}
