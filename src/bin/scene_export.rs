//! scene-export: Export an OBJ scene to the renderer's XML scene document
//!
//! Usage:
//!   scene-export scene.obj
//!   scene-export scene.obj --strategy flattened --resource-root assets/ --out level.xml

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use scene_exporter::export::{export_to_file, output_path_for, ExportConfig, SourceAxes, Strategy};
use scene_exporter::scene::Scene;

struct Args {
    scene: PathBuf,
    out: Option<PathBuf>,
    config: ExportConfig,
}

fn print_help() {
    println!("scene-export v{}", scene_exporter::VERSION);
    println!();
    println!("Usage: scene-export <scene.obj> [options]");
    println!();
    println!("Options:");
    println!("  --strategy <indexed|flattened>  Mesh layout (default: indexed)");
    println!("  --y-up                          Source scene is already Y up");
    println!("  --resource-root <DIR>           Texture directory prefix (default: resources/)");
    println!("  --parallel                      Serialize objects on all cores");
    println!("  --out <PATH>                    Output file (default: scene path with .xml)");
    println!("  -h, --help                      Show this help");
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("Missing value for {}", flag))
}

/// Returns `None` when help was requested
fn parse_args() -> Result<Option<Args>> {
    let mut args = std::env::args().skip(1);
    let mut scene: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut config = ExportConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strategy" => {
                let value = next_value(&mut args, "--strategy")?;
                config.strategy = value.parse::<Strategy>().map_err(anyhow::Error::msg)?;
            }
            "--y-up" => config.source_axes = SourceAxes::YUp,
            "--resource-root" => {
                config.resource_root = next_value(&mut args, "--resource-root")?;
            }
            "--parallel" => config.parallel = true,
            "--out" => out = Some(PathBuf::from(next_value(&mut args, "--out")?)),
            "--help" | "-h" => return Ok(None),
            other if other.starts_with('-') => bail!("Unknown argument: {}", other),
            other => {
                if scene.is_some() {
                    bail!("Only one scene file can be exported at a time");
                }
                scene = Some(PathBuf::from(other));
            }
        }
    }

    let scene = scene.context("Missing scene file")?;
    Ok(Some(Args { scene, out, config }))
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(args) = parse_args().inspect_err(|_| print_help())? else {
        print_help();
        return Ok(());
    };

    let scene = Scene::from_obj(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    let stats = scene.statistics();
    log::info!(
        "Scene has {} object(s), {} mesh(es), {} material(s), {} polygon(s)",
        stats.object_count,
        stats.mesh_count,
        stats.material_count,
        stats.total_polygons
    );

    let out = args.out.unwrap_or_else(|| output_path_for(&args.scene));
    let summary = export_to_file(&scene, &out, &args.config)
        .with_context(|| format!("Failed to export {}", args.scene.display()))?;

    println!(
        "Wrote {} ({} object(s), {} mesh(es), {} format {})",
        out.display(),
        summary.objects,
        summary.meshes,
        args.config.strategy,
        args.config.strategy.format_version()
    );
    if summary.omitted_children + summary.skipped_grandchildren > 0 {
        println!(
            "Skipped {} nested object(s) the {} format cannot hold",
            summary.omitted_children + summary.skipped_grandchildren,
            args.config.strategy
        );
    }
    Ok(())
}
