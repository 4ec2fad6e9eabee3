// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: build a floor plan JSON into meshes and write them as OBJ
//!
//! Usage:
//!   floorplan-mesh <building.json> [options]

use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;
use wallforge_geometry::{build_building, BuildContext, CapMode, FieldSize, KernelConfig, Mesh};
use wallforge_scene::{load_building, plan_bounds, save_obj};

struct Options {
    input: PathBuf,
    output: PathBuf,
    field: Option<(f64, f64)>,
    cap_mode: Option<CapMode>,
    scene_space: bool,
    niches: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,wallforge_geometry=debug".into()),
        )
        .pretty()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    if let Err(e) = parse_args(&args).and_then(run) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options {
        input: PathBuf::from(&args[1]),
        output: PathBuf::from("building.obj"),
        field: None,
        cap_mode: None,
        scene_space: false,
        niches: false,
    };

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--output" => {
                options.output = PathBuf::from(rest.next().context("--output needs a path")?);
            }
            "--field" => {
                let raw = rest.next().context("--field needs WIDTHxHEIGHT")?;
                let (w, h) = raw
                    .split_once('x')
                    .with_context(|| format!("invalid field size '{}'", raw))?;
                options.field = Some((w.parse()?, h.parse()?));
            }
            "--cap-mode" => {
                let raw = rest.next().context("--cap-mode needs earcut or stitched")?;
                options.cap_mode = Some(raw.parse()?);
            }
            "--scene" => options.scene_space = true,
            "--niches" => options.niches = true,
            other => bail!("unknown option: {}", other),
        }
    }

    Ok(options)
}

fn run(options: Options) -> anyhow::Result<()> {
    let building = load_building(&options.input)
        .with_context(|| format!("cannot load {}", options.input.display()))?;

    let mut config = KernelConfig::from_env()?;
    if let Some(mode) = options.cap_mode {
        config = config.with_cap_mode(mode);
    }

    let (min, max) = plan_bounds(&building, &config)?;
    if options.scene_space && (min.x < 0.0 || min.y < 0.0) {
        tracing::warn!(
            min_x = min.x,
            min_y = min.y,
            "plan reaches below the field origin, scene coordinates fall outside the unit field"
        );
    }

    // Default field is anchored at the plan origin
    let (width, height) = options
        .field
        .unwrap_or((max.x.max(1.0), max.y.max(1.0)));
    let ctx = BuildContext::new(FieldSize::new(width, height)?, config);

    tracing::info!(
        input = %options.input.display(),
        walls = building.walls.len(),
        windows = building.window_count(),
        partitions = building.inner_walls.len(),
        field_width = width,
        field_height = height,
        "building floor plan"
    );

    let mut meshes = build_building(&building, &ctx)?;
    if options.scene_space {
        meshes = meshes.to_scene(&ctx.transform());
    }

    let niche_names: Vec<String> = meshes
        .niches
        .iter()
        .map(|n| format!("niche_{:?}", n.kind).replace(|c: char| !c.is_alphanumeric(), "_"))
        .collect();

    let mut objects: Vec<(&str, &Mesh)> = vec![("shell", &meshes.shell)];
    if !meshes.partitions.is_empty() {
        objects.push(("partitions", &meshes.partitions));
    }
    if options.niches {
        objects.extend(niche_names.iter().map(String::as_str).zip(meshes.niches.iter().map(|n| &n.mesh)));
    }

    save_obj(&options.output, &objects)
        .with_context(|| format!("cannot write {}", options.output.display()))?;

    let (min, max) = meshes.shell.bounds();
    tracing::info!(
        output = %options.output.display(),
        shell_triangles = meshes.shell.triangle_count(),
        partition_triangles = meshes.partitions.triangle_count(),
        shell_volume = meshes.shell.volume(),
        min = ?(min.x, min.y, min.z),
        max = ?(max.x, max.y, max.z),
        "wrote mesh"
    );

    Ok(())
}

fn print_usage() {
    eprintln!("Usage: floorplan-mesh <building.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --output <path>        OBJ file to write (default: building.obj)");
    eprintln!("  --field <W>x<H>        Field size for scene mapping (default: plan extent)");
    eprintln!("                         The field starts at plan (0, 0); plans are expected");
    eprintln!("                         in non-negative coordinates");
    eprintln!("  --cap-mode <mode>      earcut | stitched (overrides WALLFORGE_CAP_MODE)");
    eprintln!("  --scene                Write scene-space (y-up, unit field) coordinates");
    eprintln!("  --niches               Also write the window cutter volumes");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG, WALLFORGE_CAP_MODE, WALLFORGE_CUTTER_OVERSHOOT,");
    eprintln!("  WALLFORGE_MIN_CORNER_ANGLE, WALLFORGE_MARKER_SIDE");
}
