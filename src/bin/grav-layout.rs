use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use grav_layout::common::collections::HashMap;
use grav_layout::common::config::{Config, config_file};
use grav_layout::common::log;
use grav_layout::layout_engine::{Groups, LayoutManager, LayoutMethod, Options, Role};
use grav_layout::model::{Bounds, Tile};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "grav-layout")]
#[command(about = "Arrange video tiles with the grav layout engine")]
struct Cli {
    /// Scene to arrange, as TOML or JSON
    scene: PathBuf,

    /// Settings file (defaults to ~/.grav-layout.toml when it exists)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override a layout option, e.g. `-o numX=3`
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Check the config and scene, then exit without arranging
    #[arg(long)]
    validate: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Scene {
    method: String,
    outer: Bounds,
    #[serde(default)]
    inner: Option<Bounds>,
    #[serde(default)]
    options: Options,
    #[serde(default)]
    tiles: Vec<TileSpec>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TileSpec {
    name: String,
    width: f64,
    height: f64,
    #[serde(default)]
    border: f64,
    #[serde(default)]
    label: f64,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default = "default_role")]
    role: Role,
}

fn default_role() -> Role { Role::Objects }

impl TileSpec {
    fn build(&self) -> Tile {
        Tile::new(self.name.clone(), self.width, self.height)
            .with_border(self.border)
            .with_label(self.label)
            .with_position(self.x, self.y)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    method: &'a str,
    error: Option<String>,
    tiles: &'a [Tile],
}

fn read_scene(path: &Path) -> anyhow::Result<Scene> {
    let buf = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    let scene = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&buf)?,
        _ => toml::from_str(&buf)?,
    };
    Ok(scene)
}

/// The config with invalid values reset, and the issues found before that.
fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, Vec<String>)> {
    if let Some(path) = path {
        return Config::read_checked(path)
            .with_context(|| format!("reading config {}", path.display()));
    }
    match config_file() {
        Some(path) if path.exists() => Config::read_checked(&path),
        _ => Ok((Config::default(), Vec::new())),
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let (config, issues) = load_config(cli.config.as_deref())?;
    let mut scene = read_scene(&cli.scene)?;
    for assignment in &cli.options {
        scene.options.parse_assignment(assignment)?;
    }

    if cli.validate {
        if !issues.is_empty() {
            error!(count = issues.len(), "config has invalid values");
        }
        if scene.method.parse::<LayoutMethod>().is_err() {
            error!(method = %scene.method, "scene names an unknown layout method");
            return Ok(false);
        }
        info!(tiles = scene.tiles.len(), "scene is valid");
        return Ok(issues.is_empty());
    }

    let mut tiles: Vec<Tile> = scene.tiles.iter().map(TileSpec::build).collect();
    let mut by_role: HashMap<Role, Vec<&mut Tile>> = HashMap::default();
    for role in [Role::Objects, Role::Outers, Role::Inners] {
        by_role.insert(role, Vec::new());
    }
    for (tile, spec) in tiles.iter_mut().zip(&scene.tiles) {
        by_role.entry(spec.role).or_default().push(tile);
    }
    let mut groups = Groups::new();
    for (role, objects) in by_role {
        groups.insert(role, objects);
    }

    let manager = LayoutManager::new(config.settings);
    let result = manager.arrange_named(&scene.method, scene.outer, scene.inner, &mut groups, &scene.options);
    drop(groups);

    for tile in &mut tiles {
        tile.settle();
    }
    let report = Report {
        method: &scene.method,
        error: result.as_ref().err().map(ToString::to_string),
        tiles: &tiles,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(result.is_ok())
}

fn main() {
    let cli = Cli::parse();
    log::init_logging();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    }
}
