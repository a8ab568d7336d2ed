//! Subcommands of the `helirin` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use helirin_core::{
    ExactState, FloodTuning, MapView, Pixel, PlannerConfig, SearchTuning, WallClipPolicy, Zone,
};
use helirin_system_flooding::Flooding;
use helirin_system_search::{Planner, SearchReport};
use helirin_world::{pixel_centre, PointMassConfig, PointMassPhysics, TileMap};
use serde::{Deserialize, Serialize};

/// Tuning file accepted by `--config`.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    flood: FloodTuning,
    search: SearchTuning,
    physics: PointMassConfig,
}

impl ConfigFile {
    fn planner(&self) -> PlannerConfig {
        PlannerConfig {
            flood: self.flood,
            search: self.search,
        }
    }
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub(crate) struct MapArgs {
    /// ASCII map: `#` wall, `.` free, `E` ending, `S` starting, `H` healing
    #[arg(long)]
    map: PathBuf,

    /// TOML tuning file with optional `[flood]`, `[search]` and `[physics]` tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wall-clip policy used for the cost map
    #[arg(long, default_value_t = WallClipPolicy::Allow)]
    policy: WallClipPolicy,

    /// Multiplier applied to the ground-wall bonus
    #[arg(long, default_value_t = 1.0)]
    gwb_mult: f32,

    /// Multiplier applied to the wall-ground malus
    #[arg(long, default_value_t = 1.0)]
    wgm_mult: f32,

    /// Planning window as `X0,Y0,X1,Y1`; defaults to the whole map
    #[arg(long, value_parser = parse_window)]
    window: Option<(Pixel, Pixel)>,
}

struct Loaded {
    map: TileMap,
    config: ConfigFile,
    start: Pixel,
    end: Pixel,
}

impl MapArgs {
    fn load(&self) -> Result<Loaded> {
        let layout = fs::read_to_string(&self.map)
            .with_context(|| format!("failed to read map {}", self.map.display()))?;
        let map = TileMap::from_ascii(&layout)
            .with_context(|| format!("failed to parse map {}", self.map.display()))?;
        let config = load_config(self.config.as_deref())?;
        let (start, end) = self
            .window
            .unwrap_or_else(|| (map.pixel_start(), map.pixel_end()));

        tracing::info!(
            map = %self.map.display(),
            width = map.width_px(),
            height = map.height_px(),
            "loaded map",
        );

        Ok(Loaded {
            map,
            config,
            start,
            end,
        })
    }
}

fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .planner()
        .validate()
        .with_context(|| format!("invalid tuning in {}", path.display()))?;
    Ok(config)
}

/// Prints a summary of the flood fields.
#[derive(Args, Debug)]
pub(crate) struct FieldsCommand {
    #[command(flatten)]
    map: MapArgs,
}

impl FieldsCommand {
    pub(crate) fn execute(&self, out: &mut impl Write) -> Result<()> {
        let loaded = self.map.load()?;
        let flooding = Flooding::new(&loaded.map, loaded.start, loaded.end, loaded.config.flood)?;
        let costs = flooding
            .compute_cost_map(self.map.gwb_mult, self.map.wgm_mult, self.map.policy)
            .context("failed to compute the cost map")?;

        let window = flooding.window();
        let legal = flooding
            .legal_zones()
            .cells()
            .iter()
            .filter(|&&legal| legal)
            .count();
        let max_distance = flooding
            .distance_field()
            .cells()
            .iter()
            .copied()
            .filter(|distance| distance.is_finite())
            .fold(0.0_f32, f32::max);

        writeln!(
            out,
            "window: {} to {} ({}x{})",
            window.start(),
            window.end(),
            window.width(),
            window.height()
        )?;
        writeln!(out, "legal pixels: {legal}")?;
        writeln!(out, "max distance to wall: {max_distance:.3}")?;
        writeln!(out, "policy: {}", costs.policy())?;
        writeln!(out, "reachable pixels: {}", costs.reachable_count())?;
        writeln!(out, "max finite cost: {:.3}", costs.max_finite())?;
        Ok(())
    }
}

/// Plans a route with the point-mass physics and prints it as JSON.
#[derive(Args, Debug)]
pub(crate) struct SolveCommand {
    #[command(flatten)]
    map: MapArgs,

    /// Start pixel as `X,Y`; defaults to the first starting-zone pixel
    #[arg(long, value_parser = parse_pixel)]
    start: Option<Pixel>,
}

impl SolveCommand {
    pub(crate) fn execute(&self, out: &mut impl Write) -> Result<()> {
        let loaded = self.map.load()?;
        let start = match self.start {
            Some(pixel) => pixel,
            None => match loaded.map.find_zone(Zone::Starting).first() {
                Some(&pixel) => pixel,
                None => bail!("map has no starting zone; pass --start"),
            },
        };

        let physics = PointMassPhysics::new(&loaded.map, loaded.config.physics);
        let mut planner = Planner::new(
            &loaded.map,
            physics,
            loaded.start,
            loaded.end,
            &loaded.config.planner(),
        )?;
        planner
            .compute_new_cost_maps(self.map.gwb_mult, self.map.wgm_mult, self.map.policy)
            .context("failed to compute the cost map")?;

        let initial = ExactState::at_rest(pixel_centre(start.x()), pixel_centre(start.y()), 0);
        let report = planner
            .solve_with_report(&initial)
            .with_context(|| format!("failed to plan from {start}"))?;

        let plan = PlanOutput::new(start, self.map.policy, &report);
        serde_json::to_writer_pretty(&mut *out, &plan)?;
        writeln!(out)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct PlanOutput {
    start: Pixel,
    policy: WallClipPolicy,
    solved: bool,
    ticks: usize,
    actions: Vec<StepOutput>,
    expanded: usize,
    discovered: usize,
    improved: usize,
}

#[derive(Debug, Serialize)]
struct StepOutput {
    action: u8,
    horizontal: i8,
    vertical: i8,
}

impl PlanOutput {
    fn new(start: Pixel, policy: WallClipPolicy, report: &SearchReport) -> Self {
        let actions: Vec<StepOutput> = report
            .actions
            .iter()
            .flatten()
            .map(|action| {
                let (horizontal, vertical) = action.axes();
                StepOutput {
                    action: action.index(),
                    horizontal,
                    vertical,
                }
            })
            .collect();
        Self {
            start,
            policy,
            solved: report.actions.is_some(),
            ticks: actions.len(),
            actions,
            expanded: report.expanded,
            discovered: report.discovered,
            improved: report.improved,
        }
    }
}

fn parse_coordinates<const N: usize>(value: &str) -> Result<[i32; N], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated integers, got `{value}`"));
    }
    let mut coordinates = [0; N];
    for (slot, part) in coordinates.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("`{part}` is not an integer"))?;
    }
    Ok(coordinates)
}

fn parse_pixel(value: &str) -> Result<Pixel, String> {
    let [x, y] = parse_coordinates::<2>(value)?;
    Ok(Pixel::new(x, y))
}

fn parse_window(value: &str) -> Result<(Pixel, Pixel), String> {
    let [x0, y0, x1, y1] = parse_coordinates::<4>(value)?;
    Ok((Pixel::new(x0, y0), Pixel::new(x1, y1)))
}
