use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use minegrid_core::{CellCount, Coord, Difficulty, GameConfig};
use serde::Deserialize;

/// Board and session options, command line values win over the config file.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub(crate) struct SettingsArgs {
    /// Board preset: beginner, intermediate or expert
    #[arg(short, long)]
    preset: Option<Difficulty>,

    /// Board width, overrides the preset
    #[arg(long)]
    width: Option<Coord>,

    /// Board height, overrides the preset
    #[arg(long)]
    height: Option<Coord>,

    /// Mine count, overrides the preset
    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print renderer events as JSON lines instead of drawing the board
    #[arg(long)]
    json: bool,

    /// TOML file with default settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    preset: Option<Difficulty>,
    width: Option<Coord>,
    height: Option<Coord>,
    mines: Option<CellCount>,
    seed: Option<u64>,
    json: Option<bool>,
}

impl FileSettings {
    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub game: GameConfig,
    pub seed: Option<u64>,
    pub json: bool,
}

impl Settings {
    pub(crate) fn load(args: &SettingsArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileSettings::read(path)?,
            None => FileSettings::default(),
        };
        Self::merge(args, file)
    }

    fn merge(args: &SettingsArgs, file: FileSettings) -> Result<Self> {
        let preset = args.preset.or(file.preset).unwrap_or_default();
        let base = preset.config();
        let size = (
            args.width.or(file.width).unwrap_or(base.size.0),
            args.height.or(file.height).unwrap_or(base.size.1),
        );
        let mines = args.mines.or(file.mines).unwrap_or(base.mines);
        let game = GameConfig::new(size, mines).with_context(|| {
            format!(
                "Invalid board {}x{} with {} mines",
                size.0, size.1, mines
            )
        })?;

        Ok(Self {
            game,
            seed: args.seed.or(file.seed),
            json: args.json || file.json.unwrap_or(false),
        })
    }
}
