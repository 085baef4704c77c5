//! tmxinfo - decode a TMX map and summarize its layers

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tmxkit::{DecodeOptions, Map, MapLoader, TilesetOrder};
use tmxkit_config::DecoderConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tmxinfo", about = "Decode a TMX map and summarize its layers")]
struct Cli {
    /// Path to the .tmx file
    map: PathBuf,

    /// Options file (defaults to ./tmxkit.txt when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sort tilesets by firstgid before resolving tiles
    #[arg(long)]
    sorted: bool,

    /// Decode layers in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct MapSummary<'a> {
    width: u32,
    height: u32,
    tilesets: Vec<&'a str>,
    layers: Vec<LayerSummary<'a>>,
}

#[derive(Serialize)]
struct LayerSummary<'a> {
    name: &'a str,
    empty: bool,
    /// Name of the single tileset, `None` when empty or mixed
    tileset: Option<&'a str>,
    tiles: usize,
    flipped: usize,
}

fn summarize(map: &Map) -> MapSummary<'_> {
    let layers = map
        .layers
        .iter()
        .map(|layer| LayerSummary {
            name: &layer.name,
            empty: layer.empty,
            tileset: map.layer_tileset(layer).map(|t| t.name.as_str()),
            tiles: layer.decoded_tiles.iter().filter(|t| !t.is_nil()).count(),
            flipped: layer
                .decoded_tiles
                .iter()
                .filter(|t| t.horizontal_flip || t.vertical_flip || t.diagonal_flip)
                .count(),
        })
        .collect();

    MapSummary {
        width: map.width,
        height: map.height,
        tilesets: map.tilesets.iter().map(|t| t.name.as_str()).collect(),
        layers,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DecoderConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DecoderConfig::load_default(),
    };
    if cli.sorted {
        config.tileset_order = TilesetOrder::Sorted;
    }
    if cli.parallel {
        config.parallel_layers = true;
    }

    // RUST_LOG takes precedence over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    config.display();

    let options = DecodeOptions {
        tileset_order: config.tileset_order,
        parallel_layers: config.parallel_layers,
    };

    info!("Loading {}", cli.map.display());
    let map = MapLoader::load_file(&cli.map, &options)
        .with_context(|| format!("failed to decode {}", cli.map.display()))?;
    info!(
        "Decoded {}x{} map: {} tilesets, {} layers",
        map.width,
        map.height,
        map.tilesets.len(),
        map.layers.len()
    );

    let summary = summarize(&map);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{} x {} tiles", summary.width, summary.height);
        for layer in &summary.layers {
            let owner = match (layer.empty, layer.tileset) {
                (true, _) => "empty".to_string(),
                (false, Some(name)) => format!("tileset {}", name),
                (false, None) => "multiple tilesets".to_string(),
            };
            println!(
                "  {:<24} {:>6} tiles  {:>6} flipped  {}",
                layer.name, layer.tiles, layer.flipped, owner
            );
        }
    }

    Ok(())
}
