//! Prefab Materials CLI
//!
//! Tally materials and inspect layers of JSON voxel prefabs.

use clap::{Parser, Subcommand, ValueEnum};
use prefab_materials::{
    render_png, render_table, render_text, report_json, DisplayNames, FileStore, LayerView,
    RenderConfig, Session, MAX_GRID_CELLS,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "prefab-materials")]
#[command(author, version, about = "Tally materials and inspect layers of JSON voxel prefabs", long_about = None)]
struct Cli {
    /// State file holding the last import, colors and checked items
    #[arg(short, long, global = true, default_value = ".prefab-materials.json")]
    state: PathBuf,

    /// Display names: a JSON object file, or a resource pack (ZIP or directory)
    #[arg(short, long, global = true)]
    names: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a prefab and print its materials
    Import {
        /// Prefab JSON file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the materials of the last import
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Mark a material as collected
    Check {
        /// Material name as listed by `show`
        name: String,

        /// Clear the mark instead
        #[arg(long)]
        off: bool,
    },

    /// List layers of the last import with their block counts
    Layers,

    /// Show one layer as a grid
    Layer {
        /// Layer y coordinate
        #[arg(allow_hyphen_values = true)]
        y: i32,

        /// Write the grid as PNG instead of printing it
        #[arg(long)]
        png: Option<PathBuf>,

        /// PNG cell size in pixels
        #[arg(long, default_value = "16")]
        cell_size: u32,

        /// Disable PNG grid lines
        #[arg(long)]
        no_grid_lines: bool,
    },

    /// Forget the last import (colors and checked items are kept)
    Clear,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON report
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let display_names = load_display_names(cli.names.as_deref())?;
    let store = FileStore::open(&cli.state);
    log::debug!("Using state file {:?}", store.path());
    let mut session = Session::open(store, display_names);

    match cli.command {
        Commands::Import { input, format } => {
            println!("Loading prefab from {:?}...", input);
            let data = fs::read(&input)?;
            let summary = session.import_bytes(&data)?;
            println!(
                "  Loaded {} blocks, {} layers",
                session.blocks().len(),
                session.layer_options().len()
            );
            log::debug!("Import summary: {:?}", summary);
            print_materials(&session, format)?;
        }
        Commands::Show { format } => {
            print_materials(&session, format)?;
        }
        Commands::Check { name, off } => {
            if session.materials().get(&name).is_none() {
                println!("Note: {} is not in the current materials", name);
            }
            session.set_checked(&name, !off);
            println!("[{}] {}", if off { ' ' } else { 'x' }, name);
        }
        Commands::Layers => {
            let layers = session.layer_options();
            if layers.is_empty() {
                println!("No positioned blocks in the current import");
            }
            for layer in layers {
                println!("y={:>4}  {} blocks", layer.y, layer.count);
            }
        }
        Commands::Layer {
            y,
            png,
            cell_size,
            no_grid_lines,
        } => {
            session.select_layer(Some(y));
            let config = RenderConfig::default()
                .with_cell_size(cell_size)
                .with_grid_lines(!no_grid_lines);
            show_layer(&session.layer_view(), png.as_deref(), &config)?;
        }
        Commands::Clear => {
            session.clear();
            println!("Cleared the current import");
        }
    }

    Ok(())
}

fn load_display_names(path: Option<&Path>) -> Result<DisplayNames, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            println!("Loading display names from {:?}...", path);
            let names = DisplayNames::load(path)?;
            println!("  Found {} names", names.len());
            Ok(names)
        }
        None => Ok(DisplayNames::bundled()),
    }
}

fn print_materials(
    session: &Session<FileStore>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = session.material_rows();
    let summary = session.summary();

    match format {
        OutputFormat::Table => print!("{}", render_table(&rows, &summary)),
        OutputFormat::Json => println!("{}", report_json(&rows, &summary)?),
    }

    Ok(())
}

fn show_layer(
    view: &LayerView,
    png: Option<&Path>,
    config: &RenderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match view {
        LayerView::NoLayerSelected => println!("Select a layer to view"),
        LayerView::EmptyLayer { y } => println!("Layer y={} has no blocks", y),
        LayerView::TooLarge { y, width, depth } => println!(
            "Layer y={} spans {}x{} cells, too large to show (limit {})",
            y, width, depth, MAX_GRID_CELLS
        ),
        LayerView::Grid(grid) => match png {
            Some(path) => {
                let bytes = render_png(grid, config)?;
                fs::write(path, &bytes)?;
                println!(
                    "Exported {}x{} layer grid ({} bytes) to {:?}",
                    grid.width(),
                    grid.depth(),
                    bytes.len(),
                    path
                );
            }
            None => print!("{}", render_text(grid)),
        },
    }

    Ok(())
}
