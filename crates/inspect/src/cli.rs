use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "awsm-avatar-inspect")]
#[command(about = "Inspect avatar assets and replay scripted UI input against them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the clips, morph targets and meshes an asset exposes
    Catalog {
        /// A .glb/.gltf model, or a .json asset description
        asset: PathBuf,
    },

    /// Run the engine over a timeline of input changes, one JSON line per eventful frame
    Simulate {
        /// A .glb/.gltf model, or a .json asset description
        asset: PathBuf,

        /// Timeline of input changes (JSON)
        #[arg(long, short)]
        script: PathBuf,

        /// Engine config (JSON), missing fields use the defaults
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Simulated frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    },
}
