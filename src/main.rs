mod commands;
mod fmap;
mod utils;

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use commands::ProgramContext;
use commands::extract::ExtractOptions;
use utils::digest::DigestAlgorithm;
use utils::kv::{KvStyle, RenderConfig};

#[derive(Parser, Debug)]
#[command(name = "fmapinfo", version, about = "Flash map (FMAP) inspector for firmware images")]
struct Args {
    /// Output style
    #[arg(long, value_enum, default_value_t = KvStyle::Pair, global = true)]
    style: KvStyle,
    /// Print only the value of this key
    #[arg(long, global = true)]
    key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the flash map of one or more images
    Map {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Checksum the static areas of an image (whole image if it has no FMAP)
    Csum {
        image: PathBuf,
        #[arg(long, value_enum, default_value_t = DigestAlgorithm::Sha1)]
        algo: DigestAlgorithm,
    },
    /// Save the areas of an image to separate files
    Extract {
        image: PathBuf,
        output_folder: PathBuf,
        /// Only extract this area
        #[arg(long)]
        area: Option<String>,
        /// Also save the FMAP table as _fmap.bin
        #[arg(long)]
        dump_fmap: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let ctx = ProgramContext {
        render: RenderConfig { style: args.style, single_key: args.key },
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Map { images } => {
            commands::map::run_map(&ctx, &mut out, &images)?
        }
        Command::Csum { image, algo } => {
            commands::csum::run_csum(&ctx, &mut out, &image, algo)?
        }
        Command::Extract { image, output_folder, area, dump_fmap } => {
            let options = ExtractOptions { area: area.as_deref(), dump_fmap };
            commands::extract::run_extract(&ctx, &mut out, &image, &output_folder, &options)?
        }
    }

    Ok(())
}
