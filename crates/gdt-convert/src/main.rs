use clap::{Args, Parser, Subcommand};
use gdt_convert::{ConvertConfig, ConvertError, FsSourceDir, MdlReader, SchemaVariant, WorkDir};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "gdt-convert")]
#[command(about = "Convert Source engine materials and models to GDT asset databases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress progress output (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the materials named in a list file
    Materials(BatchArgs),
    /// Convert the models named in a list file, with their materials
    Models(BatchArgs),
}

#[derive(Args)]
struct BatchArgs {
    /// Root of the source game's asset tree
    #[arg(long)]
    game_dir: PathBuf,

    /// List file, one asset path per line
    #[arg(short, long)]
    list: PathBuf,

    /// Output directory for .gdt and .bat files
    #[arg(short, long)]
    out: PathBuf,

    /// Target record schema
    #[arg(long, value_enum, default_value_t = SchemaVariant::Legacy)]
    schema: SchemaVariant,

    /// Staging directory (defaults to <temp>/corvid)
    #[arg(long)]
    work_dir: Option<PathBuf>,
}

impl BatchArgs {
    fn config(&self) -> ConvertConfig {
        ConvertConfig {
            game_dir: self.game_dir.clone(),
            work_dir: self.work_dir.clone().map(WorkDir::new).unwrap_or_default(),
            out_dir: self.out.clone(),
            schema: self.schema,
        }
    }
}

fn run_materials(args: &BatchArgs) -> Result<usize, ConvertError> {
    let config = args.config();
    let names = gdt_convert::read_list(&args.list)?;
    let records = gdt_convert::convert_materials(&config, &names)?.into_records();
    let count = records.len();
    gdt_convert::write_batch(&config.out_dir, "materials", records, config.schema)?;
    Ok(count)
}

fn run_models(args: &BatchArgs) -> Result<(usize, usize), ConvertError> {
    let config = args.config();
    let source = FsSourceDir::new(&config.game_dir);
    let names = gdt_convert::read_list(&args.list)?;

    let models = gdt_convert::convert_models(&config, &source, &names)?;
    let materials =
        gdt_convert::convert_model_materials(&config, &source, &MdlReader, &models.models)?
            .into_records();
    let counts = (models.records.len(), materials.len());

    gdt_convert::write_batch(&config.out_dir, "models", models.records, config.schema)?;
    gdt_convert::write_batch(&config.out_dir, "model_materials", materials, config.schema)?;
    Ok(counts)
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging (suppressed if --quiet)
    if !cli.quiet {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let result = match &cli.command {
        Commands::Materials(args) => run_materials(args).map(|count| {
            if !cli.quiet {
                eprintln!(
                    "Success: {} records written to {}",
                    count,
                    args.out.display()
                );
            }
        }),
        Commands::Models(args) => run_models(args).map(|(models, materials)| {
            if !cli.quiet {
                eprintln!(
                    "Success: {} models and {} material records written to {}",
                    models,
                    materials,
                    args.out.display()
                );
            }
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
