use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnlyArg {
    Model,
    Controller,
    Views,
}

impl From<OnlyArg> for crud_scaffold::Component {
    fn from(arg: OnlyArg) -> Self {
        match arg {
            OnlyArg::Model => crud_scaffold::Component::Model,
            OnlyArg::Controller => crud_scaffold::Component::Controller,
            OnlyArg::Views => crud_scaffold::Component::Views,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DescribeFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "crud-scaffold")]
#[command(about = "Generate model, controller and views from a database table")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory (defaults to current directory)
    #[arg(short = 'P', long, global = true)]
    project: Option<PathBuf>,

    /// Configuration file (defaults to <project>/crud.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database URL, overrides the configuration
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Read the schema from a YAML snapshot instead of a database
    #[arg(long, global = true, conflicts_with = "database_url")]
    schema_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CRUD files for a table
    Make {
        /// Table name
        table: String,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Show what would be written without touching the disk
        #[arg(long)]
        dry_run: bool,

        /// Route name (defaults to the kebab-case plural of the model)
        #[arg(long)]
        route: Option<String>,

        /// Generate only one component
        #[arg(long, value_enum)]
        only: Option<OnlyArg>,
    },

    /// Show columns, foreign keys and inferred relations of a table
    Describe {
        /// Table name
        table: String,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: DescribeFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let project_path = cli.project.unwrap_or_else(|| PathBuf::from("."));
    let source = commands::SchemaSource {
        project_path: project_path.clone(),
        config_path: cli
            .config
            .unwrap_or_else(|| project_path.join(commands::DEFAULT_CONFIG_FILE)),
        database_url: cli.database_url,
        schema_file: cli.schema_file,
    };

    match cli.command {
        Commands::Make {
            table,
            force,
            dry_run,
            route,
            only,
        } => {
            let options = commands::make::MakeOptions {
                route,
                only: only.map(Into::into),
                force,
                dry_run,
            };
            commands::make::run(project_path, source, table, options).await
        }
        Commands::Describe { table, format } => {
            let json = matches!(format, DescribeFormat::Json);
            commands::describe::run(source, table, json).await
        }
    }
}
