use crate::prelude::*;
use clap::Parser;

mod batch;
mod config;
mod error;
mod inspect;
mod outline;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Infer title and heading outlines from the typography of PDF documents"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// TOML file with `[outline]` thresholds and `[batch]` settings
    #[clap(long, env = "PDFOUTLINE_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "PDFOUTLINE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Outline every PDF in a directory and write one JSON file per document
    Batch(crate::batch::App),

    /// Print the outline of a single PDF
    Outline(crate::outline::App),

    /// Print the merged lines, font statistics and classifier verdicts of a PDF
    Inspect(crate::inspect::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();

    let default_filter = if app.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    color_eyre::install()?;

    match app.command {
        SubCommands::Batch(sub_app) => crate::batch::run(sub_app, app.global).await,
        SubCommands::Outline(sub_app) => crate::outline::run(sub_app, app.global).await,
        SubCommands::Inspect(sub_app) => crate::inspect::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
