use anyhow::Context;
use clap::Parser;
use cogload::{
    app::{self, GenerateArgs},
    cli::{Cli, Command},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, mode } => {
            let loaded = Config::load(&config)
                .with_context(|| format!("failed to load config from {}", config.display()))?;
            app::run(loaded, mode).await
        }
        Command::Generate {
            input,
            family,
            levels,
            seed,
            output_dir,
            config,
        } => {
            let manifest = app::generate(GenerateArgs {
                input,
                family,
                levels,
                seed,
                output_dir,
                config,
            })?;
            for file in &manifest.files {
                println!("{}", file);
            }
            Ok(())
        }
    }
}
