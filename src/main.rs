mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, ConfigAction};
use repo_ignore_tracker::config::Config;
use repo_ignore_tracker::operations;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志，输出到 stderr 以免混入 JSON 结果
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // 加载配置
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config = if cli.config.is_some() {
        Config::load_from_file(&config_path)?
    } else {
        Config::load_or_create_default()?
    };

    // 根据命令执行相应操作
    match cli.command {
        Commands::Repos { paths, format } => {
            let paths = config.resolve_workspace_paths(&paths);
            operations::list_repositories(&config, &paths, format.unwrap_or(config.output.format))?;
        }
        Commands::Scan { paths, format } => {
            let paths = config.resolve_workspace_paths(&paths);
            operations::scan(&config, &paths, format.unwrap_or(config.output.format)).await?;
        }
        Commands::Check {
            files,
            workspace,
            format,
        } => {
            let paths = config.resolve_workspace_paths(&workspace);
            operations::check(&config, &files, &paths, format.unwrap_or(config.output.format)).await?;
        }
        Commands::Stats { paths, format } => {
            let paths = config.resolve_workspace_paths(&paths);
            operations::stats(&config, &paths, format.unwrap_or(config.output.format)).await?;
        }
        Commands::Config { action } => run_config_action(action, &config, config_path)?,
    }

    Ok(())
}

fn run_config_action(action: ConfigAction, config: &Config, config_path: PathBuf) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Reset => {
            Config::default().save_to_file(&config_path)?;
            println!("配置已重置: {}", config_path.display());
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
