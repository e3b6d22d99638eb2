use clap::Parser;
use serde::Serialize;
use task_dispatch::cli::{Cli, Commands};
use task_dispatch::error::Result;
use task_dispatch::logging::{init_from_env, ApplicationMode, LoggingConfig};
use task_dispatch::project::ProjectContext;
use task_dispatch::service::{self, ServiceResponse};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_config = if cli.command == Commands::McpServer {
        LoggingConfig::for_mode(ApplicationMode::McpServer)
    } else {
        LoggingConfig::from_args(cli.quiet, cli.verbose > 0, cli.json)
    };

    if let Err(e) = init_from_env(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    match run(&cli).await {
        Ok(true) => {},
        Ok(false) => std::process::exit(1),
        Err(e) => {
            let error_response = e.to_error_response();
            match serde_json::to_string_pretty(&error_response) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", error_response.error),
            }
            std::process::exit(1);
        },
    }
}

/// Returns whether the command succeeded.
async fn run(cli: &Cli) -> Result<bool> {
    let ctx = match &cli.config {
        Some(path) => ProjectContext::new(path.clone())?,
        None => ProjectContext::from_env()?,
    };

    match &cli.command {
        Commands::Next => print_response(&service::next_task(&ctx.store())),

        Commands::Status { identifier, status } => print_response(&service::set_task_status(
            &ctx.store(),
            identifier,
            status,
        )),

        Commands::Reset => print_response(&service::initialize_tasks(&ctx.store())),

        Commands::Info => {
            let info = ctx.info()?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(true)
        },

        Commands::McpServer => {
            ctx.validate()?;
            task_dispatch::mcp::run(ctx).await?;
            Ok(true)
        },
    }
}

fn print_response<T: Serialize>(response: &ServiceResponse<T>) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(response.is_success())
}
