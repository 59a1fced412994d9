mod build_cmd;
mod config;
mod deploy_cmd;
mod init_cmd;
mod login_cmd;
mod session;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "delfx", about = "Delta Functions CLI - init, build, and deploy projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize an empty Delta Functions project
    Init {
        /// Project directory (defaults to the current directory)
        path: Option<PathBuf>,
    },

    /// Build the project and package the result as a deployable archive
    Build {
        /// Project directory (defaults to the current directory)
        path: Option<PathBuf>,

        /// Branch to build (defaults to the checked-out branch)
        #[arg(long)]
        branch: Option<String>,

        /// Commit to build (defaults to the branch head, short hash)
        #[arg(long)]
        commit: Option<String>,

        /// Check out the requested branch/commit even if the working tree
        /// has uncommitted changes
        #[arg(long)]
        allow_dirty: bool,
    },

    /// Log in to Delta Functions
    Login,

    /// Upload the project's build artifact to Delta Functions
    Deploy {
        /// Project directory (defaults to the current directory)
        path: Option<PathBuf>,

        /// Branch of the artifact to deploy (defaults to the checked-out branch)
        #[arg(long)]
        branch: Option<String>,

        /// Commit of the artifact to deploy (defaults to the branch head)
        #[arg(long)]
        commit: Option<String>,
    },

    /// Show or set configuration
    Config {
        /// Set the API server URL
        #[arg(long)]
        server_url: Option<String>,

        /// Set the client API key
        #[arg(long)]
        client_key: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { path } => init_cmd::run_init(path.as_deref()),
        Commands::Build {
            path,
            branch,
            commit,
            allow_dirty,
        } => build_cmd::run_build(path.as_deref(), branch.as_deref(), commit.as_deref(), allow_dirty)
            .map(|_| ()),
        Commands::Login => login_cmd::run_login().await,
        Commands::Deploy {
            path,
            branch,
            commit,
        } => deploy_cmd::run_deploy(path.as_deref(), branch.as_deref(), commit.as_deref()).await,
        Commands::Config {
            server_url,
            client_key,
        } => {
            if server_url.is_none() && client_key.is_none() {
                config::show_config()
            } else {
                config::set_config(server_url, client_key)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
