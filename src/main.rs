use clap::Parser;
use postlens::cli::commands::{Cli, Commands};
use postlens::config::AppConfig;
use postlens::domain::entities::category::{CategoryUpdate, NewCategory};
use postlens::domain::entities::post::{NewPost, PostUpdate};
use postlens::domain::values::analysis_kind::AnalysisKind;
use postlens::domain::values::post_filter::PostFilter;
use postlens::PostLens;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let pl = match PostLens::new(&config) {
        Ok(pl) => pl,
        Err(e) => {
            tracing::error!(error = %e, "failed to open database");
            eprintln!("Error initializing PostLens: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(pl, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries only command output.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_command(pl: PostLens, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::CategoryAdd { json } => {
            let category: NewCategory = serde_json::from_str(&json)?;
            print_json(&pl.create_category(category)?)?;
        }
        Commands::CategoryGet { id } => print_json(&pl.get_category(id)?)?,
        Commands::CategoryUpdate { id, json } => {
            let update: CategoryUpdate = serde_json::from_str(&json)?;
            print_json(&pl.update_category(id, update)?)?;
        }
        Commands::CategoryDelete { id } => {
            pl.delete_category(id)?;
            println!("Category {id} deleted");
        }
        Commands::Categories => print_json(&pl.list_categories()?)?,
        Commands::Add { json } => {
            let post: NewPost = serde_json::from_str(&json)?;
            print_json(&pl.create_post(post)?)?;
        }
        Commands::Get { id } => print_json(&pl.get_post(id)?)?,
        Commands::Update { id, json } => {
            let update: PostUpdate = serde_json::from_str(&json)?;
            print_json(&pl.update_post(id, update)?)?;
        }
        Commands::Delete { id } => {
            pl.delete_post(id)?;
            println!("Post {id} deleted");
        }
        Commands::Posts { filter } => {
            let filter: PostFilter = filter.into();
            print_json(&pl.list_posts(&filter)?)?;
        }
        Commands::Analyze { id, no_run } => print_json(&pl.get_analysis(id, !no_run)?)?,
        Commands::AnalyzeBatch {
            filter,
            kinds,
            no_save,
            merged,
        } => {
            let filter: PostFilter = filter.into();
            if merged {
                print_json(&pl.analyze_batch_merged(&filter, &kinds, !no_save).await?)?;
            } else {
                print_json(&pl.analyze_batch(&filter, &kinds, !no_save).await?)?;
            }
        }
        Commands::History { id, kind } => {
            let kind = kind.map(|k| k.parse::<AnalysisKind>()).transpose()?;
            print_json(&pl.analysis_history(id, kind)?)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
