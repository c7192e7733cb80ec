use clap::Parser;
use leftovr::{
    cli::{commands, Cli, Commands},
    config::Settings,
    Result, RecipeSearch,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,leftovr=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_env()?;
    settings.validate()?;

    info!(
        "Loading recipe corpus from {}",
        settings.data.data_dir.display()
    );
    let search = RecipeSearch::open(&settings).await?;
    info!(
        "Loaded {} recipes, {} unique ingredients",
        search.recipe_count(),
        search.ingredient_count()
    );

    match cli.command {
        Commands::Ingredients {
            items,
            allow_missing,
            top_k,
        } => {
            commands::ingredients(&search, &items, allow_missing, top_k).await?;
        }
        Commands::Describe { query, top_k } => {
            commands::describe(&search, &query, top_k).await?;
        }
        Commands::Hybrid {
            items,
            query,
            allow_missing,
            top_k,
            no_semantic,
        } => {
            commands::hybrid(
                &search,
                &items,
                query.as_deref(),
                allow_missing,
                top_k,
                !no_semantic,
            )
            .await?;
        }
        Commands::Stats => {
            commands::stats(&search);
        }
    }

    Ok(())
}
