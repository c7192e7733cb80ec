// Command-line interface for querying a loaded recipe corpus.

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "leftovr")]
#[command(about = "Leftovr - waste-aware recipe search", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find recipes by the ingredients you have
    Ingredients {
        /// Ingredient names (e.g. chicken tomatoes garlic)
        #[arg(required = true)]
        items: Vec<String>,

        /// How many recipe ingredients you are willing to shop for
        #[arg(long, default_value_t = 0)]
        allow_missing: usize,

        /// Number of results to return
        #[arg(long, default_value_t = 10)]
        top_k: usize,
    },

    /// Find recipes by description (requires the vector backend)
    Describe {
        /// What you feel like eating (e.g. "easy Italian pasta")
        query: String,

        /// Number of results to return
        #[arg(long, default_value_t = 10)]
        top_k: usize,
    },

    /// Combined ingredient + description search
    Hybrid {
        /// Ingredient names
        #[arg(required = true)]
        items: Vec<String>,

        /// Optional description of what you want to cook
        #[arg(long)]
        query: Option<String>,

        /// How many recipe ingredients you are willing to shop for
        #[arg(long, default_value_t = 0)]
        allow_missing: usize,

        /// Number of results to return
        #[arg(long, default_value_t = 10)]
        top_k: usize,

        /// Skip the semantic boost even if the backend is configured
        #[arg(long)]
        no_semantic: bool,
    },

    /// Show corpus and backend status
    Stats,
}
