use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "postlens", about = "Categorised posts with text analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Filter and pagination flags shared by listing commands.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[arg(long, default_value = "10")]
    pub limit: usize,
    #[arg(long, default_value = "0")]
    pub offset: usize,
    #[arg(long)]
    pub category_id: Option<i64>,
    #[arg(long)]
    pub category_name: Option<String>,
    /// Text to search for in title and content
    #[arg(long)]
    pub search: Option<String>,
    /// Case-insensitive substring match instead of full-text search
    #[arg(long)]
    pub substring: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a category
    CategoryAdd {
        /// JSON with name and optional description
        json: String,
    },
    /// Show a category
    CategoryGet { id: i64 },
    /// Update a category
    CategoryUpdate {
        id: i64,
        /// JSON with any of name, description
        json: String,
    },
    /// Delete a category with all of its posts
    CategoryDelete { id: i64 },
    /// List categories
    Categories,
    /// Create a post
    Add {
        /// JSON with category_id, content and optional title
        json: String,
    },
    /// Show a post with its category
    Get { id: i64 },
    /// Update a post
    Update {
        id: i64,
        /// JSON with any of category_id, title, content
        json: String,
    },
    /// Delete a post
    Delete { id: i64 },
    /// List posts
    Posts {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show the latest analyses of a post, computing missing ones
    Analyze {
        id: i64,
        /// Only read stored analyses
        #[arg(long)]
        no_run: bool,
    },
    /// Analyse every post on a filtered page
    AnalyzeBatch {
        #[command(flatten)]
        filter: FilterArgs,
        /// Analysis kind (word_frequency, text_stats, tags); repeatable, all when omitted
        #[arg(long = "kind")]
        kinds: Vec<String>,
        /// Do not store the results
        #[arg(long)]
        no_save: bool,
        /// Print the merged latest analyses of each post
        #[arg(long)]
        merged: bool,
    },
    /// List every stored analysis of a post, oldest first
    History {
        id: i64,
        #[arg(long)]
        kind: Option<String>,
    },
}

impl From<FilterArgs> for crate::domain::values::post_filter::PostFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            limit: args.limit,
            offset: args.offset,
            category_id: args.category_id,
            category_name: args.category_name,
            search_query: args.search,
            use_fulltext: !args.substring,
        }
    }
}
