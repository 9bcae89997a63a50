use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ink",
    about = "Inkpost - a tiny blog kept in a key-value store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON file holding all posts and comments
    #[arg(long, global = true, env = "INKPOST_STORE", default_value = "inkpost.json")]
    pub store: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a page by location, e.g. `post.html?id=5`
    Open(OpenArgs),
    /// Show the post list
    List,
    /// Show one post with its comments
    Show(ShowArgs),
    /// Create a post
    Create(CreateArgs),
    /// Comment on a post
    Comment(CommentArgs),
    /// Delete a post
    Delete(DeleteArgs),
    /// Remove comment collections whose post no longer exists
    Sweep(SweepArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct OpenArgs {
    pub location: String,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(short, long, default_value = "")]
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub content: String,
    #[arg(short, long, default_value = "")]
    pub image: String,
}

#[derive(Args)]
pub struct CommentArgs {
    pub id: String,
    #[arg(short, long, default_value = "")]
    pub author: String,
    #[arg(short, long, default_value = "")]
    pub text: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct SweepArgs {
    /// Only list the orphaned collections
    #[arg(long)]
    pub dry_run: bool,
}
