use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio content backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for the database and media bucket
    #[arg(long, global = true, env = "FOLIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Reject admin writes
        #[arg(long)]
        read_only: bool,
    },

    /// Manage portfolio content
    #[command(subcommand)]
    Content(ContentCommands),

    /// Show project cards as the public page renders them
    Projects {
        /// all, website, video or certificate
        #[arg(long, default_value = "all")]
        category: String,
    },

    /// Upload a media file into the bucket
    Upload {
        /// website, video or certificate
        #[arg(value_name = "TYPE")]
        content_type: String,

        file: PathBuf,
    },

    /// Manage admin access
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Print the active configuration
    Config,

    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ContentCommands {
    /// List content, newest first
    List {
        /// Only this type
        #[arg(long = "type", value_name = "TYPE")]
        content_type: Option<String>,

        /// Include hidden items
        #[arg(long)]
        all: bool,
    },

    /// Print one item as JSON
    Get {
        id: String,
    },

    /// Create an item
    Add {
        /// website, video or certificate
        #[arg(value_name = "TYPE")]
        content_type: String,

        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        media_url: Option<String>,

        #[arg(long)]
        link: Option<String>,

        /// Comma separated
        #[arg(long)]
        tags: Option<String>,

        /// Create hidden
        #[arg(long)]
        hidden: bool,
    },

    /// Change fields of an item. An empty value clears the field.
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        media_url: Option<String>,

        #[arg(long)]
        link: Option<String>,

        /// Comma separated
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete an item permanently
    Remove {
        id: String,
    },

    /// Make an item visible on the public page
    Show {
        id: String,
    },

    /// Hide an item from the public page
    Hide {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Give a registered user dashboard access
    Grant {
        email: String,
    },

    /// Take dashboard access away
    Revoke {
        email: String,
    },

    /// List registered users
    List,
}
