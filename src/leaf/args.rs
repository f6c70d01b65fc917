use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::theme::Theme;

#[derive(Parser, Debug, Clone)]
#[command(name = "leaf")]
#[command(version)]
#[command(about = "a small local note keeper", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// View a note by id or list position
    #[arg(required = false)]
    pub note: Option<String>,

    /// Store directory to use
    #[arg(long, env = "LEAF_DIR", global = true)]
    pub dir: Option<String>,

    /// Do not ask for confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a note and print its id
    New {
        /// Title of the note
        #[arg(short, long)]
        title: Option<String>,

        /// Content of the note
        #[arg(short, long)]
        content: Option<String>,

        /// Summary of the note
        #[arg(short, long)]
        summary: Option<String>,

        /// Write the content in $EDITOR
        #[arg(short, long)]
        editor: bool,
    },

    /// Edit an existing note
    Edit {
        /// Id or list position of the note
        note: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New content
        #[arg(short, long)]
        content: Option<String>,

        /// New summary
        #[arg(short, long, conflicts_with = "clear_summary")]
        summary: Option<String>,

        /// Remove the summary
        #[arg(long)]
        clear_summary: bool,

        /// Edit the content in $EDITOR
        #[arg(short, long)]
        editor: bool,
    },

    /// Delete notes
    Del {
        /// Ids or list positions of the notes to delete
        #[arg(required = true)]
        notes: Vec<String>,
    },

    /// Show a single note
    View {
        /// Id or list position of the note
        note: String,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,

        /// Condensed output
        #[arg(short, long)]
        condensed: bool,
    },

    /// List notes (default if no command)
    List {
        /// Limit results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Most recently updated first
        #[arg(short, long)]
        updated: bool,

        /// Reverse order
        #[arg(short, long)]
        reverse: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,

        /// Condensed output
        #[arg(short, long)]
        condensed: bool,
    },

    /// Toggle the theme, or set it explicitly
    Theme {
        theme: Option<ThemeArg>,
    },

    /// Show store info
    Info,

    /// Delete all notes
    Clear,

    /// Open an interactive session
    Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Theme {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}
