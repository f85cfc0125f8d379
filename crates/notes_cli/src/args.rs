//! Command line arguments.

use clap::{Parser, Subcommand};
use notes_core::config::DATA_DIR_ENV;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pinned, searchable notes with images", long_about = None)]
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Directory holding the notes database and images
    #[arg(long, value_name = "DIR", env = DATA_DIR_ENV, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a note. Images go inline in BODY as `![](path)`
    Add {
        #[arg(value_name = "TITLE")]
        title: String,

        #[arg(value_name = "BODY", default_value = "")]
        body: String,
    },

    /// List notes, pinned first
    List,

    /// List notes whose title or text contains QUERY
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Show one note
    Show {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },

    /// Change a note's title and/or body
    Edit {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        #[arg(long)]
        title: Option<String>,

        /// Replaces the whole body; same markup as `add`
        #[arg(long)]
        body: Option<String>,
    },

    /// Pin or unpin a note
    Pin {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },

    /// Delete a note and the images only it used
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },
}
