use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub verbose: bool,

    #[clap(long, value_parser, global = true)]
    pub log: Option<PathBuf>,

    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub no_color: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a pattern against text, like the browser playground
    Match {
        pattern: String,

        /// Text to search; read from --file or stdin when omitted
        text: Option<String>,

        #[clap(long, value_parser, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Flags in gimsuy notation, e.g. "gi"
        #[clap(long, value_parser)]
        flags: Option<String>,

        #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Report whether a pattern compiles and passes the safety checks
    Check { pattern: String },
    /// List the built-in lessons
    Lessons,
    /// Check one answer for a tutorial exercise
    Exercise {
        lesson: u32,

        answer: String,

        #[clap(long, value_parser, default_value_t = 1)]
        exercise: u32,

        #[clap(long, value_parser, default_value_t = false)]
        hint: bool,
    },
    /// Work through the lessons interactively
    Tutorial {
        #[clap(long, value_parser)]
        lesson: Option<u32>,
    },
    /// Generate shell completion scripts
    Completions {
        #[clap(value_enum)]
        shell: Shell,
    },
}
