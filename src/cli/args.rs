use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "qiyam",
    version,
    about = "An offline terminal companion for prayer times, tracking and dhikr"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// First-run setup wizard (location, calculation method, madhab)
    Setup {
        /// Reset existing configuration
        #[arg(long)]
        reset: bool,
    },
    /// Show today's prayer times with the current and next prayer
    Times,
    /// Mark a prayer as prayed today
    Mark {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
        /// Unmark instead
        #[arg(long)]
        undo: bool,
    },
    /// Show completion statistics
    Stats {
        /// Include the last 7 days
        #[arg(long)]
        week: bool,
        /// Include the last 30 days
        #[arg(long)]
        month: bool,
    },
    /// Dhikr counter
    Dhikr {
        #[command(subcommand)]
        action: DhikrCommands,
    },
    /// Show the Qibla bearing for the configured location
    Qibla,
    /// Export a weekly text summary to stdout
    Export,
}

#[derive(Subcommand, Debug)]
pub enum DhikrCommands {
    /// List the dhikr presets with today's counts
    List,
    /// Add to a dhikr count
    Count {
        /// Dhikr name or slug (e.g. subhanallah)
        name: String,
        /// How much to add
        #[arg(long, default_value = "1")]
        by: i32,
    },
    /// Reset today's count for a dhikr
    Reset {
        /// Dhikr name or slug
        name: String,
    },
}
