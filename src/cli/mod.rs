//! CLI module - Command-line interface for EthioFB
//!
//! Subcommands drive the same services a request handler would, against
//! Redis or, with `--memory`, an in-process store.

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// EthioFB - football data behind natural-language answers
#[derive(Parser)]
#[command(name = "ethiofb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use an in-process cache instead of Redis
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a league's team catalog and cache names, ids and records
    #[command(alias = "seed")]
    SeedTeams {
        /// League code, e.g. ETH
        #[arg(long, default_value = "ETH")]
        league: String,
        /// Season year (defaults to the configured season)
        #[arg(long)]
        season: Option<i32>,
    },

    /// Look a team up by numeric id
    #[command(alias = "t")]
    Team {
        /// Team id
        id: String,
    },

    /// Show fixtures for a league
    #[command(alias = "f")]
    Fixtures {
        #[arg(long, default_value = "ETH")]
        league: String,
        /// Numeric team id filter
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        season: Option<i32>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show a league table
    #[command(alias = "table")]
    Standings {
        #[arg(long, default_value = "ETH")]
        league: String,
        #[arg(long)]
        season: Option<i32>,
        /// Only read the cache
        #[arg(long)]
        cached: bool,
    },

    /// Show season statistics for a team by name
    Stats {
        #[arg(long, default_value = "ETH")]
        league: String,
        #[arg(long)]
        season: Option<i32>,
        /// Team name as cached by seed-teams
        #[arg(required = true)]
        team: Vec<String>,
    },

    /// Build the answer context for an intent and print it as JSON
    #[command(alias = "d")]
    Dispatch {
        /// fixture, table, news, compare or fact
        topic: String,
        #[arg(long, default_value = "ETH")]
        league: String,
        /// Team name; repeat for comparisons
        #[arg(long = "team")]
        teams: Vec<String>,
        #[arg(long)]
        season: Option<i32>,
        #[arg(long, default_value = "")]
        language: String,
    },

    /// Check the cache store connection
    Ping,
}

pub use commands::*;
