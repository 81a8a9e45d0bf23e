use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "savings-planner")]
#[command(about = "Plan monthly savings for a goal and track deposits in a hosted store")]
pub struct CliConfig {
    /// Path to TOML configuration file (falls back to PLANNER_* environment variables)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Calculate a savings plan, optionally saving it
    Diagnose(DiagnoseArgs),
    /// List saved plans with their progress
    Plans,
    /// Delete a saved plan and its savings log
    Delete { plan_id: i64 },
    /// Record a deposit (negative for a withdrawal) for a plan
    Deposit {
        plan_id: i64,
        #[arg(allow_hyphen_values = true)]
        amount: Decimal,
        #[arg(long)]
        memo: Option<String>,
    },
    /// Show the savings log of a plan
    History { plan_id: i64 },
    /// Export saved plans to a CSV file
    Export { path: PathBuf },
    /// Resolve a postal code to its prefecture and address
    Lookup { postal_code: String },
    /// List the selectable regions and their cost tiers
    Regions,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DiagnoseArgs {
    /// Monthly take-home income (yen)
    #[arg(long, default_value = "250000")]
    pub income: Decimal,

    /// Monthly rent or mortgage (yen)
    #[arg(long, default_value = "70000")]
    pub rent: Decimal,

    /// Goal amount (yen)
    #[arg(long, default_value = "500000")]
    pub target: Decimal,

    /// Goal name
    #[arg(long, default_value = "海外旅行")]
    pub goal: String,

    /// Target period in months; omit to derive it from the monthly surplus
    #[arg(long)]
    pub months: Option<u32>,

    /// Region (prefecture name or その他)
    #[arg(long)]
    pub region: Option<String>,

    /// Postal code; a successful lookup overrides --region
    #[arg(long)]
    pub postal_code: Option<String>,

    /// Save the plan after the diagnosis
    #[arg(long)]
    pub save: bool,
}
