use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hq")]
#[command(about = "A handy command-line client for the HouQin operations backend.")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Don't use cached results
    #[arg(short = 'n', long)]
    pub nocache: bool,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look up an asset by scanned or typed code (interactive without CODE)
    Scan {
        /// Code to look up
        code: Option<String>,
    },
    /// Show a kitchen's food supplies and recipes
    Kitchen {
        /// Kitchen id
        id: String,
        /// Bypass the cache and refetch
        #[arg(short, long)]
        refresh: bool,
    },
    /// Show the financial dashboard
    Dashboard {
        /// Bypass the cache and refetch
        #[arg(short, long)]
        refresh: bool,
    },
    /// Show expiring and low-stock supplies
    Notices {
        /// Bypass the cache and refetch
        #[arg(short, long)]
        refresh: bool,
    },
    /// Relocate an asset
    Move {
        /// Asset id or code
        asset: String,
        #[arg(long)]
        floor: Option<String>,
        #[arg(long)]
        room: Option<String>,
    },
    /// Update an asset's status (in_use/in_storage/under_repair/disposed)
    SetStatus {
        /// Asset id or code
        asset: String,
        status: String,
    },
    /// Mark an asset disposed
    Dispose {
        /// Asset id or code
        asset: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Record a restock (and dispose the expired remainder)
    Refill {
        /// Kitchen id
        kitchen: String,
        /// Supply id
        supply: String,
        #[arg(long)]
        quantity: f64,
        /// Expired quantity disposed along with the restock
        #[arg(long)]
        expired: Option<f64>,
    },
    /// Show disposal history
    Waste {
        #[arg(long)]
        kitchen: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Vehicle trip lifecycle
    Trip {
        #[command(subcommand)]
        action: TripAction,
    },
}

#[derive(Subcommand)]
pub enum TripAction {
    /// Begin a trip
    Start { vehicle: String },
    /// End the active trip
    End { vehicle: String },
    /// Show the active trip
    Status { vehicle: String },
    /// Record the trip endpoint coordinates
    Endpoint {
        vehicle: String,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },
}
