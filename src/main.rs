use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use brand_insights::cli::{self, OutputFormat, ThemeAction, Widget};
use brand_insights::table::TableQuery;

#[derive(Debug, Parser)]
#[command(name = "insights")]
#[command(about = "Campaign performance dashboard with simulated insights")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

/// Filter and sort options shared by `campaigns` and `export`.
#[derive(Debug, Args)]
struct TableArgs {
    /// Case-insensitive text search across every column
    #[arg(long)]
    search: Option<String>,
    /// Keep only campaigns with this status (repeatable)
    #[arg(long = "status")]
    statuses: Vec<String>,
    /// Keep only campaigns on this platform (repeatable)
    #[arg(long = "platform")]
    platforms: Vec<String>,
    /// Start of the start-date window, YYYY-MM-DD (used together with --to)
    #[arg(long)]
    from: Option<String>,
    /// End of the start-date window, YYYY-MM-DD (used together with --from)
    #[arg(long)]
    to: Option<String>,
    /// Column key to sort by (e.g. budget, ctr, start_date)
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending instead of ascending
    #[arg(long)]
    desc: bool,
}

impl TableArgs {
    fn into_query(self, page: Option<usize>) -> TableQuery {
        TableQuery {
            search: self.search,
            statuses: self.statuses,
            platforms: self.platforms,
            from: self.from,
            to: self.to,
            sort: self.sort,
            direction: self.desc.then(|| "desc".to_string()),
            page,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the campaign table
    Campaigns {
        #[command(flatten)]
        filters: TableArgs,
        /// Page number (1-based)
        #[arg(long)]
        page: Option<usize>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Export the filtered campaigns as a CSV file
    Export {
        #[command(flatten)]
        filters: TableArgs,
        /// Directory to write the file into (default: current directory)
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Show the KPI cards after N simulated refreshes
    Metrics {
        /// Number of refresh intervals to simulate
        #[arg(long, default_value = "0")]
        ticks: u32,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the simulated insight widgets
    Insights {
        /// Widget to show (default: all)
        #[arg(value_enum)]
        widget: Option<Widget>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Ask the analytics assistant a question
    Chat {
        /// The question
        #[arg(trailing_var_arg = true, required = true)]
        message: Vec<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show or change the theme preference
    Theme {
        #[arg(value_enum, default_value_t)]
        action: ThemeAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show recent activity-log events
    History {
        /// Number of events to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Start the web dashboard
    Serve {
        /// Listen address (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Check config files, preference store and activity log
    Health,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file to ~/.insights/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `general.page_size 10`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Campaigns {
            filters,
            page,
            format,
        } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_campaigns(&filters.into_query(page), fmt)
        }
        Commands::Export { filters, out } => cli::run_export(&filters.into_query(None), &out),
        Commands::Metrics { ticks, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_metrics(ticks, fmt)
        }
        Commands::Insights { widget, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_insights(widget, fmt)
        }
        Commands::Chat { message, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_chat(&message.join(" "), fmt)
        }
        Commands::Theme { action } => cli::run_theme(action),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
        Commands::History { limit, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_history(limit, fmt)
        }
        Commands::Serve { addr, no_open } => cli::run_serve(addr.as_deref(), no_open),
        Commands::Health => cli::run_health(),
    }
}
