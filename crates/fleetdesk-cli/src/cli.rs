//! CLI definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fleetdesk_domain::model::Resource;
use fleetdesk_types::OutputFormat;

#[derive(Parser)]
#[command(name = "fleetdesk")]
#[command(version)]
#[command(about = "Fleet management console: reminders, idle vehicles and records")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend root URL override (e.g. http://localhost:1337)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Username or email
        identifier: String,

        /// Password. Read from stdin if not given.
        #[arg(long, short = 'p')]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Confirm the token with the backend
        #[arg(long)]
        verify: bool,
    },

    /// Expired and soon-expiring vehicle documents
    Reminders {
        /// Only this vehicle (document id)
        #[arg(long)]
        vehicle: Option<String>,
    },

    /// Idle vehicles and how long they have been standing
    Idle {
        /// Keep refreshing until Ctrl-C
        #[arg(long, short = 'w')]
        watch: bool,
    },

    /// Notification list (reminders and long-idle vehicles)
    Notifications {
        /// Mark everything listed as read
        #[arg(long)]
        mark_read: bool,

        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// List records of a collection
    List {
        /// Collection (e.g. vehicles, trips, fuel-logs)
        resource: Resource,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Page size. Uses config value if not specified.
        #[arg(long)]
        page_size: Option<u32>,

        /// Case-insensitive search on the collection's main field
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Inline all relations
        #[arg(long)]
        populate: bool,

        /// Sort expression (e.g. "createdAt:desc")
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show one record
    Show {
        resource: Resource,

        /// Record document id
        id: String,
    },

    /// Create a record from a JSON body (inline or @file.json)
    Create { resource: Resource, body: String },

    /// Update a record from a JSON body (inline or @file.json)
    Update {
        resource: Resource,
        id: String,
        body: String,
    },

    /// Delete a record
    Delete {
        resource: Resource,
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export reminders and idle vehicles to .xlsx or .csv
    Export {
        /// Output file path
        #[arg(long, short = 'o', default_value = "fleet-report.xlsx")]
        output: PathBuf,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set backend root URL
        #[arg(long)]
        set_api_url: Option<String>,

        /// Set request timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set listing page size
        #[arg(long)]
        set_page_size: Option<u32>,

        /// Set idle hours that raise a notification
        #[arg(long)]
        set_idle_alert: Option<f64>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
