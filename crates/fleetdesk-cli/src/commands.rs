//! Command handlers

use std::future::Future;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use fleetdesk_app::app::resource_service::{
    create_record, delete_record, list_records, parse_record_body, show_record, update_record,
};
use fleetdesk_app::app::{
    idle_vehicles, load_reminders, load_vehicle_reminders, login, logout, whoami,
    ComplianceReminderProvider, IdleVehicleProvider, NotificationCenter,
};
use fleetdesk_app::config::Config;
use fleetdesk_app::export::{export_snapshot, FleetSnapshot};
use fleetdesk_app::repository::{open_read_state_store, open_resource_repo, open_vehicle_repo};
use fleetdesk_domain::model::{ListQuery, Resource};
use fleetdesk_domain::repository::VehicleRepository;
use fleetdesk_types::{OutputFormat, Result};

use crate::cli::{Cli, Commands};
use crate::output::{
    output_idle, output_notifications, output_record, output_records, output_reminders,
    output_session, print_json,
};

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref api_url) = cli.api_url {
        config.api_base_url = api_url.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Login {
            identifier,
            password,
        } => cmd_login(&config, &identifier, password, output_format).await,

        Commands::Logout => cmd_logout(&config),

        Commands::Whoami { verify } => {
            let session = whoami(&config, verify).await?;
            output_session(output_format, &session)
        }

        Commands::Reminders { vehicle } => cmd_reminders(&config, vehicle, output_format).await,

        Commands::Idle { watch } => cmd_idle(&config, watch, output_format).await,

        Commands::Notifications { mark_read, unread } => {
            cmd_notifications(&config, mark_read, unread, output_format).await
        }

        Commands::List {
            resource,
            page,
            page_size,
            search,
            populate,
            sort,
        } => {
            let query = ListQuery::new(page, page_size.unwrap_or(config.list_page_size))
                .with_search(search)
                .with_populate(populate)
                .with_sort(sort);
            cmd_list(&config, resource, &query, output_format).await
        }

        Commands::Show { resource, id } => {
            let repo = open_resource_repo(&config)?;
            let pb = spinner(&format!("Fetching {} {}", resource.label(), id));
            let record = show_record(&repo, resource, &id).await;
            pb.finish_and_clear();
            output_record(output_format, &record?)
        }

        Commands::Create { resource, body } => {
            let body = parse_record_body(&body)?;
            let repo = open_resource_repo(&config)?;
            let created = create_record(&repo, resource, body).await?;
            println!("{} created", resource.label());
            output_record(output_format, &created)
        }

        Commands::Update { resource, id, body } => {
            let body = parse_record_body(&body)?;
            let repo = open_resource_repo(&config)?;
            let updated = update_record(&repo, resource, &id, body).await?;
            println!("{} {} updated", resource.label(), id);
            output_record(output_format, &updated)
        }

        Commands::Delete { resource, id, yes } => cmd_delete(&config, resource, &id, yes).await,

        Commands::Export { output } => cmd_export(&config, output).await,

        Commands::Config {
            show,
            set_api_url,
            set_timeout,
            set_output,
            set_page_size,
            set_idle_alert,
            reset,
        } => cmd_config(
            show,
            set_api_url,
            set_timeout,
            set_output,
            set_page_size,
            set_idle_alert,
            reset,
        ),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn cmd_login(
    config: &Config,
    identifier: &str,
    password: Option<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_line("Password: ")?,
    };
    let pb = spinner("Logging in");
    let session = login(config, identifier, &password).await;
    pb.finish_and_clear();
    let session = session?;

    if output_format == OutputFormat::Json {
        return print_json(&session.user);
    }
    println!("Logged in as {}", session.user.username);
    Ok(())
}

fn cmd_logout(config: &Config) -> Result<()> {
    if logout(config)? {
        println!("Logged out");
    } else {
        println!("No stored session");
    }
    Ok(())
}

async fn cmd_reminders(
    config: &Config,
    vehicle: Option<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let repo = open_vehicle_repo(config)?;
    let today = Local::now().date_naive();

    let pb = spinner("Checking vehicle documents");
    let reminders = match vehicle {
        Some(ref document_id) => load_vehicle_reminders(&repo, document_id, today).await,
        None => Ok(load_reminders(&repo, today).await),
    };
    pb.finish_and_clear();

    output_reminders(output_format, &reminders?, today)
}

async fn cmd_idle(config: &Config, watch: bool, output_format: OutputFormat) -> Result<()> {
    let repo = open_vehicle_repo(config)?;

    if !watch {
        let pb = spinner("Loading idle vehicles");
        let now = Utc::now();
        let vehicles = idle_vehicles(&repo, now).await;
        pb.finish_and_clear();
        return output_idle(output_format, &vehicles?, now);
    }

    let repo = &repo;
    let period = config.idle_refresh_interval();
    run_until(tokio::signal::ctrl_c(), period, || async move {
        let now = Utc::now();
        match idle_vehicles(repo, now).await {
            Ok(vehicles) => {
                if output_format == OutputFormat::Table {
                    print!("\x1B[2J\x1B[H");
                }
                output_idle(output_format, &vehicles, now)?;
                if output_format == OutputFormat::Table {
                    println!(
                        "\nRefreshing every {}s. Ctrl-C to stop.",
                        period.as_secs()
                    );
                }
            }
            Err(e) => warn!(error = %e, "Idle refresh failed"),
        }
        Ok(())
    })
    .await?;
    info!("Idle watch stopped");
    Ok(())
}

/// Call `refresh` on every tick until `stop` resolves.
///
/// `stop` is polled while a refresh is in flight too. A missed or late
/// tick only delays the next render.
async fn run_until<S, F, Fut>(stop: S, period: Duration, mut refresh: F) -> Result<()>
where
    S: Future,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    tokio::pin!(stop);
    let mut interval = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = &mut stop => return Ok(()),
            result = async {
                interval.tick().await;
                refresh().await
            } => result?,
        }
    }
}

async fn cmd_notifications(
    config: &Config,
    mark_read: bool,
    unread_only: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let repo: Arc<dyn VehicleRepository> = Arc::new(open_vehicle_repo(config)?);
    let mut read_state = open_read_state_store(config)?;

    let center = NotificationCenter::new()
        .with_provider(Box::new(ComplianceReminderProvider::new(
            repo.clone(),
            Local::now().date_naive(),
        )))
        .with_provider(Box::new(IdleVehicleProvider::new(
            repo,
            Utc::now(),
            config.idle_alert_hours,
        )));

    let pb = spinner("Collecting notifications");
    let notifications = if mark_read {
        center.mark_all_read(&mut read_state).await
    } else {
        Ok(center.fetch_all(&read_state).await)
    };
    pb.finish_and_clear();
    let mut notifications = notifications?;

    if unread_only {
        notifications.retain(|n| !n.read);
    }

    output_notifications(output_format, &notifications)
}

async fn cmd_list(
    config: &Config,
    resource: Resource,
    query: &ListQuery,
    output_format: OutputFormat,
) -> Result<()> {
    let repo = open_resource_repo(config)?;
    let pb = spinner(&format!("Loading {}", resource));
    let page = list_records(&repo, resource, query).await;
    pb.finish_and_clear();
    output_records(output_format, resource, &page?)
}

async fn cmd_delete(config: &Config, resource: Resource, id: &str, yes: bool) -> Result<()> {
    let repo = open_resource_repo(config)?;
    if !yes {
        let answer = prompt_line(&format!("Delete {} {}? [y/N] ", resource.label(), id))?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Cancelled");
            return Ok(());
        }
    }
    delete_record(&repo, resource, id).await?;
    println!("{} {} deleted", resource.label(), id);
    Ok(())
}

async fn cmd_export(config: &Config, output: PathBuf) -> Result<()> {
    let repo = open_vehicle_repo(config)?;
    let now = Utc::now();
    let today = Local::now().date_naive();

    let pb = spinner("Collecting fleet status");
    let reminders = load_reminders(&repo, today).await;
    let idle = idle_vehicles(&repo, now).await;
    pb.finish_and_clear();

    let snapshot = FleetSnapshot {
        generated_at: now,
        today,
        reminders,
        idle: idle?,
    };
    let written = export_snapshot(&snapshot, &output)?;
    for path in written {
        println!("Exported to: {}", path.display());
    }
    Ok(())
}

fn cmd_config(
    show: bool,
    set_api_url: Option<String>,
    set_timeout: Option<u64>,
    set_output: Option<OutputFormat>,
    set_page_size: Option<u32>,
    set_idle_alert: Option<f64>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(api_url) = set_api_url {
        config.api_base_url = api_url.trim().trim_end_matches('/').to_string();
        modified = true;
    }

    if let Some(timeout) = set_timeout {
        config.request_timeout_secs = timeout;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(page_size) = set_page_size {
        config.list_page_size = page_size;
        modified = true;
    }

    if let Some(hours) = set_idle_alert {
        config.idle_alert_hours = hours;
        modified = true;
    }

    if modified {
        config.validate()?;
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
