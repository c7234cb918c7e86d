// Main entry point
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

use hq::application;
use hq::application::scan::{ScanOutcome, ScanSession};
use hq::domain::model::{
    Asset, AssetStatus, DashboardSnapshot, Disposal, FetchSource, KitchenBundle, Notices, Trip,
};
use hq::domain::traits::AssetLookup;
use hq::infrastructure::cache::request::Cached;
use hq::infrastructure::config::{self, load_config, Config};
use hq::interfaces::cli::{Cli, Command, TripAction};
use hq::presentation::theme::Theme;
use hq::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Spawn signal handler task
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            eprintln!("\n收到中断信号，正在优雅关闭...");
            let _ = shutdown_tx.send(());
        }
    });

    let mut cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    // Handle maintenance flags
    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            let config_path_clone = config_path.clone();
            // Run editor in blocking task
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor)
                    .arg(&config_path_clone)
                    .status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }

    // Initialize AppState
    let state = AppState::new(config.clone())?;

    if cli.status {
        print_status(&state).await?;
        return Ok(());
    }

    let Some(command) = cli.command.take() else {
        eprintln!("{}", "Please provide a command (try --help)".red());
        std::process::exit(1);
    };

    // Load theme
    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);

    // Clear screen if configured
    if config.clear_screen {
        clear_screen();
    }

    // Run the command, racing shutdown
    tokio::select! {
        result = run_command(&state, command, &cli, &config, &theme) => {
            result?;
        }
        _ = shutdown_rx => {
            eprintln!("操作被中断");
        }
    }

    Ok(())
}

async fn run_command(
    state: &AppState,
    command: Command,
    cli: &Cli,
    config: &Config,
    theme: &Theme,
) -> anyhow::Result<()> {
    match command {
        Command::Dashboard { refresh } => {
            let snapshot =
                application::dashboard::load_dashboard(state, refresh || cli.nocache).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&*snapshot.value)?);
            } else {
                print!(
                    "{}",
                    format_dashboard(&snapshot, theme, config.enable_emoji)
                );
            }
        }
        Command::Kitchen { id, refresh } => {
            let bundle =
                application::kitchen::load_kitchen(state, &id, refresh || cli.nocache).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&*bundle.value)?);
            } else {
                let output = format_kitchen(&bundle, theme, config.enable_emoji);
                if config.paging {
                    print_with_pager(&output, &config.pager_command)?;
                } else {
                    print!("{}", output);
                }
            }
        }
        Command::Notices { refresh } => {
            let notices =
                application::notifications::load_notices(state, refresh || cli.nocache).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&*notices.value)?);
            } else {
                print!("{}", format_notices(&notices, theme, config.enable_emoji));
            }
        }
        Command::Scan { code } => match code {
            Some(code) => {
                if config.scan_alert {
                    check_scan_rate_alert();
                }
                let lookup: Arc<dyn AssetLookup> = state.api.clone();
                let session = ScanSession::new(
                    lookup,
                    state.scan_cache.clone(),
                    config.cache.scan_debounce(),
                );
                let outcome = session.submit(&code, cli.nocache).await?;
                print_scan_outcome(&outcome, cli, theme, config)?;
            }
            None => interactive_scan(state, cli, config, theme).await?,
        },
        Command::Move { asset, floor, room } => {
            let updated =
                application::assets::move_asset(state, &asset, floor.as_deref(), room.as_deref())
                    .await?;
            print_asset(&updated, cli, theme, config)?;
        }
        Command::SetStatus { asset, status } => {
            let status: AssetStatus = status.parse()?;
            let updated = application::assets::set_status(state, &asset, status).await?;
            print_asset(&updated, cli, theme, config)?;
        }
        Command::Dispose { asset, reason } => {
            let updated =
                application::assets::dispose(state, &asset, reason.as_deref()).await?;
            print_asset(&updated, cli, theme, config)?;
        }
        Command::Refill {
            kitchen,
            supply,
            quantity,
            expired,
        } => {
            let updated =
                application::kitchen::refill_supply(state, &kitchen, &supply, quantity, expired)
                    .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&updated)?);
            } else {
                println!(
                    "{} {} {} {} {}",
                    (theme.ok)("✔ Refilled"),
                    (theme.value)(&updated.name),
                    (theme.label)("to"),
                    (theme.value)(&updated.quantity.to_string()),
                    (theme.muted)(&updated.unit)
                );
            }
        }
        Command::Waste { kitchen, from, to } => {
            let from = parse_date(from.as_deref())?;
            let to = parse_date(to.as_deref())?;
            let disposals =
                application::kitchen::waste_history(state, kitchen.as_deref(), from, to).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&disposals)?);
            } else {
                let output = format_waste(&disposals, theme, config.enable_emoji);
                if config.paging {
                    print_with_pager(&output, &config.pager_command)?;
                } else {
                    print!("{}", output);
                }
            }
        }
        Command::Trip { action } => match action {
            TripAction::Start { vehicle } => {
                let trip = application::trips::start(state, &vehicle).await?;
                print_trip(&trip, cli, theme, config)?;
            }
            TripAction::End { vehicle } => {
                let trip = application::trips::end(state, &vehicle).await?;
                print_trip(&trip, cli, theme, config)?;
            }
            TripAction::Status { vehicle } => {
                match application::trips::active(state, &vehicle).await? {
                    Some(trip) => print_trip(&trip, cli, theme, config)?,
                    None => {
                        if cli.json {
                            println!("null");
                        } else {
                            println!("{}", (theme.muted)("No active trip"));
                        }
                    }
                }
            }
            TripAction::Endpoint { vehicle, lat, lon } => {
                let trip = application::trips::set_endpoint(state, &vehicle, lat, lon).await?;
                print_trip(&trip, cli, theme, config)?;
            }
        },
    }

    Ok(())
}

/// Interactive scan loop: one code per line, `:` commands act on the
/// found asset.
async fn interactive_scan(
    state: &AppState,
    cli: &Cli,
    config: &Config,
    theme: &Theme,
) -> anyhow::Result<()> {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let lookup: Arc<dyn AssetLookup> = state.api.clone();
    let session = ScanSession::new(
        lookup,
        state.scan_cache.clone(),
        config.cache.scan_debounce(),
    );

    println!(
        "{}",
        "Scan mode: enter a code per line. :d details, :m <floor> [room], :s <status>, :x [reason], :q quit."
            .cyan()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim().to_string();

        if input.is_empty() {
            // 空行回到待扫状态
            session.scan_again();
            continue;
        }

        if let Some(cmd) = input.strip_prefix(':') {
            match handle_panel_command(state, &session, cmd, cli, theme, config).await {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => eprintln!("{}", format!("✘ {}", e).red()),
            }
            continue;
        }

        if config.scan_alert {
            check_scan_rate_alert();
        }

        match session.submit(&input, cli.nocache).await {
            Ok(outcome) => print_scan_outcome(&outcome, cli, theme, config)?,
            Err(e) => eprintln!("{}", format!("✘ {}", e).red()),
        }
    }

    Ok(())
}

/// Handle a `:` command inside the scan loop. Returns `true` to quit.
async fn handle_panel_command(
    state: &AppState,
    session: &ScanSession,
    cmd: &str,
    cli: &Cli,
    theme: &Theme,
    config: &Config,
) -> anyhow::Result<bool> {
    let mut parts = cmd.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(false);
    };

    if verb == "q" || verb == "quit" {
        return Ok(true);
    }

    let Some(asset) = session.found_asset() else {
        eprintln!("{}", "No asset on the found panel. Scan first.".yellow());
        return Ok(false);
    };

    match verb {
        "d" => {
            print_asset(&asset, cli, theme, config)?;
        }
        "m" => {
            let floor = parts.next();
            let room = parts.next();
            let updated =
                application::assets::move_asset(state, &asset.id, floor, room).await?;
            session.absorb_update(Arc::clone(&updated));
            print_asset(&updated, cli, theme, config)?;
        }
        "s" => {
            let Some(status) = parts.next() else {
                eprintln!("{}", "Usage: :s <status>".yellow());
                return Ok(false);
            };
            let status: AssetStatus = status.parse()?;
            let updated = application::assets::set_status(state, &asset.id, status).await?;
            session.absorb_update(Arc::clone(&updated));
            print_asset(&updated, cli, theme, config)?;
        }
        "x" => {
            let reason = cmd.strip_prefix('x').map(str::trim).filter(|r| !r.is_empty());
            let updated = application::assets::dispose(state, &asset.id, reason).await?;
            session.absorb_update(Arc::clone(&updated));
            print_asset(&updated, cli, theme, config)?;
        }
        other => {
            eprintln!("{}", format!("Unknown command: :{}", other).yellow());
        }
    }

    Ok(false)
}

fn prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("> ");
    std::io::stdout().flush()
}

fn print_scan_outcome(
    outcome: &ScanOutcome,
    cli: &Cli,
    theme: &Theme,
    config: &Config,
) -> anyhow::Result<()> {
    match outcome {
        ScanOutcome::Found(asset) => print_asset(asset, cli, theme, config)?,
        ScanOutcome::NotFound => {
            if cli.json {
                println!("{}", serde_json::json!({ "found": false }));
            } else {
                let marker = if config.enable_emoji { "🔍" } else { "?" };
                println!("{} {}", marker, (theme.warn)("No matching asset"));
            }
        }
        ScanOutcome::Superseded => {}
        ScanOutcome::Debounced => {}
    }
    Ok(())
}

fn print_asset(asset: &Asset, cli: &Cli, theme: &Theme, config: &Config) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(asset)?);
    } else {
        print!("{}", format_asset(asset, theme, config.enable_emoji));
    }
    Ok(())
}

fn print_trip(trip: &Trip, cli: &Cli, theme: &Theme, config: &Config) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(trip)?);
    } else {
        print!("{}", format_trip(trip, theme, config.enable_emoji));
    }
    Ok(())
}

/// Source indicator for cached vs online data
fn source_badge(source: FetchSource, enable_emoji: bool) -> String {
    let badge = match source {
        FetchSource::LocalCache => {
            if enable_emoji {
                "💾 [缓存]"
            } else {
                "[缓存]"
            }
        }
        FetchSource::InFlight | FetchSource::Network => {
            if enable_emoji {
                "🌐 [在线]"
            } else {
                "[在线]"
            }
        }
    };
    badge.cyan().to_string()
}

fn format_dashboard(
    snapshot: &Cached<Arc<DashboardSnapshot>>,
    theme: &Theme,
    enable_emoji: bool,
) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let stats = &snapshot.value.stats;

    writeln!(
        output,
        "{} {}",
        (theme.title)("Dashboard"),
        source_badge(snapshot.source, enable_emoji)
    )
    .ok();

    let cutoff = "⸺".repeat(40);
    writeln!(output, "  {}", (theme.line)(&cutoff)).ok();

    writeln!(
        output,
        "  {} {}",
        (theme.label)("Assets:"),
        (theme.value)(&stats.asset_count.to_string())
    )
    .ok();
    let repair = stats.assets_under_repair.to_string();
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Under repair:"),
        if stats.assets_under_repair > 0 {
            (theme.warn)(&repair)
        } else {
            (theme.value)(&repair)
        }
    )
    .ok();
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Kitchens:"),
        (theme.value)(&stats.kitchen_count.to_string())
    )
    .ok();
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Active trips:"),
        (theme.value)(&stats.active_trips.to_string())
    )
    .ok();
    let low = stats.low_stock_count.to_string();
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Low stock:"),
        if stats.low_stock_count > 0 {
            (theme.warn)(&low)
        } else {
            (theme.value)(&low)
        }
    )
    .ok();
    let expiring = stats.expiring_soon_count.to_string();
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Expiring soon:"),
        if stats.expiring_soon_count > 0 {
            (theme.warn)(&expiring)
        } else {
            (theme.value)(&expiring)
        }
    )
    .ok();
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Total spent:"),
        (theme.ok)(&format!("{:.2}", snapshot.value.total_spent))
    )
    .ok();
    writeln!(
        output,
        "  {}",
        (theme.muted)(&format!(
            "As of {}",
            snapshot.value.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
    )
    .ok();

    output
}

fn format_kitchen(
    bundle: &Cached<Arc<KitchenBundle>>,
    theme: &Theme,
    enable_emoji: bool,
) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let kitchen = &bundle.value;
    let today = chrono::Utc::now().date_naive();

    writeln!(
        output,
        "{} {}",
        (theme.title)(&format!("Kitchen {}", kitchen.kitchen_id)),
        source_badge(bundle.source, enable_emoji)
    )
    .ok();

    let cutoff = "⸺".repeat(40);
    writeln!(output, "  {}", (theme.line)(&cutoff)).ok();

    writeln!(output, "  {}", (theme.label)("Food supplies")).ok();
    if kitchen.food_supplies.is_empty() {
        writeln!(output, "    {}", (theme.muted)("(empty)")).ok();
    }
    for (i, supply) in kitchen.food_supplies.iter().enumerate() {
        let mut line = format!(
            "    {}. {} {} {}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.value)(&supply.name),
            supply.quantity,
            (theme.muted)(&supply.unit)
        );
        if supply.is_low_stock() {
            let marker = if enable_emoji { "📉 [低库存]" } else { "[低库存]" };
            line.push_str(&format!(" {}", (theme.warn)(marker)));
        }
        if let Some(expiry) = supply.expiry_date {
            if expiry < today {
                let marker = if enable_emoji { "🗑 [过期]" } else { "[过期]" };
                line.push_str(&format!(" {}", (theme.bad)(marker)));
            } else if supply.expires_within(3, today) {
                let marker = if enable_emoji { "⏳ [临期]" } else { "[临期]" };
                line.push_str(&format!(" {}", (theme.warn)(marker)));
            }
        }
        writeln!(output, "{}", line).ok();
    }

    writeln!(output).ok();
    writeln!(output, "  {}", (theme.label)("Recipes")).ok();
    if kitchen.recipes.is_empty() {
        writeln!(output, "    {}", (theme.muted)("(empty)")).ok();
    }
    for (i, recipe) in kitchen.recipes.iter().enumerate() {
        let servings = recipe
            .servings
            .map(|s| format!(" ({} servings)", s))
            .unwrap_or_default();
        writeln!(
            output,
            "    {}. {}{}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.value)(&recipe.name),
            (theme.muted)(&servings)
        )
        .ok();
    }

    writeln!(
        output,
        "  {}",
        (theme.muted)(&format!(
            "As of {}",
            kitchen.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
    )
    .ok();

    output
}

fn format_notices(notices: &Cached<Arc<Notices>>, theme: &Theme, enable_emoji: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(
        output,
        "{} {}",
        (theme.title)("Notices"),
        source_badge(notices.source, enable_emoji)
    )
    .ok();

    let cutoff = "⸺".repeat(40);
    writeln!(output, "  {}", (theme.line)(&cutoff)).ok();

    writeln!(output, "  {}", (theme.label)("Expiring soon")).ok();
    if notices.value.expiring.is_empty() {
        writeln!(output, "    {}", (theme.muted)("(none)")).ok();
    }
    for (i, supply) in notices.value.expiring.iter().enumerate() {
        let expiry = supply
            .expiry_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "?".to_string());
        writeln!(
            output,
            "    {}. {} {}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.value)(&supply.name),
            (theme.warn)(&expiry)
        )
        .ok();
    }

    writeln!(output).ok();
    writeln!(output, "  {}", (theme.label)("Low stock")).ok();
    if notices.value.low_stock.is_empty() {
        writeln!(output, "    {}", (theme.muted)("(none)")).ok();
    }
    for (i, supply) in notices.value.low_stock.iter().enumerate() {
        writeln!(
            output,
            "    {}. {} {} {}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.value)(&supply.name),
            (theme.warn)(&supply.quantity.to_string()),
            (theme.muted)(&supply.unit)
        )
        .ok();
    }

    output
}

fn format_asset(asset: &Asset, theme: &Theme, enable_emoji: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let marker = if enable_emoji { "📦 " } else { "" };
    writeln!(output, "{}{}", marker, (theme.title)(&asset.name)).ok();

    writeln!(
        output,
        "  {} {}",
        (theme.label)("Id:"),
        (theme.value)(&asset.id)
    )
    .ok();
    if let Some(code) = &asset.code {
        writeln!(output, "  {} {}", (theme.label)("Code:"), (theme.value)(code)).ok();
    }
    if let Some(category) = &asset.category {
        writeln!(
            output,
            "  {} {}",
            (theme.label)("Category:"),
            (theme.value)(category)
        )
        .ok();
    }

    let paint = match asset.status {
        AssetStatus::InUse => theme.ok,
        AssetStatus::InStorage => theme.muted,
        AssetStatus::UnderRepair => theme.warn,
        AssetStatus::Disposed => theme.bad,
    };
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Status:"),
        paint(asset.status.label())
    )
    .ok();

    if asset.floor.is_some() || asset.room.is_some() {
        let location = format!(
            "{} / {}",
            asset.floor.as_deref().unwrap_or("?"),
            asset.room.as_deref().unwrap_or("?")
        );
        writeln!(
            output,
            "  {} {}",
            (theme.label)("Location:"),
            (theme.value)(&location)
        )
        .ok();
    }
    if let Some(cost) = asset.purchase_cost {
        writeln!(
            output,
            "  {} {}",
            (theme.label)("Cost:"),
            (theme.value)(&format!("{:.2}", cost))
        )
        .ok();
    }
    if let Some(updated_at) = asset.updated_at {
        writeln!(
            output,
            "  {}",
            (theme.muted)(&format!(
                "Updated {}",
                updated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ))
        )
        .ok();
    }

    output
}

fn format_waste(disposals: &[Disposal], theme: &Theme, enable_emoji: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let marker = if enable_emoji { "🗑 " } else { "" };
    writeln!(output, "{}{}", marker, (theme.title)("Waste history")).ok();

    let cutoff = "⸺".repeat(40);
    writeln!(output, "  {}", (theme.line)(&cutoff)).ok();

    if disposals.is_empty() {
        writeln!(output, "  {}", (theme.muted)("(no disposals)")).ok();
        return output;
    }

    let mut total_cost = 0.0;
    for (i, disposal) in disposals.iter().enumerate() {
        let mut line = format!(
            "  {}. {} {} {} {}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.muted)(&disposal.disposed_at.format("%Y-%m-%d").to_string()),
            (theme.value)(&disposal.supply_name),
            disposal.quantity,
            (theme.muted)(&disposal.unit)
        );
        if let Some(reason) = &disposal.reason {
            line.push_str(&format!(" {}", (theme.muted)(&format!("({})", reason))));
        }
        if let Some(cost) = disposal.cost {
            total_cost += cost;
            line.push_str(&format!(" {}", (theme.warn)(&format!("{:.2}", cost))));
        }
        writeln!(output, "{}", line).ok();
    }

    writeln!(
        output,
        "  {} {}",
        (theme.label)("Total cost:"),
        (theme.warn)(&format!("{:.2}", total_cost))
    )
    .ok();

    output
}

fn format_trip(trip: &Trip, theme: &Theme, enable_emoji: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let marker = if enable_emoji { "🚚 " } else { "" };
    writeln!(
        output,
        "{}{}",
        marker,
        (theme.title)(&format!("Trip {}", trip.id))
    )
    .ok();

    writeln!(
        output,
        "  {} {}",
        (theme.label)("Vehicle:"),
        (theme.value)(&trip.vehicle_id)
    )
    .ok();
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Started:"),
        (theme.value)(&trip.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    )
    .ok();
    match trip.ended_at {
        Some(ended_at) => {
            writeln!(
                output,
                "  {} {}",
                (theme.label)("Ended:"),
                (theme.value)(&ended_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            )
            .ok();
        }
        None => {
            writeln!(output, "  {} {}", (theme.label)("Ended:"), (theme.ok)("in progress")).ok();
        }
    }
    if let Some(point) = trip.end_point {
        writeln!(
            output,
            "  {} {}",
            (theme.label)("Endpoint:"),
            (theme.value)(&format!("{:.5}, {:.5}", point.lat, point.lon))
        )
        .ok();
    }
    if let Some(distance) = trip.distance_km {
        writeln!(
            output,
            "  {} {}",
            (theme.label)("Distance:"),
            (theme.value)(&format!("{:.1} km", distance))
        )
        .ok();
    }

    output
}

/// Clear the terminal screen
fn clear_screen() {
    // ANSI escape sequence: clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
    std::io::Write::flush(&mut std::io::stdout()).ok();
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &hq::infrastructure::config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

/// Check scan frequency and alert if too high
fn check_scan_rate_alert() {
    use once_cell::sync::Lazy;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    static SCAN_HISTORY: Lazy<Mutex<VecDeque<Instant>>> =
        Lazy::new(|| Mutex::new(VecDeque::new()));

    let now = Instant::now();
    let mut history = SCAN_HISTORY.lock().unwrap();

    // Remove scans older than 1 minute
    history.retain(|&time| now.duration_since(time) < Duration::from_secs(60));

    // Check if frequency is too high (more than 30 scans per minute)
    if history.len() >= 30 {
        eprintln!("{}", "⚠️  扫描频率过高，请稍后再试".yellow());
        return;
    }

    // Add current scan to history
    history.push_back(now);
}

fn parse_date(arg: Option<&str>) -> anyhow::Result<Option<chrono::NaiveDate>> {
    match arg {
        Some(s) => {
            let date = chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("Invalid date '{}': {}", s, e))?;
            Ok(Some(date))
        }
        None => Ok(None),
    }
}

/// Print output with pager if configured
fn print_with_pager(output: &str, pager_command: &str) -> anyhow::Result<()> {
    use std::process::{Command, Stdio};

    // Parse pager command (e.g., "less -RF" -> ["less", "-RF"])
    let parts: Vec<&str> = pager_command.split_whitespace().collect();
    if parts.is_empty() {
        // Fallback to direct print if no command specified
        print!("{}", output);
        return Ok(());
    }

    let mut cmd = Command::new(parts[0]);
    if parts.len() > 1 {
        cmd.args(&parts[1..]);
    }

    // Set up stdin to receive output
    let mut child = match cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            // If pager command not found, fallback to direct print
            eprintln!(
                "Warning: Pager '{}' not found: {}. Printing directly.",
                parts[0], e
            );
            print!("{}", output);
            return Ok(());
        }
    };

    // Write output to pager's stdin
    if let Some(mut stdin) = child.stdin.take() {
        use std::io::Write;
        stdin.write_all(output.as_bytes())?;
        stdin.flush()?;
    }

    // Wait for pager to finish
    child.wait()?;

    Ok(())
}

async fn print_status(state: &AppState) -> anyhow::Result<()> {
    println!("{}", "hq Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Config status
    let config = state.config.read().await;
    println!(
        "Config: {}",
        hq::infrastructure::config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );
    println!("Theme: {}", config.theme);
    drop(config);

    // API status
    println!("API: {}", state.api.base_url());
    if state.api.has_token() {
        println!("API Token: Configured");
    } else {
        println!("API Token: Not configured");
    }

    // Cache status
    println!("Dashboard Cache: {} entries", state.dashboard.len());
    println!("Notice Cache: {} entries", state.notices.len());
    println!("Kitchen Cache: {} entries", state.kitchens.len());
    println!("Scan Cache: {} entries", state.scan_cache.len());

    Ok(())
}
