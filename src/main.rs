use analytics::Summary;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use configuration::{load_config, ConfigArgs};
use engine::{AssetList, Page, PriceRefreshReport, RefreshStatus};
use rust_decimal::Decimal;

/// The main entry point for the portfolio tracker.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(cli.config_args.config.as_deref())?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => web_server::run_server(&config).await?,
        Commands::Refresh(args) => {
            let state = web_server::build_state(&config).await?;
            let report = match args.ids {
                Some(ids) => state.service.refresh_prices(&ids).await,
                None => state.service.refresh_all().await?,
            };
            print_refresh_report(&report);
        }
        Commands::Summary => {
            let state = web_server::build_state(&config).await?;
            let listing = state
                .service
                .list_assets(Page {
                    skip: 0,
                    limit: u32::MAX,
                })
                .await?;
            print_summary(&listing);
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Tracks a portfolio of holdings, their prices and performance.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config_args: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API server.
    Serve,
    /// Fetch the latest close for holdings and revalue them.
    Refresh(RefreshArgs),
    /// Print every holding and the portfolio totals.
    Summary,
}

#[derive(Parser)]
struct RefreshArgs {
    /// Asset ids to refresh (e.g., "1,2,5"). Refreshes every asset when omitted.
    #[arg(long, value_delimiter = ',')]
    ids: Option<Vec<i64>>,
}

// ==============================================================================
// Output
// ==============================================================================

fn print_refresh_report(report: &PriceRefreshReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Ticker", "Status", "Price", "Message"]);

    for outcome in &report.results {
        table.add_row(vec![
            Cell::new(outcome.asset_id),
            Cell::new(outcome.ticker.as_deref().unwrap_or("-")),
            Cell::new(status_label(outcome.status)),
            money_cell(outcome.price),
            Cell::new(outcome.message.as_deref().unwrap_or("")),
        ]);
    }

    println!("{table}");
    println!(
        "{} of {} assets updated at {}",
        report.count(RefreshStatus::Updated),
        report.results.len(),
        report.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

fn print_summary(listing: &AssetList) {
    let mut holdings = Table::new();
    holdings.load_preset(UTF8_FULL).set_header(vec![
        "ID", "Name", "Ticker", "Type", "Quantity", "Price", "Value", "Perf %",
    ]);
    for asset in &listing.assets {
        holdings.add_row(vec![
            Cell::new(asset.id),
            Cell::new(&asset.name),
            Cell::new(&asset.ticker),
            Cell::new(&asset.asset_type),
            money_cell(Some(asset.quantity)),
            money_cell(Some(asset.current_price)),
            money_cell(Some(asset.current_value)),
            money_cell(Some(asset.performance)),
        ]);
    }
    println!("{holdings}");
    print_totals(&listing.summary);
}

fn print_totals(summary: &Summary) {
    let mut totals = Table::new();
    totals.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    totals.add_row(vec![Cell::new("Total value"), money_cell(Some(summary.total_value))]);
    totals.add_row(vec![Cell::new("Total cost"), money_cell(Some(summary.total_cost))]);
    totals.add_row(vec![Cell::new("Gain / loss"), money_cell(Some(summary.total_gain_loss))]);
    totals.add_row(vec![
        Cell::new("Performance %"),
        money_cell(Some(summary.total_performance)),
    ]);
    for entry in &summary.asset_allocation {
        totals.add_row(vec![
            Cell::new(format!("Allocation: {}", entry.asset_type)),
            money_cell(Some(entry.value)),
        ]);
    }
    println!("{totals}");
}

fn status_label(status: RefreshStatus) -> &'static str {
    match status {
        RefreshStatus::Updated => "updated",
        RefreshStatus::NotFound => "not found",
        RefreshStatus::NoData => "no data",
        RefreshStatus::Failed => "failed",
    }
}

fn money_cell(value: Option<Decimal>) -> Cell {
    let text = value.map_or_else(|| "-".to_string(), |v| v.round_dp(2).normalize().to_string());
    Cell::new(text).set_alignment(CellAlignment::Right)
}
