use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use soil_erp::{
    group_by_project, load_config_with_fallback, load_contracts_csv, load_receivables_csv,
    parse_sort_key, sort_rows, summarize_project, AgingEngine, Config, PortfolioTotals,
    ProjectColumn, ReceivableColumn, SortDirection, SortState,
};

const USAGE: &str = "\
Usage: soil-erp [--config PATH] <command> [options]

Commands:
  aging    [--as-of YYYY-MM-DD] [--sort COLUMN] [--dir asc|desc] [--json]
  stats    [--as-of YYYY-MM-DD]
  projects [--sort COLUMN] [--dir asc|desc] [--json]
  project  <PROJECT_KEY>";

/// Options shared by every command
struct CliArgs {
    config_path: Option<PathBuf>,
    command: String,
    positional: Vec<String>,
    as_of: Option<NaiveDate>,
    sort: Option<String>,
    direction: SortDirection,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs {
        config_path: None,
        command: String::new(),
        positional: Vec::new(),
        as_of: None,
        sort: None,
        direction: SortDirection::Ascending,
        json: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().context("--config needs a path")?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--as-of" => {
                let value = iter.next().context("--as-of needs a date")?;
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --as-of date: {}", value))?;
                parsed.as_of = Some(date);
            }
            "--sort" => {
                parsed.sort = Some(iter.next().context("--sort needs a column")?.clone());
            }
            "--dir" => {
                let value = iter.next().context("--dir needs asc or desc")?;
                parsed.direction = parse_sort_key(value)
                    .with_context(|| format!("Invalid --dir: {}", value))?;
            }
            "--json" => parsed.json = true,
            other if parsed.command.is_empty() => parsed.command = other.to_string(),
            other => parsed.positional.push(other.to_string()),
        }
    }

    Ok(parsed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "soil_erp=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;
    let config = load_config_with_fallback(cli.config_path.as_deref())?;

    match cli.command.as_str() {
        "aging" => run_aging(&config, &cli),
        "stats" => run_stats(&config, &cli),
        "projects" => run_projects(&config, &cli),
        "project" => run_project(&config, &cli),
        "" | "help" | "--help" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}

fn engine_for(config: &Config, cli: &CliArgs) -> AgingEngine {
    AgingEngine::as_of(cli.as_of.unwrap_or_else(|| config.reference_date_or_today()))
}

fn run_aging(config: &Config, cli: &CliArgs) -> Result<()> {
    let engine = engine_for(config, cli);
    let records = load_receivables_csv(&config.receivables_path)?;
    let mut rows = engine.classify_all(&records);

    let state = match &cli.sort {
        Some(name) => SortState::by(
            parse_sort_key::<ReceivableColumn>(name)
                .with_context(|| format!("Unknown receivable column: {}", name))?,
            cli.direction,
        ),
        None => SortState::by(ReceivableColumn::OverdueDays, SortDirection::Descending),
    };
    sort_rows(&mut rows, &state);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("📅 Receivable aging as of {}", engine.reference_date());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{:<20} {:>14} {:>14} {:>12} {:>6} {:<6} {:<8}",
        "client", "total", "remaining", "due", "days", "level", "status"
    );

    for row in &rows {
        println!(
            "{:<20} {:>14} {:>14} {:>12} {:>6} {:<6} {:<8}",
            row.record.client_name,
            row.record.total_amount,
            row.remaining_amount,
            row.record.due_date.to_string(),
            row.overdue_days,
            row.overdue_level.label(),
            row.payment_status.label()
        );
    }

    println!("\n✓ {} receivables classified", rows.len());
    Ok(())
}

fn run_stats(config: &Config, cli: &CliArgs) -> Result<()> {
    let engine = engine_for(config, cli);
    let records = load_receivables_csv(&config.receivables_path)?;
    let stats = engine.stats(&records);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("📊 Receivable statistics as of {}", engine.reference_date());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", stats.summary());

    println!("\nBy overdue level:");
    for (level, count) in &stats.by_overdue_level {
        println!("  {:<6} {}", level.label(), count);
    }

    println!("\nBy client type:");
    for (client_type, count) in &stats.by_client_type {
        println!("  {:<6} {}", client_type.label(), count);
    }

    Ok(())
}

fn run_projects(config: &Config, cli: &CliArgs) -> Result<()> {
    let contracts = load_contracts_csv(&config.contracts_path)?;
    let groups = group_by_project(&contracts);
    let mut summaries: Vec<_> = groups
        .groups
        .values()
        .filter_map(|group| summarize_project(group))
        .collect();

    if let Some(name) = &cli.sort {
        let column = parse_sort_key::<ProjectColumn>(name)
            .with_context(|| format!("Unknown project column: {}", name))?;
        sort_rows(&mut summaries, &SortState::by(column, cli.direction));
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("🏗️  Projects");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{:<12} {:<24} {:>14} {:>8} {:>10}",
        "key", "project", "amount", "progress", "changes"
    );

    for summary in &summaries {
        println!(
            "{:<12} {:<24} {:>14} {:>7}% {:>10}",
            summary.project_key().unwrap_or("-"),
            summary.contract.project_name,
            summary.contract.contract_amount,
            summary.contract.progress_percentage,
            summary.amendment_count()
        );
    }

    let totals = PortfolioTotals::from_groups(&groups);
    println!(
        "\n✓ {} projects, {} contracts ({} change orders), total ₩{}",
        totals.project_count, totals.contract_count, totals.amendment_count, totals.total_contract_amount
    );
    if totals.orphan_count > 0 {
        println!("⚠️  {} contracts without a project key were skipped", totals.orphan_count);
    }

    Ok(())
}

fn run_project(config: &Config, cli: &CliArgs) -> Result<()> {
    let key = cli.positional.first().context("project needs a PROJECT_KEY")?;
    let contracts = load_contracts_csv(&config.contracts_path)?;
    let groups = group_by_project(&contracts);

    let summary = groups
        .get(key.trim())
        .and_then(summarize_project)
        .with_context(|| format!("No project with key {}", key))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
