//! Valuebet CLI - Strategy backtests and ledger analytics from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use valuebet::analytics::live::DEFAULT_STARTING_BANKROLL;
use valuebet::analytics::{bankroll_growth, AnalyticsOptions, AnalyticsReport, LiveAnalyticsAggregator};
use valuebet::backtesting::metrics::{analyze_by_category, analyze_by_odds_band, DimensionAnalysis};
use valuebet::backtesting::SimulationEngine;
use valuebet::core::dates::DateFormat;
use valuebet::core::filter::{RecordFilter, Timeframe, WindowAnchor};
use valuebet::core::kelly::KellySizing;
use valuebet::data::{load_ledger, load_scored_feed, resolve_pending, save_ledger};
use valuebet::models::{BetRecord, BetStatus, ScoredMatchRecord, SimulationParameters, SimulationRequest};

/// Default data locations (relative to project root)
const DEFAULT_FEED: &str = "data/ValueBets_Deployable.csv";
const DEFAULT_LEDGER: &str = "data/user_bets.json";

#[derive(Parser)]
#[command(name = "valuebet")]
#[command(author, version, about = "Value-bet backtesting and analytics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to the scored-match CSV feed [env: VALUEBET_FEED]
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Path to the bet ledger JSON [env: VALUEBET_LEDGER]
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Date layout of the feed (tried in ISO, day-first, month-first order if unset)
    #[arg(long, value_enum)]
    date_format: Option<DateFormatArg>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DateFormatArg {
    Iso,
    DayFirst,
    MonthFirst,
}

impl From<DateFormatArg> for DateFormat {
    fn from(arg: DateFormatArg) -> Self {
        match arg {
            DateFormatArg::Iso => DateFormat::Iso,
            DateFormatArg::DayFirst => DateFormat::DayFirst,
            DateFormatArg::MonthFirst => DateFormat::MonthFirst,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StakeType {
    Fixed,
    Percentage,
    Kelly,
}

impl StakeType {
    fn as_str(self) -> &'static str {
        match self {
            StakeType::Fixed => "fixed",
            StakeType::Percentage => "percentage",
            StakeType::Kelly => "kelly",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest a staking strategy over the scored feed
    Simulate {
        /// Read the simulation request from a JSON file instead of flags
        #[arg(long)]
        request: Option<PathBuf>,

        /// Starting bankroll
        #[arg(long, default_value = "1000")]
        bankroll: f64,

        /// Staking policy
        #[arg(long, value_enum, default_value = "fixed")]
        stake_type: StakeType,

        /// Stake per bet for fixed staking
        #[arg(long, default_value = "50")]
        stake: f64,

        /// Percentage of bankroll per bet for percentage staking
        #[arg(long, default_value = "5")]
        percent: f64,

        /// Kelly fraction (0-1, or 1-100 as a percentage)
        #[arg(long, default_value = "0.5")]
        kelly_fraction: f64,

        /// Minimum expected value
        #[arg(long, default_value = "0.02")]
        ev_threshold: f64,

        /// Minimum decimal odds
        #[arg(long, default_value = "1.5")]
        min_odds: f64,

        /// Maximum decimal odds
        #[arg(long, default_value = "5.0")]
        max_odds: f64,

        /// Look-back window: all, 1month, 3months, 6months, 1year
        #[arg(long, default_value = "3months")]
        timeframe: String,

        /// Restrict to these sports (comma separated)
        #[arg(long, value_delimiter = ',')]
        sports: Vec<String>,
    },

    /// Performance report over the bet ledger
    Analyze {
        /// Restrict to one user
        #[arg(long)]
        user_id: Option<String>,

        /// Look-back window: all, week, month, quarter, year
        #[arg(long, default_value = "all")]
        timeframe: String,

        /// Only count bets flagged as value bets
        #[arg(long)]
        value_bets_only: bool,

        /// Restrict to these categories (comma separated)
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
    },

    /// Bankroll growth over the settled ledger
    Growth {
        /// Restrict to one user
        #[arg(long)]
        user_id: Option<String>,

        /// Bankroll before the first bet
        #[arg(long, default_value_t = DEFAULT_STARTING_BANKROLL)]
        starting_bankroll: f64,
    },

    /// Upcoming value bets in the feed with Kelly sizing
    ValueBets {
        /// Minimum expected value
        #[arg(long, default_value = "0.0")]
        min_ev: f64,

        /// Bankroll used for stake suggestions
        #[arg(long, default_value = "1000")]
        bankroll: f64,

        /// Kelly multiplier (0.25 = quarter Kelly)
        #[arg(long, default_value = "0.25")]
        kelly: f64,

        /// Number of bets to show
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// One-unit results of past value bets in the feed
    History {
        /// Look-back window, anchored at the latest match
        #[arg(long, default_value = "all")]
        timeframe: String,

        /// Number of most recent bets to show
        #[arg(long, default_value = "20")]
        last: usize,
    },

    /// Settle pending ledger bets against results in the feed
    Resolve {
        /// Report what would be settled without writing the ledger
        #[arg(long)]
        dry_run: bool,
    },
}

/// Resolved data locations
struct Paths {
    feed: PathBuf,
    ledger: PathBuf,
    date_hint: Option<DateFormat>,
}

fn resolve_path(flag: Option<PathBuf>, env_key: &str, default: &str) -> PathBuf {
    flag.or_else(|| std::env::var_os(env_key).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    let paths = Paths {
        feed: resolve_path(cli.feed, "VALUEBET_FEED", DEFAULT_FEED),
        ledger: resolve_path(cli.ledger, "VALUEBET_LEDGER", DEFAULT_LEDGER),
        date_hint: cli.date_format.map(DateFormat::from),
    };

    if !cli.json {
        println!("{}", format!("Valuebet CLI v{}", env!("CARGO_PKG_VERSION")).cyan().bold());
        println!();
    }

    if cli.interactive {
        run_interactive(&paths)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Simulate {
                request,
                bankroll,
                stake_type,
                stake,
                percent,
                kelly_fraction,
                ev_threshold,
                min_odds,
                max_odds,
                timeframe,
                sports,
            } => {
                let request = match request {
                    Some(path) => read_request(&path)?,
                    None => SimulationRequest {
                        bankroll,
                        stake_type: stake_type.as_str().to_string(),
                        fixed_stake: Some(stake),
                        percent: Some(percent),
                        kelly_fraction: Some(kelly_fraction),
                        ev_threshold,
                        min_odds,
                        max_odds,
                        timeframe,
                        sports: if sports.is_empty() { None } else { Some(sports) },
                    },
                };
                run_simulation(&paths, request, cli.json)?;
            }
            Commands::Analyze {
                user_id,
                timeframe,
                value_bets_only,
                categories,
            } => {
                let options = AnalyticsOptions {
                    timeframe: parse_timeframe(&timeframe)?,
                    user_id,
                    value_bets_only,
                    categories: if categories.is_empty() { None } else { Some(categories) },
                };
                run_analytics(&paths, options, cli.json)?;
            }
            Commands::Growth {
                user_id,
                starting_bankroll,
            } => {
                show_growth(&paths, user_id.as_deref(), starting_bankroll, cli.json)?;
            }
            Commands::ValueBets {
                min_ev,
                bankroll,
                kelly,
                top,
            } => {
                list_value_bets(&paths, min_ev, bankroll, kelly, top, cli.json)?;
            }
            Commands::History { timeframe, last } => {
                show_history(&paths, parse_timeframe(&timeframe)?, last, cli.json)?;
            }
            Commands::Resolve { dry_run } => {
                resolve_ledger(&paths, dry_run, cli.json)?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn parse_timeframe(raw: &str) -> Result<Timeframe> {
    raw.parse::<Timeframe>()
        .with_context(|| format!("Invalid timeframe {:?}", raw))
}

fn read_request(path: &Path) -> Result<SimulationRequest> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read request from {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid simulation request in {:?}", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    Ok(pb)
}

fn load_feed(paths: &Paths) -> Result<Vec<ScoredMatchRecord>> {
    load_scored_feed(&paths.feed, paths.date_hint)
        .with_context(|| format!("Failed to load feed from {:?}", paths.feed))
}

fn load_bets(paths: &Paths) -> Result<Vec<BetRecord>> {
    load_ledger(&paths.ledger).with_context(|| format!("Failed to load ledger from {:?}", paths.ledger))
}

fn run_simulation(paths: &Paths, request: SimulationRequest, json: bool) -> Result<()> {
    let params = SimulationParameters::try_from(request).context("Invalid simulation parameters")?;
    let engine = SimulationEngine::new(params)?;

    let pb = spinner("Loading feed and running simulation...")?;
    let records = load_feed(paths)?;
    let result = engine.run(&records);
    pb.finish_and_clear();

    if json {
        return print_json(&result.to_response());
    }

    engine.print_summary(&result);

    let monthly = result.metrics.rounded().monthly_returns;
    if !monthly.is_empty() {
        println!("\n{}", "Monthly Returns:".yellow().bold());
        for (i, ret) in monthly.iter().enumerate() {
            let line = format!("{:>6} {:>+9.2}%", format!("M{}", i + 1), ret);
            println!("{}", if *ret >= 0.0 { line.green() } else { line.red() });
        }
    }

    if !result.bets.is_empty() {
        println!("\n{}", "Analysis by Sport:".yellow().bold());
        print_dimension_table("Sport", &analyze_by_category(&result.bets));

        println!("\n{}", "Analysis by Odds Range:".yellow().bold());
        print_dimension_table("Range", &analyze_by_odds_band(&result.bets));
    }

    Ok(())
}

fn print_dimension_table(label: &str, rows: &[DimensionAnalysis]) {
    println!(
        "{:>12} {:>8} {:>8} {:>10} {:>12} {:>10}",
        label, "Bets", "Wins", "Win Rate", "Profit", "ROI"
    );
    println!("{}", "-".repeat(65));
    for a in rows {
        println!(
            "{:>12} {:>8} {:>8} {:>9.1}% {:>12.2} {:>9.1}%",
            a.key, a.bets, a.wins, a.win_rate, a.profit, a.roi
        );
    }
}

fn run_analytics(paths: &Paths, options: AnalyticsOptions, json: bool) -> Result<()> {
    let bets = load_bets(paths)?;
    let report = LiveAnalyticsAggregator::new(options).analyze_now(&bets);

    if json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &AnalyticsReport) {
    println!("{}", "=".repeat(60));
    println!("PERFORMANCE ({})", report.timeframe);
    println!("{}", "=".repeat(60));
    println!("Settled bets: {} (won {}, lost {})", report.total_bets, report.won_bets, report.lost_bets);
    println!("Pending bets: {}", report.pending_bets);
    println!("Total staked: {:.2}", report.total_staked);

    let pl = format!("{:+.2}", report.profit_loss);
    println!(
        "Profit/loss: {}",
        if report.profit_loss >= 0.0 { pl.green() } else { pl.red() }
    );
    println!("ROI: {:.2}%", report.roi);
    println!("Win rate: {:.2}%", report.win_rate);
    println!("Average odds: {:.2}", report.average_odds);
    println!("AI accuracy: {:.2}%", report.ai_accuracy);
    println!("{}", "-".repeat(60));
    println!("Current streak: {}", report.streaks.current_streak);
    println!("Best streak: {}", report.streaks.best_streak.green());
    println!("Worst streak: {}", report.streaks.worst_streak.red());
    println!("Max profit: {:+.2}", report.max_profit);
    println!("Max loss: {:+.2}", report.max_loss);

    if !report.category_breakdown.is_empty() {
        println!("\n{}", "By Category:".yellow().bold());
        print_dimension_table("Category", &report.category_breakdown);
    }

    if !report.daily_profit_loss.is_empty() {
        println!("\n{}", "Daily Profit/Loss:".yellow().bold());
        for (date, pl) in &report.daily_profit_loss {
            let line = format!("{} {:>+10.2}", date, pl);
            println!("{}", if *pl >= 0.0 { line.green() } else { line.red() });
        }
    }
    println!("{}", "=".repeat(60));
}

fn show_growth(paths: &Paths, user_id: Option<&str>, starting_bankroll: f64, json: bool) -> Result<()> {
    let bets: Vec<BetRecord> = load_bets(paths)?
        .into_iter()
        .filter(|b| user_id.map_or(true, |user| b.user_id == user))
        .collect();
    let growth = bankroll_growth(&bets, starting_bankroll);

    if json {
        return print_json(&growth);
    }

    println!("{}", "Bankroll Growth:".yellow().bold());
    println!("{:>12} {:>12}", "Date", "Bankroll");
    println!("{}", "-".repeat(26));
    let mut previous = starting_bankroll;
    for point in &growth {
        let line = format!("{:>12} {:>12.2}", point.date, point.bankroll);
        println!("{}", if point.bankroll >= previous { line.green() } else { line.red() });
        previous = point.bankroll;
    }
    if growth.is_empty() {
        println!("{}", "No settled bets.".dimmed());
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueBetRow<'a> {
    #[serde(flatten)]
    record: &'a ScoredMatchRecord,
    suggested_stake: f64,
}

fn list_value_bets(paths: &Paths, min_ev: f64, bankroll: f64, kelly: f64, top: usize, json: bool) -> Result<()> {
    let records = load_feed(paths)?;

    let filter = RecordFilter::window(Timeframe::All, WindowAnchor::LatestRecord).with_value_bets_only(true);
    let mut upcoming: Vec<&ScoredMatchRecord> = filter
        .apply(&records)
        .into_iter()
        .filter(|r| r.actual_outcome.is_none() && r.expected_value >= min_ev)
        .collect();
    upcoming.sort_by(|a, b| b.expected_value.total_cmp(&a.expected_value));
    upcoming.truncate(top);

    let rows: Vec<ValueBetRow> = upcoming
        .into_iter()
        .map(|record| ValueBetRow {
            record,
            suggested_stake: KellySizing::new(record.predicted_prob, record.odds, kelly)
                .map(|sizing| sizing.stake_for(bankroll))
                .unwrap_or(0.0),
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    println!("{}", "Value Bets:".yellow().bold());
    println!(
        "{:>10} {:<32} {:<10} {:>6} {:>8} {:>7} {:>9}",
        "Date", "Match", "Sport", "Pick", "Odds", "EV", "Stake"
    );
    println!("{}", "-".repeat(90));
    for row in &rows {
        let r = row.record;
        let date = r.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
        let fixture = truncate_name(&format!("{} v {}", r.home_team, r.away_team), 32);
        println!(
            "{:>10} {:<32} {:<10} {:>6} {:>8.2} {:>7} {:>9.2}",
            date,
            fixture,
            truncate_name(&r.category, 10),
            r.predicted_outcome,
            r.odds,
            format!("{:+.3}", r.expected_value).green(),
            row.suggested_stake
        );
    }
    if rows.is_empty() {
        println!("{}", "No upcoming value bets.".dimmed());
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRow {
    date: Option<chrono::NaiveDate>,
    home_team: String,
    away_team: String,
    odds: f64,
    won: bool,
    unit_profit: f64,
    cumulative_units: f64,
}

fn show_history(paths: &Paths, timeframe: Timeframe, last: usize, json: bool) -> Result<()> {
    let records = load_feed(paths)?;

    let filter = RecordFilter::window(timeframe, WindowAnchor::LatestRecord)
        .with_value_bets_only(true)
        .with_settled_only(true);
    let mut settled = filter.apply(&records);
    settled.sort_by_key(|r| r.date);

    let mut cumulative = 0.0;
    let rows: Vec<HistoryRow> = settled
        .iter()
        .filter_map(|r| {
            let unit_profit = r.unit_profit()?;
            cumulative += unit_profit;
            Some(HistoryRow {
                date: r.date,
                home_team: r.home_team.clone(),
                away_team: r.away_team.clone(),
                odds: r.odds,
                won: r.is_win(),
                unit_profit,
                cumulative_units: cumulative,
            })
        })
        .collect();
    let recent = &rows[rows.len().saturating_sub(last)..];

    if json {
        return print_json(&recent);
    }

    println!("{}", "Value Bet History (1 unit per bet):".yellow().bold());
    println!(
        "{:>10} {:<32} {:>8} {:>6} {:>9} {:>10}",
        "Date", "Match", "Odds", "Result", "Units", "Total"
    );
    println!("{}", "-".repeat(80));
    for row in recent {
        let date = row.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
        let result = if row.won { "WIN".green() } else { "LOSS".red() };
        println!(
            "{:>10} {:<32} {:>8.2} {:>6} {:>+9.2} {:>+10.2}",
            date,
            truncate_name(&format!("{} v {}", row.home_team, row.away_team), 32),
            row.odds,
            result,
            row.unit_profit,
            row.cumulative_units
        );
    }
    println!();
    println!("Settled value bets: {} / total units: {:+.2}", rows.len(), cumulative);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveSummary<'a> {
    settled: usize,
    still_pending: usize,
    written: bool,
    bets: Vec<&'a BetRecord>,
}

fn resolve_ledger(paths: &Paths, dry_run: bool, json: bool) -> Result<()> {
    let records = load_feed(paths)?;
    let mut bets = load_bets(paths)?;
    let before: Vec<bool> = bets.iter().map(|b| b.status == BetStatus::Pending).collect();

    let settled = resolve_pending(&mut bets, &records);
    let written = settled > 0 && !dry_run;
    if written {
        save_ledger(&paths.ledger, &bets)
            .with_context(|| format!("Failed to write ledger to {:?}", paths.ledger))?;
    }

    let newly_settled: Vec<&BetRecord> = bets
        .iter()
        .zip(&before)
        .filter(|(bet, was_pending)| **was_pending && bet.status != BetStatus::Pending)
        .map(|(bet, _)| bet)
        .collect();
    let still_pending = bets
        .iter()
        .filter(|b| b.status == BetStatus::Pending && !b.is_deleted)
        .count();

    if json {
        return print_json(&ResolveSummary {
            settled,
            still_pending,
            written,
            bets: newly_settled,
        });
    }

    println!("{}", "Resolved Bets:".yellow().bold());
    println!(
        "{:<28} {:<10} {:>8} {:>8} {:>7} {:>10}",
        "Match", "User", "Stake", "Odds", "Status", "Profit"
    );
    println!("{}", "-".repeat(76));
    for bet in &newly_settled {
        let status = if bet.is_won() { "won".green() } else { "lost".red() };
        println!(
            "{:<28} {:<10} {:>8.2} {:>8.2} {:>7} {:>+10.2}",
            truncate_name(&bet.match_id.to_string(), 28),
            truncate_name(&bet.user_id, 10),
            bet.stake,
            bet.odds,
            status,
            bet.profit
        );
    }
    println!();
    println!("Settled: {} / still pending: {}", settled, still_pending);
    if dry_run && settled > 0 {
        println!("{}", "Dry run: ledger not written.".dimmed());
    }
    Ok(())
}

fn run_interactive(paths: &Paths) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Select Quit to exit.\n");

    let theme = ColorfulTheme::default();
    let stake_types = [StakeType::Fixed, StakeType::Percentage, StakeType::Kelly];
    let timeframes = ["all", "1month", "3months", "6months", "1year"];

    loop {
        let options = vec![
            "Simulate a strategy",
            "Analyze my bets",
            "Bankroll growth",
            "Upcoming value bets",
            "Value bet history",
            "Settle pending bets",
            "Quit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let defaults = SimulationParameters::default();
                let bankroll: f64 = Input::with_theme(&theme)
                    .with_prompt("Starting bankroll")
                    .default(defaults.starting_bankroll)
                    .interact_text()?;

                let stake_type = stake_types[Select::with_theme(&theme)
                    .with_prompt("Staking")
                    .items(&["Fixed", "Percentage", "Kelly"])
                    .default(0)
                    .interact()?];

                let amount: f64 = Input::with_theme(&theme)
                    .with_prompt(match stake_type {
                        StakeType::Fixed => "Stake per bet",
                        StakeType::Percentage => "Percent of bankroll",
                        StakeType::Kelly => "Kelly fraction (0-1)",
                    })
                    .default(match stake_type {
                        StakeType::Fixed => 50.0,
                        StakeType::Percentage => 5.0,
                        StakeType::Kelly => 0.5,
                    })
                    .interact_text()?;

                let ev_threshold: f64 = Input::with_theme(&theme)
                    .with_prompt("Minimum EV")
                    .default(defaults.ev_threshold)
                    .interact_text()?;

                let timeframe = timeframes[Select::with_theme(&theme)
                    .with_prompt("Timeframe")
                    .items(&timeframes)
                    .default(2)
                    .interact()?];

                let request = SimulationRequest {
                    bankroll,
                    stake_type: stake_type.as_str().to_string(),
                    fixed_stake: Some(amount),
                    percent: Some(amount),
                    kelly_fraction: Some(amount),
                    ev_threshold,
                    min_odds: defaults.min_odds,
                    max_odds: defaults.max_odds,
                    timeframe: timeframe.to_string(),
                    sports: None,
                };

                println!();
                if let Err(e) = run_simulation(paths, request, false) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            1 => {
                let windows = ["all", "week", "month", "quarter", "year"];
                let window = windows[Select::with_theme(&theme)
                    .with_prompt("Timeframe")
                    .items(&windows)
                    .default(0)
                    .interact()?];

                let user: String = Input::with_theme(&theme)
                    .with_prompt("User ID (empty for all)")
                    .allow_empty(true)
                    .interact_text()?;

                let options = AnalyticsOptions {
                    timeframe: parse_timeframe(window)?,
                    user_id: if user.trim().is_empty() { None } else { Some(user.trim().to_string()) },
                    ..Default::default()
                };

                println!();
                if let Err(e) = run_analytics(paths, options, false) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            2 => {
                println!();
                if let Err(e) = show_growth(paths, None, DEFAULT_STARTING_BANKROLL, false) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            3 => {
                println!();
                if let Err(e) = list_value_bets(paths, 0.0, DEFAULT_STARTING_BANKROLL, 0.25, 20, false) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            4 => {
                println!();
                if let Err(e) = show_history(paths, Timeframe::All, 20, false) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            5 => {
                println!();
                if let Err(e) = resolve_ledger(paths, false, false) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            6 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
