//! Merton CLI binary.
//!
//! Command-line interface for the Merton valuation analytics: CAPM cost of
//! capital, DCF share pricing and market-model event studies.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use merton_analytics::{
    DcfParams, capm_cost_of_equity, compute_returns, dcf_share_price, estimate_beta,
    share_price_curve, wacc,
};
use merton_data::{Interval, PriceSeriesProvider, YahooQuoteProvider};
use merton_events::{EventSpec, EventStudyEngine, WindowConfig};
use merton_output::{
    cost_of_capital_summary, curve_summary, study_summary, valuation_summary,
    write_abnormal_returns_csv, write_results_json,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration as StdDuration;

#[derive(Parser)]
#[command(name = "merton")]
#[command(about = "Merton: CAPM, DCF and event-study analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate beta and the CAPM cost of equity, optionally the WACC
    CostOfCapital {
        /// Stock symbol
        ticker: String,

        /// Market index symbol
        #[arg(long, default_value = "^GSPC")]
        market: String,

        /// First date of the estimation period
        #[arg(long, default_value = "2017-09-01")]
        start: NaiveDate,

        /// Last date of the estimation period
        #[arg(long, default_value = "2022-08-31")]
        end: NaiveDate,

        /// Risk-free rate
        #[arg(long, default_value_t = 0.0333)]
        risk_free: f64,

        /// Expected market return
        #[arg(long, default_value_t = 0.10)]
        market_return: f64,

        /// Estimate beta from monthly instead of daily returns
        #[arg(long)]
        monthly: bool,

        /// Pre-tax cost of debt (requires --equity-value and --debt-value)
        #[arg(long)]
        cost_of_debt: Option<f64>,

        /// Market value of equity
        #[arg(long)]
        equity_value: Option<f64>,

        /// Market value of debt
        #[arg(long)]
        debt_value: Option<f64>,
    },

    /// DCF share price from explicit free cash flow forecasts
    Valuation {
        /// Free cash flow forecasts, comma separated and in period order
        #[arg(long, value_delimiter = ',', required = true)]
        fcf: Vec<f64>,

        /// Shares outstanding, on the same unit basis as the cash flows
        #[arg(long)]
        shares: f64,

        /// Debt net of cash
        #[arg(long, default_value_t = 0.0)]
        net_debt: f64,

        /// Perpetuity growth rate
        #[arg(long, default_value_t = 0.04)]
        growth: f64,

        /// Discount rate, typically the WACC
        #[arg(long)]
        discount: f64,

        /// Growth-rate sweep as start,end,steps (e.g. 0.035,0.045,100)
        #[arg(long)]
        sweep: Option<String>,
    },

    /// Market-model event study over a calendar of labeled events
    EventStudy {
        /// Stock symbol
        ticker: String,

        /// Market index symbol
        #[arg(long, default_value = "^GSPC")]
        market: String,

        /// Event as LABEL=YYYY-MM-DD; repeat for multiple events
        #[arg(long = "event", value_parser = parse_event, required = true)]
        events: Vec<EventSpec>,

        /// Calendar days before the event in the event window
        #[arg(long, default_value_t = 5)]
        pre: u64,

        /// Calendar days after the event in the event window
        #[arg(long, default_value_t = 5)]
        post: u64,

        /// Gap in calendar days between estimation and event windows
        #[arg(long, default_value_t = 30)]
        offset: u64,

        /// Estimation window length in calendar days
        #[arg(long, default_value_t = 378)]
        length: u64,

        /// Write per-date abnormal returns to a CSV file
        #[arg(long)]
        export_csv: Option<PathBuf>,

        /// Write full results to a JSON file
        #[arg(long)]
        export_json: Option<PathBuf>,
    },
}

fn parse_event(raw: &str) -> Result<EventSpec, String> {
    let (label, date) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=YYYY-MM-DD, got '{raw}'"))?;
    if label.is_empty() {
        return Err(format!("event label is empty in '{raw}'"));
    }
    let event_date: NaiveDate = date
        .parse()
        .map_err(|e| format!("bad event date '{date}': {e}"))?;
    Ok(EventSpec::new(label, event_date))
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CostOfCapital {
            ticker,
            market,
            start,
            end,
            risk_free,
            market_return,
            monthly,
            cost_of_debt,
            equity_value,
            debt_value,
        } => {
            cost_of_capital(
                &ticker.to_uppercase(),
                &market,
                start,
                end,
                risk_free,
                market_return,
                monthly,
                cost_of_debt,
                equity_value,
                debt_value,
            )
            .await?;
        }
        Commands::Valuation {
            fcf,
            shares,
            net_debt,
            growth,
            discount,
            sweep,
        } => {
            valuation(fcf, shares, net_debt, growth, discount, sweep)?;
        }
        Commands::EventStudy {
            ticker,
            market,
            events,
            pre,
            post,
            offset,
            length,
            export_csv,
            export_json,
        } => {
            let config = WindowConfig {
                pre_event_days: pre,
                post_event_days: post,
                estimation_offset_days: offset,
                estimation_length_days: length,
                ..WindowConfig::default()
            };
            event_study(
                &ticker.to_uppercase(),
                &market,
                events,
                config,
                export_csv,
                export_json,
            )
            .await?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cost_of_capital(
    ticker: &str,
    market: &str,
    start: NaiveDate,
    end: NaiveDate,
    risk_free: f64,
    market_return: f64,
    monthly: bool,
    cost_of_debt: Option<f64>,
    equity_value: Option<f64>,
    debt_value: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = YahooQuoteProvider::new()?;
    let interval = if monthly {
        Interval::Monthly
    } else {
        Interval::Daily
    };

    let spinner = progress_spinner(format!("Fetching {ticker} and {market}..."));
    let (stock_prices, market_prices) = tokio::try_join!(
        provider.fetch(ticker, start, end, interval),
        provider.fetch(market, start, end, interval),
    )?;
    spinner.finish_with_message(format!(
        "Fetched {} / {} observations",
        stock_prices.len(),
        market_prices.len()
    ));

    let stock_returns = compute_returns(&stock_prices)?;
    let market_returns = compute_returns(&market_prices)?;
    let model = estimate_beta(&stock_returns, &market_returns)?;
    let cost_of_equity = capm_cost_of_equity(model.beta, risk_free, market_return)?;

    let firm_wacc = match (cost_of_debt, equity_value, debt_value) {
        (None, None, None) => None,
        (Some(rd), Some(e), Some(d)) => Some(wacc(cost_of_equity, rd, e, d)?),
        _ => {
            return Err(
                "provide --cost-of-debt, --equity-value and --debt-value together".into(),
            );
        }
    };

    print!(
        "\n{}",
        cost_of_capital_summary(ticker, &model, cost_of_equity, firm_wacc)
    );
    Ok(())
}

fn valuation(
    fcf: Vec<f64>,
    shares: f64,
    net_debt: f64,
    growth: f64,
    discount: f64,
    sweep: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = DcfParams {
        free_cash_flows: fcf,
        shares_outstanding: shares,
        net_debt,
        growth_rate: growth,
        discount_rate: discount,
    };
    let result = dcf_share_price(&params)?;
    print!("{}", valuation_summary(&params, &result));

    if let Some(raw) = sweep {
        let rates = parse_sweep(&raw)?;
        let curve = share_price_curve(&params, &rates)?;
        println!("\nShare price by perpetuity growth rate:");
        print!("{}", curve_summary(&curve));
    }
    Ok(())
}

fn parse_sweep(raw: &str) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected start,end,steps, got '{raw}'").into());
    }
    let start: f64 = parts[0].trim().parse()?;
    let end: f64 = parts[1].trim().parse()?;
    let steps: usize = parts[2].trim().parse()?;
    if steps < 2 {
        return Err("sweep needs at least 2 steps".into());
    }
    let span = end - start;
    Ok((0..steps)
        .map(|i| start + span * i as f64 / (steps - 1) as f64)
        .collect())
}

async fn event_study(
    ticker: &str,
    market: &str,
    events: Vec<EventSpec>,
    config: WindowConfig,
    export_csv: Option<PathBuf>,
    export_json: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = YahooQuoteProvider::new()?;
    let engine = EventStudyEngine::new(provider, ticker, market, config);

    let spinner = progress_spinner(format!(
        "Running {} event(s) for {ticker} vs {market}...",
        events.len()
    ));
    let outcomes = engine.run_all(&events).await?;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    spinner.finish_with_message(format!(
        "Completed {} event(s), {failed} failed",
        outcomes.len()
    ));

    print!("\n{}", study_summary(ticker, market, &outcomes));

    if let Some(path) = export_csv {
        write_abnormal_returns_csv(&path, &outcomes)?;
        println!("Wrote abnormal returns to {}", path.display());
    }
    if let Some(path) = export_json {
        write_results_json(&path, &outcomes)?;
        println!("Wrote full results to {}", path.display());
    }
    Ok(())
}

fn progress_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    spinner.enable_steady_tick(StdDuration::from_millis(100));
    spinner.set_message(message);
    spinner
}
