use anyhow::{anyhow, bail, Context, Result};
use campaign::{CampaignPlan, CampaignPlanner, ExportFormat};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{ParseOptions, TransactionTable, ISO_DATE_FORMAT};
use pipeline::{
    CampaignConfig, ChurnClassifier, CouponRounding, DegeneratePolicy, SelectionOrder,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Winback - churned customer coupon planner
#[derive(Parser)]
#[command(name = "winback")]
#[command(about = "Pick lapsed customers worth a win-back coupon within a budget", long_about = None)]
struct Cli {
    /// Path to the transactions CSV (customer_id,trans_date,tran_amount)
    #[arg(short, long, global = true, default_value = "data/transactions.csv")]
    input: PathBuf,

    /// chrono format of the trans_date column, e.g. "%d-%b-%y"
    #[arg(long, global = true, default_value = ISO_DATE_FORMAT)]
    date_format: String,

    /// Field delimiter of the CSV file
    #[arg(long, global = true, default_value_t = ',')]
    delimiter: char,

    /// TOML campaign configuration; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a win-back campaign and list the coupon recipients
    Plan(PlanArgs),

    /// Show dataset statistics and the churn split
    Summary,

    /// Show one customer's purchase summary, score and churn status
    Customer {
        /// Customer ID to display
        #[arg(long)]
        id: String,
    },
}

#[derive(clap::Args, Debug, Default)]
struct PlanArgs {
    /// Churn cutoff (YYYY-MM-DD); customers last seen before it are churned
    #[arg(long)]
    cutoff: Option<NaiveDate>,

    /// Total discount budget
    #[arg(long)]
    budget: Option<f64>,

    /// Coupon value as a fraction of the mean transaction amount
    #[arg(long)]
    discount: Option<f64>,

    #[arg(long, value_enum)]
    rounding: Option<RoundingArg>,

    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// What to do when every customer shares the same count or amount
    #[arg(long, value_enum)]
    degenerate: Option<DegenerateArg>,

    /// Only grant coupons to customers scoring at least this much
    #[arg(long)]
    min_score: Option<f64>,

    /// Write the recipients to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file format; guessed from the extension when omitted
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Number of recipients to print
    #[arg(long, default_value = "20")]
    show: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoundingArg {
    Nearest,
    Up,
    Exact,
}

impl From<RoundingArg> for CouponRounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Nearest => CouponRounding::Nearest,
            RoundingArg::Up => CouponRounding::Up,
            RoundingArg::Exact => CouponRounding::Exact,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Score,
    Aggregation,
}

impl From<OrderArg> for SelectionOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Score => SelectionOrder::Score,
            OrderArg::Aggregation => SelectionOrder::Aggregation,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DegenerateArg {
    Fail,
    Zero,
}

impl From<DegenerateArg> for DegeneratePolicy {
    fn from(arg: DegenerateArg) -> Self {
        match arg {
            DegenerateArg::Fail => DegeneratePolicy::Fail,
            DegenerateArg::Zero => DegeneratePolicy::Zero,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let options = parse_options(&cli.date_format, cli.delimiter)?;

    println!("Loading transactions from {}...", cli.input.display());
    let start = Instant::now();
    let table = TransactionTable::load_from_file(&cli.input, &options)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    println!(
        "{} Loaded {} transactions in {:?}",
        "✓".green(),
        table.len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Plan(args) => handle_plan(&table, config, args),
        Commands::Summary => handle_summary(&table, &config),
        Commands::Customer { id } => handle_customer(&table, config, &id),
    }
}

fn load_config(path: Option<&Path>) -> Result<CampaignConfig> {
    match path {
        Some(path) => CampaignConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(CampaignConfig::default()),
    }
}

fn parse_options(date_format: &str, delimiter: char) -> Result<ParseOptions> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got {delimiter:?}");
    }
    Ok(ParseOptions::default()
        .with_date_format(date_format)
        .with_delimiter(delimiter as u8))
}

/// Layer command line flags over the file configuration
fn apply_overrides(mut config: CampaignConfig, args: &PlanArgs) -> CampaignConfig {
    if let Some(cutoff) = args.cutoff {
        config.cutoff_date = Some(cutoff);
    }
    if let Some(budget) = args.budget {
        config.budget = budget;
    }
    if let Some(discount) = args.discount {
        config.coupon_discount_fraction = discount;
    }
    if let Some(rounding) = args.rounding {
        config.coupon_rounding = rounding.into();
    }
    if let Some(order) = args.order {
        config.selection_order = order.into();
    }
    if let Some(degenerate) = args.degenerate {
        config.degenerate_policy = degenerate.into();
    }
    if let Some(min_score) = args.min_score {
        config.min_score = Some(min_score);
    }
    config
}

/// Handle the 'plan' command
fn handle_plan(table: &TransactionTable, config: CampaignConfig, args: PlanArgs) -> Result<()> {
    let config = apply_overrides(config, &args);
    tracing::debug!("Campaign config: {:?}", config);
    let planner = CampaignPlanner::new(config)?;
    let plan = planner.plan(table)?;

    print_plan(&plan, args.show);

    if let Some(output) = &args.output {
        let format = args
            .format
            .map(ExportFormat::from)
            .unwrap_or_else(|| ExportFormat::from_path(output));
        campaign::write_plan(&plan, output, format)?;
        println!(
            "{} Wrote {} recipients to {}",
            "✓".green(),
            plan.recipients.len(),
            output.display()
        );
    }
    Ok(())
}

/// Handle the 'summary' command
fn handle_summary(table: &TransactionTable, config: &CampaignConfig) -> Result<()> {
    let customers = table.summarize()?;
    let (first, last) = table
        .date_range()
        .ok_or_else(|| anyhow!("Transaction table has no dates"))?;
    let mean = table
        .mean_amount()
        .ok_or_else(|| anyhow!("Transaction table has no amounts"))?;
    let classifier = ChurnClassifier::from_config(config, last)?;
    let churned = classifier.count_churned(customers.values());

    println!("{}", "Dataset summary:".bold().blue());
    println!("{}Transactions: {}", "• ".green(), table.len());
    println!("{}Customers: {}", "• ".green(), customers.len());
    println!("{}Date range: {} to {}", "• ".green(), first, last);
    println!("{}Mean amount: {:.2}", "• ".green(), mean);
    println!("{}Churn cutoff: {}", "• ".cyan(), classifier.cutoff());
    println!(
        "{}Churned customers: {} ({:.1}%)",
        "• ".cyan(),
        churned,
        100.0 * churned as f64 / customers.len() as f64
    );
    Ok(())
}

/// Handle the 'customer' command
fn handle_customer(table: &TransactionTable, config: CampaignConfig, id: &str) -> Result<()> {
    let plan = CampaignPlanner::new(config)?.plan(table)?;
    let customer = plan
        .get_customer(id)
        .ok_or_else(|| anyhow!("Customer {} not found", id))?;
    let summary = &customer.summary;

    println!("{}", format!("Customer {}", id).bold().blue());
    println!("{}Transactions: {}", "• ".green(), summary.transaction_count);
    println!("{}Total amount: {:.2}", "• ".green(), summary.total_amount);
    println!("{}Average amount: {:.2}", "• ".green(), summary.average_amount());
    println!(
        "{}Active: {} to {}",
        "• ".green(),
        summary.first_transaction_date,
        summary.last_transaction_date
    );
    let status = if customer.churned {
        "churned".red()
    } else {
        "active".green()
    };
    println!("{}Status: {} (cutoff {})", "• ".cyan(), status, plan.cutoff_date);
    println!(
        "{}Score: {:.2} (count {:.3}, amount {:.3})",
        "• ".cyan(),
        customer.score,
        customer.scaled_count,
        customer.scaled_amount
    );
    if plan.is_recipient(id) {
        println!("{}Coupon: {:.2}", "• ".cyan(), plan.coupon.value);
    }

    println!("Recent transactions:");
    let mut transactions = table.transactions_for(id);
    transactions.sort_by(|a, b| b.trans_date.cmp(&a.trans_date));
    for transaction in transactions.iter().take(5) {
        println!("  - {} {:.2}", transaction.trans_date, transaction.amount);
    }
    Ok(())
}

/// Print the plan header and the first `show` recipients
fn print_plan(plan: &CampaignPlan, show: usize) {
    println!("{}", "Campaign plan:".bold().blue());
    println!(
        "{}Customers: {} ({} churned before {})",
        "• ".green(),
        plan.customer_count,
        plan.churned_count,
        plan.cutoff_date
    );
    println!(
        "{}Coupon: {:.2} ({:.0}% of mean amount {:.2})",
        "• ".green(),
        plan.coupon.value,
        plan.coupon.discount_fraction * 100.0,
        plan.coupon.mean_amount
    );
    println!(
        "{}Budget: {:.2} covers {} coupons, {} granted, {:.2} spent",
        "• ".green(),
        plan.budget,
        plan.recipient_limit,
        plan.recipients.len(),
        plan.total_spend()
    );

    if plan.recipients.is_empty() {
        println!("{}", "No churned customers to target".yellow());
        return;
    }

    println!("{}", "Recipients:".bold().blue());
    for (i, recipient) in plan.recipients.iter().take(show).enumerate() {
        println!(
            "{}. {} - Score: {:.2}",
            (i + 1).to_string().green(),
            recipient.customer_id,
            recipient.score
        );
    }
    if plan.recipients.len() > show {
        println!("  ... and {} more", plan.recipients.len() - show);
    }
}
