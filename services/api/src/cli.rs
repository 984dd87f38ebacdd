use crate::demo::run_demo;
use crate::server;
use clap::{Args, Parser, Subcommand};
use coop_credit::error::AppError;
use coop_credit::workflows::credit::ApprovalPolicy;
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(
    name = "Cooperative Credit Service",
    about = "Run the cooperative credit service or preview its decisions from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Preview the approval decision for an amount and a risk level
    Policy(PolicyArgs),
    /// Run the approval scenarios end to end against in-memory storage
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct PolicyArgs {
    /// Requested amount, e.g. 15000000 or 2500000.50
    #[arg(long)]
    pub(crate) amount: Decimal,
    /// Risk level label as returned by risk central, e.g. "MEDIO RIESGO"
    #[arg(long)]
    pub(crate) risk_level: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Policy(args) => {
            println!("{}", policy_preview(&args));
            Ok(())
        }
        Command::Demo => run_demo().await,
    }
}

pub(crate) fn policy_preview(args: &PolicyArgs) -> String {
    let decision = ApprovalPolicy::new().evaluate(args.amount, &args.risk_level);
    let verdict = if decision.is_approved() {
        "APPROVED"
    } else {
        "REJECTED"
    };
    format!(
        "{verdict} amount={} risk_level={:?}: {}",
        args.amount,
        args.risk_level,
        decision.summary()
    )
}
