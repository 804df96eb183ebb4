//! These structs provide the CLI interface for the rider CLI.

use crate::model::{Amount, DepositSource, MaintenanceItem, Owner};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// rider: a command-line bookkeeping tool for a delivery-platform rider.
///
/// The purpose of this program is to record daily platform revenue, bank
/// deposits and vehicle maintenance costs in local CSV tables, and to track a
/// monthly net-income goal. Rows are partitioned per owner: every command
/// runs as the identity given by --nickname/--passcode (or RIDER_NICKNAME /
/// RIDER_PASSCODE), and only ever sees or rewrites that identity's rows.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command to run. Decide what directory you want to
    /// store data in and pass it as --ledger-home (or RIDER_HOME); by default
    /// it will be $HOME/rider-ledger.
    Init,
    /// Record a new revenue day, deposit, or maintenance event.
    Add(AddArgs),
    /// List your entries for a table, newest first.
    List(ListArgs),
    /// Edit one of your entries in place by its entry id.
    Update(UpdateArgs),
    /// Delete one of your entries by its entry id.
    Delete(DeleteArgs),
    /// Show or overwrite the monthly net-income goal.
    Goal(GoalArgs),
    /// Month summary: net income, deliveries, average unit price, goal progress.
    Report(ReportArgs),
    /// Upgrade legacy tables to the current schema.
    ///
    /// Legacy tables have no entry ids and no owner columns. Migration mints
    /// an id for every row and stamps your identity on it, adopting the whole
    /// table into your partition.
    Migrate,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate
    /// for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where ledger data and configuration are held.
    /// Defaults to ~/rider-ledger
    #[arg(long, env = "RIDER_HOME", default_value_t = default_ledger_home())]
    ledger_home: DisplayPath,

    /// The owner nickname stamped on, and matched against, every row.
    #[arg(long, env = "RIDER_NICKNAME", default_value = "rider")]
    nickname: String,

    /// The passcode half of the owner identity pair. This is a row-partition
    /// token stored in plain text, not a credential.
    #[arg(long, env = "RIDER_PASSCODE", default_value = "", hide_env_values = true)]
    passcode: String,
}

impl Common {
    pub fn new(log_level: LevelFilter, ledger_home: PathBuf, owner: &Owner) -> Self {
        Self {
            log_level,
            ledger_home: ledger_home.into(),
            nickname: owner.nickname().to_string(),
            passcode: owner.passcode().to_string(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn ledger_home(&self) -> &DisplayPath {
        &self.ledger_home
    }

    /// The request-scoped caller identity for this invocation.
    pub fn owner(&self) -> Owner {
        Owner::new(&self.nickname, &self.passcode)
    }
}

/// The entry kinds addressable by `list` and `delete`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum EntityKind {
    Revenue,
    Deposit,
    Maintenance,
}

#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    #[command(subcommand)]
    entity: AddSubcommand,
}

impl AddArgs {
    pub fn entity(&self) -> &AddSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum AddSubcommand {
    /// Record one day of platform income.
    Revenue(AddRevenueArgs),
    /// Record a bank deposit.
    Deposit(AddDepositArgs),
    /// Record a maintenance event or vehicle expense.
    Maintenance(AddMaintenanceArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct AddRevenueArgs {
    /// The day being recorded, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Coupang income in won.
    #[arg(long, default_value_t = Amount::new(0))]
    coupang: Amount,

    /// Baemin income in won.
    #[arg(long, default_value_t = Amount::new(0))]
    baemin: Amount,

    /// Out-of-pocket expense (meals etc.) in won.
    #[arg(long, default_value_t = Amount::new(0))]
    expense: Amount,

    /// Number of deliveries.
    #[arg(long, default_value_t = 0)]
    deliveries: u32,

    /// Distance ridden, free text (e.g. "82km").
    #[arg(long, default_value = "")]
    distance: String,

    #[arg(long, default_value = "")]
    memo: String,
}

impl AddRevenueArgs {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn coupang(&self) -> Amount {
        self.coupang
    }

    pub fn baemin(&self) -> Amount {
        self.baemin
    }

    pub fn expense(&self) -> Amount {
        self.expense
    }

    pub fn deliveries(&self) -> u32 {
        self.deliveries
    }

    pub fn distance(&self) -> &str {
        &self.distance
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddDepositArgs {
    /// The deposit date, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Where the deposit came from.
    #[arg(long, value_enum)]
    source: DepositSource,

    /// Deposit amount in won.
    #[arg(long)]
    amount: Amount,

    #[arg(long, default_value = "")]
    memo: String,
}

impl AddDepositArgs {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn source(&self) -> DepositSource {
        self.source
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddMaintenanceArgs {
    /// The service date, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// What was serviced or paid for.
    #[arg(long, value_enum)]
    item: MaintenanceItem,

    /// Cost in won.
    #[arg(long)]
    cost: Amount,

    /// Odometer reading at service time, free text.
    #[arg(long, default_value = "")]
    odometer: String,

    #[arg(long, default_value = "")]
    memo: String,
}

impl AddMaintenanceArgs {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn item(&self) -> MaintenanceItem {
        self.item
    }

    pub fn cost(&self) -> Amount {
        self.cost
    }

    pub fn odometer(&self) -> &str {
        &self.odometer
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Which table to list.
    #[arg(value_enum)]
    entity: EntityKind,

    /// Restrict to one month, YYYY-MM.
    #[arg(long, value_parser = parse_month)]
    month: Option<String>,
}

impl ListArgs {
    pub fn new(entity: EntityKind, month: Option<String>) -> Self {
        Self { entity, month }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// Which table the entry lives in.
    #[arg(value_enum)]
    entity: EntityKind,

    /// The entry id to delete (shown by `rider list`).
    #[arg(long)]
    id: String,
}

impl DeleteArgs {
    pub fn new(entity: EntityKind, id: impl Into<String>) -> Self {
        Self {
            entity,
            id: id.into(),
        }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    #[command(subcommand)]
    entity: UpdateSubcommand,
}

impl UpdateArgs {
    pub fn entity(&self) -> &UpdateSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum UpdateSubcommand {
    /// Edit a revenue entry. Unspecified fields keep their values; total and
    /// net are recomputed.
    Revenue(UpdateRevenueArgs),
    /// Edit a deposit entry. Unspecified fields keep their values.
    Deposit(UpdateDepositArgs),
    /// Edit a maintenance entry. Unspecified fields keep their values.
    Maintenance(UpdateMaintenanceArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateRevenueArgs {
    /// The entry id to edit (shown by `rider list`).
    #[arg(long)]
    id: String,

    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long)]
    coupang: Option<Amount>,

    #[arg(long)]
    baemin: Option<Amount>,

    #[arg(long)]
    expense: Option<Amount>,

    #[arg(long)]
    deliveries: Option<u32>,

    #[arg(long)]
    distance: Option<String>,

    #[arg(long)]
    memo: Option<String>,
}

impl UpdateRevenueArgs {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn coupang(&self) -> Option<Amount> {
        self.coupang
    }

    pub fn baemin(&self) -> Option<Amount> {
        self.baemin
    }

    pub fn expense(&self) -> Option<Amount> {
        self.expense
    }

    pub fn deliveries(&self) -> Option<u32> {
        self.deliveries
    }

    pub fn distance(&self) -> Option<String> {
        self.distance.clone()
    }

    pub fn memo(&self) -> Option<String> {
        self.memo.clone()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateDepositArgs {
    /// The entry id to edit.
    #[arg(long)]
    id: String,

    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, value_enum)]
    source: Option<DepositSource>,

    #[arg(long)]
    amount: Option<Amount>,

    #[arg(long)]
    memo: Option<String>,
}

impl UpdateDepositArgs {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn source(&self) -> Option<DepositSource> {
        self.source
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn memo(&self) -> Option<String> {
        self.memo.clone()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateMaintenanceArgs {
    /// The entry id to edit.
    #[arg(long)]
    id: String,

    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, value_enum)]
    item: Option<MaintenanceItem>,

    #[arg(long)]
    cost: Option<Amount>,

    #[arg(long)]
    odometer: Option<String>,

    #[arg(long)]
    memo: Option<String>,
}

impl UpdateMaintenanceArgs {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn item(&self) -> Option<MaintenanceItem> {
        self.item
    }

    pub fn cost(&self) -> Option<Amount> {
        self.cost
    }

    pub fn odometer(&self) -> Option<String> {
        self.odometer.clone()
    }

    pub fn memo(&self) -> Option<String> {
        self.memo.clone()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct GoalArgs {
    /// Overwrite the goal with this amount in won (e.g. 3000000 or 3,000,000).
    #[arg(long)]
    set: Option<Amount>,
}

impl GoalArgs {
    pub fn set(&self) -> Option<Amount> {
        self.set
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// The month to summarize, YYYY-MM. Defaults to the current month.
    #[arg(long, value_parser = parse_month)]
    month: Option<String>,
}

impl ReportArgs {
    pub fn new(month: Option<String>) -> Self {
        Self { month }
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }
}

/// Validates a YYYY-MM month selector.
fn parse_month(s: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .map(|_| s.to_string())
        .map_err(|_| format!("'{s}' is not a month in YYYY-MM form"))
}

fn default_ledger_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("rider-ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --ledger-home or RIDER_HOME instead of relying on the default \
                ledger home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("rider-ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
