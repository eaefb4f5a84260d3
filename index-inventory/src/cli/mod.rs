use crate::types::constant::{DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod database;
pub mod report;

#[derive(Parser, Debug)]
#[command(
    name = "index-inventory",
    version,
    about = "Index inventory, redundancy analysis and snapshot replay for MongoDB clusters",
    long_about = "Inventories every index of every collection on a MongoDB cluster, annotates each one with usage \
    and shard-key facts, flags redundant indexes, and saves the whole inventory to a portable snapshot that can be \
    printed offline or replayed onto another cluster.",
    after_help = "Examples:\n  \
    index-inventory collect --mongodb-connection-url mongodb://localhost:27017\n  \
    index-inventory print --file ./out/localhost_27017-index.bson.gz\n  \
    index-inventory recreate --file ./out/localhost_27017-index.bson.gz --mongodb-connection-url mongodb://staging:27017"
)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inventory the indexes of a live cluster, print them and save a snapshot
    Collect {
        #[command(flatten)]
        collect_command: Box<CollectCmd>,
    },
    /// Print the inventory stored in a snapshot file, without connecting anywhere
    Print {
        #[command(flatten)]
        print_command: PrintCmd,
    },
    /// Recreate the indexes stored in a snapshot file on a live cluster
    Recreate {
        #[command(flatten)]
        recreate_command: Box<RecreateCmd>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CollectCmd {
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    #[clap(flatten)]
    pub report_args: report::ReportCliArgs,

    /// Only inventory this database
    #[arg(env = "INDEX_INVENTORY_DATABASE", long, value_name = "NAME")]
    pub database: Option<String>,

    /// Number of collections analysed at the same time
    #[arg(env = "INDEX_INVENTORY_CONCURRENCY", long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Directory the snapshot files are written to
    #[arg(env = "INDEX_INVENTORY_OUTPUT_DIR", long, value_name = "PATH", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Also write a human-readable extended JSON export next to the snapshot
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PrintCmd {
    /// Snapshot file (`*-index.bson.gz` or `*-stats.bson.gz`)
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    #[clap(flatten)]
    pub report_args: report::ReportCliArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RecreateCmd {
    /// Snapshot file (`*-index.bson.gz` or `*-stats.bson.gz`)
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    #[clap(flatten)]
    pub report_args: report::ReportCliArgs,

    /// Number of collections recreated at the same time
    #[arg(env = "INDEX_INVENTORY_CONCURRENCY", long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}
