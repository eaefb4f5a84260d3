use clap::Args;

/// Parameters used to connect to the MongoDB cluster.
#[derive(Debug, Clone, Args)]
pub struct MongoDBCliArgs {
    /// The connection string to the MongoDB cluster (a mongos for sharded clusters).
    #[arg(
        env = "INDEX_INVENTORY_MONGODB_CONNECTION_URL",
        long,
        value_name = "URL",
        default_value = "mongodb://localhost:27017"
    )]
    pub mongodb_connection_url: String,

    /// Deadline in seconds for connecting and selecting a server.
    #[arg(env = "INDEX_INVENTORY_CONNECT_TIMEOUT_SECS", long, value_name = "SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,
}
