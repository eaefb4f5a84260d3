use clap::Args;

/// Parameters controlling how the inventory report is rendered.
#[derive(Debug, Clone, Args)]
pub struct ReportCliArgs {
    /// Disable ANSI color codes in the report.
    #[arg(env = "INDEX_INVENTORY_NO_COLOR", long)]
    pub no_color: bool,
}
