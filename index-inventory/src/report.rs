//! Annotated text rendering of an index inventory.
//!
//! Every index gets one glyph: blank for the `_id` index, `*` for the shard key, `x` for a
//! redundant index, `?` for an index nobody used, blank otherwise. Each usage record
//! follows on its own indented line.

use crate::types::{Collection, Index, IndexSnapshot, IndexUsage};
use chrono::SecondsFormat;
use std::io;

const CODE_DEFAULT: &str = "\x1b[0m";
const CODE_RED: &str = "\x1b[31;1m";
const CODE_BLUE: &str = "\x1b[34;1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub use_color: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_color: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexGlyph {
    Identity,
    ShardKey,
    Duplicate,
    Unused,
    Plain,
}

impl IndexGlyph {
    pub fn classify(index: &Index) -> Self {
        if index.is_id_index() {
            IndexGlyph::Identity
        } else if index.is_shard_key {
            IndexGlyph::ShardKey
        } else if index.is_dupped {
            IndexGlyph::Duplicate
        } else if index.total_ops == 0 {
            IndexGlyph::Unused
        } else {
            IndexGlyph::Plain
        }
    }

    pub fn symbol(self) -> char {
        match self {
            IndexGlyph::ShardKey => '*',
            IndexGlyph::Duplicate => 'x',
            IndexGlyph::Unused => '?',
            IndexGlyph::Identity | IndexGlyph::Plain => ' ',
        }
    }

    fn color(self) -> Option<&'static str> {
        match self {
            IndexGlyph::Identity | IndexGlyph::ShardKey => Some(CODE_DEFAULT),
            IndexGlyph::Duplicate => Some(CODE_RED),
            IndexGlyph::Unused => Some(CODE_BLUE),
            IndexGlyph::Plain => None,
        }
    }
}

/// Renders snapshots with a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    options: ReportOptions,
}

impl Reporter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, snapshot: &IndexSnapshot) -> String {
        let mut out = String::new();
        for (_, collection) in snapshot.collections() {
            out.push_str(&self.render_collection(collection));
            out.push('\n');
        }
        out
    }

    pub fn render_collection(&self, collection: &Collection) -> String {
        let mut indexes: Vec<&Index> = collection.indexes.iter().collect();
        indexes.sort_by(|a, b| a.effective_key.cmp(&b.effective_key));

        let mut out = format!("\n{}:\n", collection.ns);
        for index in indexes {
            out.push_str(&self.render_index(index));
            for usage in &index.usage {
                out.push_str(&render_usage(usage));
            }
            out.push('\n');
        }
        out
    }

    pub fn render_index(&self, index: &Index) -> String {
        let glyph = IndexGlyph::classify(index);
        match glyph.color().filter(|_| self.options.use_color) {
            Some(color) => format!("{}{} {}{}", color, glyph.symbol(), index.key_string, CODE_DEFAULT),
            None => format!("{} {}", glyph.symbol(), index.key_string),
        }
    }

    /// Write the rendered report, typically to stdout.
    pub fn print<W: io::Write>(&self, snapshot: &IndexSnapshot, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render(snapshot).as_bytes())?;
        writer.flush()
    }
}

fn render_usage(usage: &IndexUsage) -> String {
    format!(
        "\n\thost: {}, ops: {}, since: {}",
        usage.host,
        usage.accesses.ops,
        usage.accesses.since.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Print a snapshot to stdout.
pub fn print(snapshot: &IndexSnapshot, options: ReportOptions) -> io::Result<()> {
    Reporter::new(options).print(snapshot, &mut io::stdout().lock())
}
