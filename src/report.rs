//! Rendering of ledger figures into JSON, Markdown tables or CSV.

use crate::ledger::{CommissionRow, DirectionTotals, HoRow, LedgerSummary, StatementRow};
use crate::model::{Branch, Points};
use crate::Result;
use anyhow::Context;
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::Table;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The output format of a report.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The report as a JSON document.
    Json,
    /// One Markdown table per section.
    #[default]
    Table,
    /// One CSV block per section, each preceded by its title.
    Csv,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// A rendered report.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// The whole report as JSON.
    Json(serde_json::Value),
    /// Markdown tables as a single formatted string.
    Table(String),
    /// CSV data as a properly escaped string.
    Csv(String),
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({:?})", v),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => {
                if let Ok(s) = serde_json::to_string_pretty(v) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{:?}", v)
                }
            }
            Rows::Table(s) => write!(f, "{}", s),
            Rows::Csv(s) => write!(f, "{}", s),
        }
    }
}

/// A type that can be laid out as one row of a table.
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

/// One titled table of a report.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Section {
    title: String,
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Section {
    pub fn new<R>(title: impl Into<String>, rows: &[R]) -> Self
    where
        R: Tabular,
    {
        Self {
            title: title.into(),
            headers: R::headers(),
            rows: rows.iter().map(Tabular::cells).collect(),
        }
    }

    /// A two-column section of labelled figures.
    pub fn figures(title: impl Into<String>, figures: &[(&str, Decimal)]) -> Self {
        Self {
            title: title.into(),
            headers: vec!["Figure", "Value"],
            rows: figures
                .iter()
                .map(|(label, value)| vec![label.to_string(), money(*value)])
                .collect(),
        }
    }

    fn markdown(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(ASCII_MARKDOWN)
            .set_header(self.headers.clone());
        for row in &self.rows {
            table.add_row(row);
        }
        format!("## {}\n\n{table}\n", self.title)
    }

    fn csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record([self.title.as_str()])?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Unable to flush CSV output: {e}"))?;
        String::from_utf8(bytes).context("CSV output was not valid UTF-8")
    }
}

/// Renders a report. JSON serializes `document`; the other formats lay out `sections`.
pub fn render<T>(format: OutputFormat, document: &T, sections: &[Section]) -> Result<Rows>
where
    T: Serialize,
{
    Ok(match format {
        OutputFormat::Json => Rows::Json(
            serde_json::to_value(document).context("Unable to serialize the report")?,
        ),
        OutputFormat::Table => Rows::Table(
            sections
                .iter()
                .map(Section::markdown)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        OutputFormat::Csv => Rows::Csv(
            sections
                .iter()
                .map(Section::csv)
                .collect::<Result<Vec<_>>>()?
                .join("\n"),
        ),
    })
}

/// Formats a figure with thousands separators.
pub fn money(value: Decimal) -> String {
    Points::from(value).to_string()
}

impl Tabular for Branch {
    fn headers() -> Vec<&'static str> {
        vec![
            "Branch",
            "Name",
            "Location",
            "Active",
            "Opening",
            "Balance",
            "Commission",
            "Today",
            "Remaining Commission",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            self.name().to_string(),
            self.location().to_string(),
            if self.active() { "yes" } else { "no" }.to_string(),
            money(self.opening_balance()),
            money(self.transaction_balance()),
            money(self.commission()),
            money(self.today_commission()),
            money(self.remaining_transfer_commission()),
        ]
    }
}

impl Tabular for DirectionTotals {
    fn headers() -> Vec<&'static str> {
        vec!["Direction", "Count", "Points", "Signed Points", "Commission"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.direction.to_string(),
            self.count.to_string(),
            money(self.gross_points_total),
            money(self.signed_points_total),
            money(self.commission_total),
        ]
    }
}

impl Tabular for StatementRow {
    fn headers() -> Vec<&'static str> {
        vec![
            "Date",
            "Transaction",
            "Direction",
            "State",
            "Party",
            "Points",
            "Commission",
            "Balance",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            self.transaction_id.clone(),
            self.direction.to_string(),
            self.state.to_string(),
            self.counterparty.clone(),
            money(self.points),
            money(self.commission),
            money(self.balance),
        ]
    }
}

impl Tabular for HoRow {
    fn headers() -> Vec<&'static str> {
        vec!["Branch", "Name", "Balance", "Remaining Commission", "Total"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.branch_id.clone(),
            self.branch_name.clone(),
            money(self.transaction_balance),
            money(self.remaining_transfer_commission),
            money(self.row_total),
        ]
    }
}

impl Tabular for CommissionRow {
    fn headers() -> Vec<&'static str> {
        vec!["Branch", "Name", "Today's Commission"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.branch_id.clone(),
            self.branch_name.clone(),
            money(self.today_commission),
        ]
    }
}

/// The figures of a `LedgerSummary` as a two-column section.
pub fn summary_section(summary: &LedgerSummary) -> Section {
    let mut figures = vec![
        ("Opening balance", summary.opening_balance),
        ("Points sent", summary.gross_sent_points),
        ("Points received", summary.gross_received_points),
        ("Net points", summary.net_points),
        ("Sent commission", summary.sent_commission),
        ("Received commission", summary.received_commission),
        ("Net commission", summary.net_commission),
        ("Balance before commission", summary.balance_before_commission),
        ("Balance after commission", summary.balance_after_commission),
        (
            "Balance after commission (API)",
            summary.balance_after_commission_alt,
        ),
    ];
    if let Some(difference) = summary.divergence() {
        figures.push(("Divergence", difference));
    }
    Section::figures(
        format!("Ledger: {} ({})", summary.branch_name, summary.branch_id),
        &figures,
    )
}
