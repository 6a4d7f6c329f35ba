//! Project detail page and its CSV export.

use serde::Serialize;

use super::{format_date, write_csv_rows, CurrencyFormat};
use crate::errors::AppError;
use crate::gateway::Gateway;
use crate::geo::iso_to_country;
use crate::models::{Activity, Organisation, PolicyMarker, Transaction};

const UNKNOWN: &str = "Unknown";

const RSR_ORGANISATION: &str = "http://www.akvo.org/rsr/organisation/";
const RSR_PROJECT: &str = "http://www.akvo.org/rsr/project/";
const OPENAID_PROJECT: &str = "http://search-api.openaid.nl/projectdetail_api/";

/// Akvo RSR organisation id, RSR project id and openaid project id, per
/// IATI identifier.
const FEEDS: &[(&str, u32, u32, u32)] = &[
    ("NL-1-PPR-23872", 734, 801, 660),
    ("NL-1-PPR-22168", 405, 682, 278),
    ("NL-1-PPR-19884", 43, 315, 2669),
    ("NL-1-PPR-23718", 464, 706, 2284),
    ("NL-1-PPR-22163", 319, 587, 1272),
    ("NL-1-PPR-19499", 464, 711, 1059),
];

/// Links to related entries in external project feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedReference {
    pub organisation: String,
    pub project: String,
    pub detail: String,
}

/// Feed links for an IATI identifier, if any are registered.
pub fn feed_reference(identifier: &str) -> Option<FeedReference> {
    FEEDS
        .iter()
        .find(|(id, ..)| *id == identifier)
        .map(|(_, org, project, detail)| FeedReference {
            organisation: format!("{}{}", RSR_ORGANISATION, org),
            project: format!("{}{}", RSR_PROJECT, project),
            detail: format!("{}{}/", OPENAID_PROJECT, detail),
        })
}

/// Label/value rows grouped in titled sections.
///
/// A section title is a one-cell row and an empty row separates sections.
/// Cells stay `None` until [`DetailTable::render`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailTable {
    rows: Vec<Vec<Option<String>>>,
}

impl DetailTable {
    fn section(&mut self, title: &str) {
        self.rows.push(vec![Some(title.to_string())]);
    }

    fn row(&mut self, label: &str, value: Option<String>) {
        self.rows.push(vec![Some(label.to_string()), value]);
    }

    fn blank(&mut self) {
        self.rows.push(Vec::new());
    }

    fn transactions(
        &mut self,
        title: &str,
        activity: &Activity,
        transactions: &[Transaction],
        currency: &CurrencyFormat,
    ) {
        if transactions.is_empty() {
            return;
        }
        self.section(title);
        for transaction in transactions {
            self.row("Activity", activity.title.clone());
            self.row("Provider org", transaction.provider_org.clone());
            self.row("Receiver org", transaction.receiver_org.clone());
            self.row(
                "Value",
                transaction.value.map(|v| currency.format(v.value())),
            );
            self.row(
                "Transaction date",
                format_date(transaction.transaction_date.as_deref()),
            );
            self.blank();
        }
    }

    /// Build the table for one project.
    pub fn build(
        activity: &Activity,
        organisation: &Organisation,
        commitments: &[Transaction],
        disbursements: &[Transaction],
        policy_markers: &[PolicyMarker],
        currency: &CurrencyFormat,
    ) -> Self {
        let mut table = Self::default();

        table.section("Country Information");
        table.row(
            "Country",
            activity
                .country_code()
                .and_then(iso_to_country)
                .map(str::to_string),
        );
        table.blank();

        table.section("Activity Information");
        table.row("IATI Identifier", activity.identifier.clone());
        table.row("Reporting Organisation", organisation.name.clone());
        table.row("Sector", activity.sector.clone());
        table.row("Sector code", activity.sector_code.clone());
        table.row("Last updated", activity.last_updated.clone());
        table.row("Start date planned", format_date(activity.start_planned.as_deref()));
        table.row("Start date actual", format_date(activity.start_actual.as_deref()));
        table.row("End date planned", format_date(activity.end_planned.as_deref()));
        table.row("End date actual", format_date(activity.end_actual.as_deref()));
        table.row("Collaboration type", activity.collaboration_type.clone());
        table.row("Flow type", activity.default_flow_type.clone());
        table.row("Aid type", activity.default_aid_type.clone());
        table.row("Finance type", activity.default_finance_type.clone());
        table.row("Tying status", activity.default_tied_status.clone());
        table.row("Activity status", activity.activity_status.clone());
        table.blank();

        table.section("Participating Organisations");
        table.row("Name", organisation.name.clone());
        table.row("Type", organisation.org_type.clone());
        table.row("Organisation reference code", organisation.reference.clone());
        table.blank();

        table.transactions("Commitments", activity, commitments, currency);
        table.transactions("Disbursements", activity, disbursements, currency);

        if !policy_markers.is_empty() {
            table.section("Policy markers");
            for marker in policy_markers {
                table.row("Description", marker.description.clone());
                table.row(
                    "Significance",
                    marker.significance_label().map(str::to_string),
                );
                table.blank();
            }
        }

        table
    }

    /// Rows with every missing or empty cell shown as "Unknown".
    pub fn render(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell.as_deref() {
                        Some(value) if !value.is_empty() => value.to_string(),
                        _ => UNKNOWN.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Everything the detail page renders.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub project: Activity,
    pub organisation: Organisation,
    pub commitments: Vec<Transaction>,
    pub disbursements: Vec<Transaction>,
    pub policy_markers: Vec<PolicyMarker>,
    pub table: Vec<Vec<String>>,
    pub feed_reference: Option<FeedReference>,
}

impl ProjectDetail {
    /// Fetch a project and everything attached to it. The calls are made
    /// one after another; any failure aborts the page.
    pub async fn load(gateway: &Gateway, id: u64, currency: &CurrencyFormat) -> Result<Self, AppError> {
        let project = gateway.activity(id).await?;
        let organisation = match project.organisation_id.as_deref() {
            Some(org_id) => gateway.organisation(org_id).await?,
            None => Organisation::default(),
        };
        let transactions = gateway.transactions(id).await?;
        let policy_markers = gateway.policy_markers(id).await?;

        Ok(Self::assemble(project, organisation, transactions, policy_markers, currency))
    }

    pub fn assemble(
        project: Activity,
        organisation: Organisation,
        transactions: Vec<Transaction>,
        policy_markers: Vec<PolicyMarker>,
        currency: &CurrencyFormat,
    ) -> Self {
        let (commitments, disbursements): (Vec<Transaction>, Vec<Transaction>) =
            transactions.into_iter().partition(Transaction::is_commitment);

        let table = DetailTable::build(
            &project,
            &organisation,
            &commitments,
            &disbursements,
            &policy_markers,
            currency,
        )
        .render();
        let feed_reference = project.identifier.as_deref().and_then(feed_reference);

        Self {
            project,
            organisation,
            commitments,
            disbursements,
            policy_markers,
            table,
            feed_reference,
        }
    }

    /// Title row, description row, a blank line, then the table.
    pub fn to_csv(&self) -> Result<Vec<u8>, AppError> {
        let head = vec![
            vec![self.project.title.clone().unwrap_or_default()],
            vec![self.project.description.clone().unwrap_or_default()],
            Vec::new(),
        ];
        write_csv_rows(head.into_iter().chain(self.table.iter().cloned()))
    }

    /// Attachment name for the CSV export.
    pub fn csv_filename(&self) -> String {
        let title: String = self
            .project
            .title
            .as_deref()
            .unwrap_or("project")
            .chars()
            .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
            .collect();
        format!("{}.csv", title.trim())
    }
}
