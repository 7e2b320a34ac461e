//! CSV sheets shared by the stats and workbook reports.

use crate::core::analysis::{share, EpicBreakdown, Work};
use crate::domain::model::Sprint;
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Planned,
    Delivered,
}

impl Measure {
    pub fn of(self, work: &Work) -> f64 {
        match self {
            Measure::Planned => work.planned,
            Measure::Delivered => work.delivered,
        }
    }
}

/// Sprint name made safe for use in a file name.
pub fn file_stem(sprint_name: &str) -> String {
    sprint_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

pub fn format_points(points: f64) -> String {
    format!("{}", points)
}

pub fn format_share(value: f64) -> String {
    format!("{:.4}", value)
}

pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn to_csv(rows: Vec<Vec<String>>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::IoError(e.into_error()))
}

/// `Epic name,Story Points,Percentage` for epics with a non-zero `measure`.
pub fn epics_sheet(breakdown: &EpicBreakdown, measure: Measure) -> Result<Vec<u8>> {
    let total = measure.of(&breakdown.totals);
    let mut rows = vec![vec![
        "Epic name".to_string(),
        "Story Points".to_string(),
        "Percentage".to_string(),
    ]];

    for (name, entry) in &breakdown.epics {
        let points = measure.of(&entry.work);
        if points > 0.0 {
            rows.push(vec![
                name.clone(),
                format_points(points),
                format_share(share(points, total)),
            ]);
        }
    }

    to_csv(rows)
}

/// `Sprint,From,To,Total,<column…>` with one row per measure.
pub fn velocity_sheet(
    sprint: &Sprint,
    totals: &Work,
    columns: &BTreeMap<String, Work>,
    measures: &[Measure],
) -> Result<Vec<u8>> {
    let mut header = vec![
        "Sprint".to_string(),
        "From".to_string(),
        "To".to_string(),
        "Total".to_string(),
    ];
    header.extend(columns.keys().cloned());

    let mut rows = vec![header];
    for measure in measures {
        let mut row = vec![
            sprint.name.clone(),
            format_date(sprint.start_date),
            format_date(sprint.end_date),
            format_points(measure.of(totals)),
        ];
        row.extend(columns.values().map(|work| format_points(measure.of(work))));
        rows.push(row);
    }

    to_csv(rows)
}

/// `Epic name,Epic link,Issue link`, one row per sprint issue.
pub fn epic_issues_sheet(breakdown: &EpicBreakdown) -> Result<Vec<u8>> {
    let mut rows = vec![vec![
        "Epic name".to_string(),
        "Epic link".to_string(),
        "Issue link".to_string(),
    ]];

    for (name, entry) in &breakdown.epics {
        for issue_link in &entry.issue_links {
            rows.push(vec![name.clone(), entry.link.clone(), issue_link.clone()]);
        }
    }

    to_csv(rows)
}
