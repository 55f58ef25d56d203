//! Scoring run reports with JSON persistence.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::HeaderLayout;
use crate::sheet::TabularSheet;
use crate::KEY_NOT_FOUND;

/// A record of one scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Response file that was scored.
    pub responses: String,
    /// Answer key file used.
    pub keys: String,
    /// Arrangement file used for reordering, if any.
    #[serde(default)]
    pub arrangement: Option<String>,
    /// Row counts.
    pub summary: ScoringSummary,
}

/// Row counts of a scored sheet, overall and per form code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringSummary {
    pub total_rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub per_form: BTreeMap<String, FormSummary>,
}

/// Row counts for a single form code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub rows: usize,
    pub unmatched: usize,
}

impl ScoringSummary {
    /// Count the rows of a scored sheet.
    pub fn from_sheet(scored: &TabularSheet) -> crate::Result<Self> {
        let layout = HeaderLayout::parse(scored.header(), "scored")?;
        let score_index = layout.require_score("scored")?;

        let mut summary = Self::default();
        for row in scored.rows() {
            let unmatched = row.get(score_index).map(String::as_str) == Some(KEY_NOT_FOUND);
            let form = summary
                .per_form
                .entry(layout.form_code_of(row).to_string())
                .or_default();
            form.rows += 1;
            summary.total_rows += 1;
            if unmatched {
                form.unmatched += 1;
                summary.unmatched += 1;
            } else {
                summary.matched += 1;
            }
        }
        Ok(summary)
    }
}

impl ScoringReport {
    /// Build a report for a freshly scored sheet.
    pub fn new(
        responses: impl Into<String>,
        keys: impl Into<String>,
        arrangement: Option<String>,
        scored: &TabularSheet,
    ) -> crate::Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            responses: responses.into(),
            keys: keys.into(),
            arrangement,
            summary: ScoringSummary::from_sheet(scored)?,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}
