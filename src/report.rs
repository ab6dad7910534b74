//! Report data structures and rendering.
//!
//! This module defines the severity-tagged findings produced by the checks,
//! the per-group and aggregate report structures, and the rendering of a
//! finished run into chat-ready context blocks and plain text.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::config::{EXIT_DEFINITION_ERRORS, EXIT_ERRORS, EXIT_WARNINGS};

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Expected state worth reporting (issuer, matching names, validity).
    Info,
    /// Something that needs attention soon (upcoming expiry, extra names).
    Warning,
    /// Something broken (failed validation, expired, name mismatch).
    Error,
}

/// One severity-tagged diagnostic message produced during a check.
///
/// Identity is the message text; duplicates within a group are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// How serious the finding is.
    pub severity: Severity,
    /// Human-readable message, possibly spanning multiple lines.
    pub message: String,
}

impl Finding {
    /// An informational finding.
    pub fn info(message: impl Into<String>) -> Self {
        Finding {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// A warning finding.
    pub fn warning(message: impl Into<String>) -> Self {
        Finding {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// An error finding.
    pub fn error(message: impl Into<String>) -> Self {
        Finding {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Check results for one domain group.
pub struct DomainReport {
    /// Display names of the group members, in specifier order.
    pub display_names: Vec<String>,
    /// Findings with duplicates removed, in first-seen order.
    pub findings: Vec<Finding>,
    /// Earliest leaf expiry observed among the group's members.
    pub earliest_expiry: Option<NaiveDateTime>,
}

impl DomainReport {
    /// Builds a report from raw findings, deduplicating by exact message
    /// text while preserving first-seen order.
    pub fn new(
        display_names: Vec<String>,
        findings: Vec<Finding>,
        earliest_expiry: Option<NaiveDateTime>,
    ) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut deduped = Vec::new();
        for finding in findings {
            if seen.insert(finding.message.clone()) {
                deduped.push(finding);
            }
        }
        DomainReport {
            display_names,
            findings: deduped,
            earliest_expiry,
        }
    }

    fn render_text(&self, verbose: bool) -> String {
        let mut text = format!("\n{}", self.display_names.join(", "));
        for finding in &self.findings {
            if !verbose && finding.severity == Severity::Info {
                continue;
            }
            let indented = finding
                .message
                .split('\n')
                .map(|line| format!("    {}", line))
                .collect::<Vec<_>>()
                .join("\n");
            text.push('\n');
            text.push_str(&indented);
        }
        text
    }
}

/// One element inside a chat context block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockElement {
    /// Element type, always `mrkdwn` here.
    #[serde(rename = "type")]
    pub element_type: String,
    /// Formatted text body.
    pub text: String,
}

/// A chat context block as understood by chat-message renderers.
#[derive(Debug, Clone, Serialize)]
pub struct MessageBlock {
    /// Block type, always `context` here.
    #[serde(rename = "type")]
    pub block_type: String,
    /// The block's text elements.
    pub elements: Vec<BlockElement>,
}

/// The complete result of one checking run.
///
/// Built once per run and handed to a renderer; never persisted.
pub struct AggregateReport {
    /// Per-group reports in input order.
    pub reports: Vec<DomainReport>,
    /// Error findings across all groups, after per-group deduplication.
    pub total_errors: usize,
    /// Warning findings across all groups, after per-group deduplication.
    pub total_warnings: usize,
    /// Specifier strings that failed to parse.
    pub definition_errors: usize,
    /// Earliest leaf expiry across all groups.
    pub earliest_expiration: Option<NaiveDateTime>,
    /// The UTC instant all expiry arithmetic was measured against.
    pub checked_at: NaiveDateTime,
}

impl AggregateReport {
    /// Computes totals and the global earliest expiry from per-group reports.
    pub fn new(
        reports: Vec<DomainReport>,
        definition_errors: usize,
        checked_at: NaiveDateTime,
    ) -> Self {
        let total_errors = reports
            .iter()
            .flat_map(|r| &r.findings)
            .filter(|f| f.severity == Severity::Error)
            .count();
        let total_warnings = reports
            .iter()
            .flat_map(|r| &r.findings)
            .filter(|f| f.severity == Severity::Warning)
            .count();
        let earliest_expiration = reports.iter().filter_map(|r| r.earliest_expiry).min();

        AggregateReport {
            reports,
            total_errors,
            total_warnings,
            definition_errors,
            earliest_expiration,
            checked_at,
        }
    }

    /// The process exit code for this report.
    ///
    /// Definition errors (5) take precedence over error findings (4), which
    /// take precedence over warnings (3). A clean run exits 0.
    pub fn exit_code(&self) -> i32 {
        if self.definition_errors > 0 {
            EXIT_DEFINITION_ERRORS
        } else if self.total_errors > 0 {
            EXIT_ERRORS
        } else if self.total_warnings > 0 {
            EXIT_WARNINGS
        } else {
            0
        }
    }

    fn summary_text(&self) -> String {
        let mut msg = format!(
            "_{} *error(s)*, {} *warning(s)*_",
            self.total_errors, self.total_warnings
        );
        if let Some(earliest) = self.earliest_expiration {
            msg.push_str(&format!(
                "\n_Earliest expiration on_ *{} ({}).*",
                earliest,
                format_timedelta(earliest - self.checked_at)
            ));
        }
        msg
    }

    /// Renders the run as a single chat context block: one mrkdwn element
    /// per domain group followed by a summary element.
    ///
    /// Info findings are omitted unless `verbose` is set; counts are not
    /// affected by the flag.
    pub fn blocks(&self, verbose: bool) -> Vec<MessageBlock> {
        let mut elements: Vec<BlockElement> = self
            .reports
            .iter()
            .map(|r| BlockElement {
                element_type: "mrkdwn".to_string(),
                text: r.render_text(verbose),
            })
            .collect();
        elements.push(BlockElement {
            element_type: "mrkdwn".to_string(),
            text: self.summary_text(),
        });

        vec![MessageBlock {
            block_type: "context".to_string(),
            elements,
        }]
    }

    /// Renders the run as plain text for terminal output.
    pub fn render_text(&self, verbose: bool) -> String {
        let mut parts: Vec<String> = self
            .reports
            .iter()
            .map(|r| r.render_text(verbose))
            .collect();
        parts.push(format!("\n{}", self.summary_text()));
        parts.join("\n")
    }
}

/// Formats a duration the way the report messages expect: `H:MM:SS`
/// prefixed with a day count when one is present, negative durations
/// normalized so the seconds part stays positive (`-1 day, 23:59:59` for
/// minus one second).
pub(crate) fn format_timedelta(delta: Duration) -> String {
    let total = delta.num_seconds();
    let days = total.div_euclid(86_400);
    let secs = total.rem_euclid(86_400);
    let hours = secs / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    let clock = format!("{}:{:02}:{:02}", hours, minutes, seconds);
    if days != 0 {
        let plural = if days.abs() != 1 { "s" } else { "" };
        format!("{} day{}, {}", days, plural, clock)
    } else {
        clock
    }
}
