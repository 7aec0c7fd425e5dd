//! Incident, agent action and dashboard statistics records.
//!
//! These are plain data carried as event payloads and published to the
//! presentation sink. They serialize in the camelCase shape the dashboard
//! front end consumes.

use std::fmt;

use serde::Serialize;

use reel_core::TickId;

/// How urgent an incident is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Customer-facing outage or security event.
    Critical,
    /// Degradation that needs attention.
    Warning,
    /// Informational.
    Info,
    /// Already resolved.
    Resolved,
}

/// Progress of an incident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    /// Detected, no agent has acted yet.
    Open,
    /// At least one agent action has been recorded.
    Investigating,
    /// Closed.
    Resolved,
}

/// Outcome of one agent action.
///
/// `Blocked` is a display label, not a control-flow failure: a blocked
/// action is recorded and counted like any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// The tool call succeeded.
    Success,
    /// The tool call failed.
    Failed,
    /// A security policy refused the tool call.
    Blocked,
}

impl ActionStatus {
    /// Tag shown in log lines.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Failed => "FAIL",
            Self::Blocked => "BLOCKED",
        }
    }
}

/// One tool call made by an agent while investigating an incident.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAction {
    /// Action identifier, e.g. `sim-act-001`.
    pub id: String,
    /// Incident the action belongs to.
    pub incident_id: String,
    /// Tool name, e.g. `github-mcp`.
    pub tool: String,
    /// MCP server as `vendor__server`.
    pub mcp_server: String,
    /// What the agent attempted.
    pub action: String,
    /// What came back.
    pub result: String,
    /// Tick the action was recorded.
    pub at: TickId,
    /// Outcome.
    pub status: ActionStatus,
    /// Policy text when `status` is `Blocked`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    /// Tokens spent on the call.
    pub token_cost: u32,
    /// Model that made the call.
    pub model: String,
}

impl AgentAction {
    /// Vendor prefix of the MCP server (text before `__`).
    pub fn vendor(&self) -> &str {
        self.mcp_server
            .split("__")
            .next()
            .unwrap_or(self.mcp_server.as_str())
    }
}

/// Root cause and savings attached once an investigation completes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Root-cause summary.
    pub root_cause: String,
    /// Estimated cost saved, in dollars.
    pub cost_saved: u32,
}

/// An incident card on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Identifier, e.g. `INC-006`.
    pub id: String,
    /// One-line title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Severity.
    pub severity: Severity,
    /// Progress.
    pub status: IncidentStatus,
    /// Alerting system that raised it.
    pub source: String,
    /// Tick the incident was detected. Baseline incidents predate the
    /// run and carry tick zero.
    pub detected_at: TickId,
    /// Tick the incident was closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<TickId>,
    /// Actions recorded so far, oldest first.
    pub agent_actions: Vec<AgentAction>,
    /// Root cause, once identified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    /// Estimated cost saved.
    pub cost_saved: u32,
}

impl Incident {
    /// Whether a root cause has been attached.
    pub fn is_diagnosed(&self) -> bool {
        self.root_cause.is_some()
    }

    /// Attach `resolution`.
    pub fn diagnose(&mut self, resolution: &Resolution) {
        self.root_cause = Some(resolution.root_cause.clone());
        self.cost_saved = resolution.cost_saved;
    }
}

/// Aggregate counters shown in the stat tiles.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Incidents ever seen.
    pub total_incidents: u32,
    /// Incidents still open or under investigation.
    pub active_incidents: u32,
    /// Mean time to resolution, in minutes.
    pub mttr_minutes: f64,
    /// Total estimated cost saved.
    pub cost_saved: u32,
    /// Agent actions ever recorded.
    pub agent_actions: u32,
    /// Actions refused by security policy.
    pub security_blocked: u32,
}

// ── Log ─────────────────────────────────────────────────────────

/// Severity tag of a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No tag.
    Plain,
    /// `[OK]`
    Ok,
    /// `[FAIL]`
    Fail,
    /// `[BLOCKED]`
    Blocked,
}

impl From<ActionStatus> for LogLevel {
    fn from(status: ActionStatus) -> Self {
        match status {
            ActionStatus::Success => Self::Ok,
            ActionStatus::Failed => Self::Fail,
            ActionStatus::Blocked => Self::Blocked,
        }
    }
}

/// One line of the simulation log.
///
/// Displays as `[mm:ss.mmm] [TAG] message`, reading the tick as
/// milliseconds since the run started.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogEntry {
    /// Tick the line was written.
    pub at: TickId,
    /// Tag.
    pub level: LogLevel,
    /// Text after the tag.
    pub message: String,
}

impl LogEntry {
    /// An untagged line.
    pub fn plain(at: TickId, message: impl Into<String>) -> Self {
        Self {
            at,
            level: LogLevel::Plain,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.at.0;
        write!(
            f,
            "[{:02}:{:02}.{:03}] ",
            ms / 60_000,
            (ms / 1_000) % 60,
            ms % 1_000
        )?;
        match self.level {
            LogLevel::Plain => {}
            LogLevel::Ok => f.write_str("[OK] ")?,
            LogLevel::Fail => f.write_str("[FAIL] ")?,
            LogLevel::Blocked => f.write_str("[BLOCKED] ")?,
        }
        f.write_str(&self.message)
    }
}
