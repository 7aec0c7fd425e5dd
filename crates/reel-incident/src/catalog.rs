//! Canned incidents: the baseline dashboard and the simulated scenarios.
//!
//! Each [`Scenario`] carries the incident, its scripted agent actions and
//! the [`Resolution`] attached when the investigation completes, so the
//! simulation never special-cases incident ids.

use indexmap::IndexMap;

use reel_core::TickId;

use crate::model::{
    ActionStatus, AgentAction, DashboardStats, Incident, IncidentStatus, Resolution, Severity,
};

/// One scripted incident.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    /// Template inserted when the scenario triggers.
    pub incident: Incident,
    /// Actions recorded one by one after the trigger.
    pub actions: Vec<AgentAction>,
    /// Attached after the last action.
    pub resolution: Resolution,
}

/// Baseline dashboard contents plus the ordered simulation scenarios.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    /// Incidents shown before the simulation starts, newest first.
    pub baseline: Vec<Incident>,
    /// Stat tiles before the simulation starts.
    pub stats: DashboardStats,
    /// Scenarios keyed by incident id, in trigger order.
    pub scenarios: IndexMap<String, Scenario>,
}

impl Catalog {
    /// The stock dashboard: five baseline incidents and three scenarios.
    pub fn canned() -> Self {
        let scenarios = simulated()
            .into_iter()
            .map(|s| (s.incident.id.clone(), s))
            .collect();
        Self {
            baseline: baseline_incidents(),
            stats: baseline_stats(),
            scenarios,
        }
    }

    /// Scenario at trigger position `index`.
    pub fn scenario(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get_index(index).map(|(_, s)| s)
    }

    /// Number of scenarios.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether there are no scenarios.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::canned()
    }
}

// ── Builders ────────────────────────────────────────────────────

fn incident(
    id: &str,
    title: &str,
    description: &str,
    severity: Severity,
    status: IncidentStatus,
    source: &str,
) -> Incident {
    Incident {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        severity,
        status,
        source: source.into(),
        detected_at: TickId::ZERO,
        resolved_at: None,
        agent_actions: Vec::new(),
        root_cause: None,
        cost_saved: 0,
    }
}

/// `tool` is derived from the server name after `__`.
fn action(
    id: &str,
    incident_id: &str,
    mcp_server: &str,
    action: &str,
    result: &str,
    token_cost: u32,
) -> AgentAction {
    let tool = mcp_server.rsplit("__").next().unwrap_or(mcp_server);
    AgentAction {
        id: id.into(),
        incident_id: incident_id.into(),
        tool: tool.into(),
        mcp_server: mcp_server.into(),
        action: action.into(),
        result: result.into(),
        at: TickId::ZERO,
        status: ActionStatus::Success,
        blocked_reason: None,
        token_cost,
        model: "gpt-4o-mini".into(),
    }
}

fn blocked(mut a: AgentAction, reason: &str, model: &str) -> AgentAction {
    a.status = ActionStatus::Blocked;
    a.blocked_reason = Some(reason.into());
    a.model = model.into();
    a
}

fn resolution(root_cause: &str, cost_saved: u32) -> Resolution {
    Resolution {
        root_cause: root_cause.into(),
        cost_saved,
    }
}

const PLAYWRIGHT: &str = "microsoft__playwright-mcp";
const GITHUB: &str = "github__github-mcp";
const SLACK: &str = "slack__slack-mcp";

// ── Baseline ────────────────────────────────────────────────────

/// Stat tiles before any simulated incident.
pub fn baseline_stats() -> DashboardStats {
    DashboardStats {
        total_incidents: 147,
        active_incidents: 3,
        mttr_minutes: 4.2,
        cost_saved: 12_840,
        agent_actions: 1_283,
        security_blocked: 23,
    }
}

/// The five incidents already on the dashboard.
pub fn baseline_incidents() -> Vec<Incident> {
    let mut inc001 = incident(
        "INC-001",
        "Database Connection Pool Exhaustion",
        "PostgreSQL connection pool reached 95% capacity causing request timeouts on /api/users endpoint",
        Severity::Critical,
        IncidentStatus::Investigating,
        "Prometheus Alert",
    );
    inc001.agent_actions = vec![
        action(
            "act-001",
            "INC-001",
            PLAYWRIGHT,
            "Scraped Grafana dashboard for connection pool metrics",
            "Connection pool at 95% (190/200). Spike started 10:15 UTC. Correlates with deployment v2.4.1",
            1_250,
        ),
        action(
            "act-002",
            "INC-001",
            GITHUB,
            "Checked recent deployments and PRs merged in last 2 hours",
            "Found PR #847 \"Add user analytics tracking\" merged 10:12 UTC - adds N+1 query pattern in UserService.getAnalytics()",
            890,
        ),
        action(
            "act-003",
            "INC-001",
            SLACK,
            "Notified #oncall-backend channel with root cause analysis",
            "Message sent to #oncall-backend: 🔴 INC-001 | DB pool exhaustion caused by N+1 query in PR #847. Suggested: revert or add eager loading.",
            340,
        ),
        blocked(
            action(
                "act-004",
                "INC-001",
                GITHUB,
                "Attempted to create revert PR for #847",
                "Blocked by security sub-agent: Requires human approval for production code changes",
                120,
            ),
            "Security policy: Production code modifications require human approval",
            "claude-opus-4.6",
        ),
    ];
    inc001.diagnose(&resolution(
        "N+1 query pattern introduced in PR #847 (User Analytics Tracking) causing connection pool exhaustion",
        2_400,
    ));

    let mut inc002 = incident(
        "INC-002",
        "SSL Certificate Expiring in 48 Hours",
        "TLS certificate for api.production.com expires Feb 16, 2026. Auto-renewal failed due to DNS validation issue.",
        Severity::Warning,
        IncidentStatus::Investigating,
        "CertBot Monitor",
    );
    inc002.agent_actions = vec![
        action(
            "act-005",
            "INC-002",
            PLAYWRIGHT,
            "Checked SSL Labs report for api.production.com",
            "Certificate valid until Feb 16 2026 03:00 UTC. Grade B. Auto-renewal log shows DNS-01 challenge failing - CNAME record missing.",
            980,
        ),
        action(
            "act-006",
            "INC-002",
            SLACK,
            "Notified #platform-team with details and fix steps",
            "Message sent with DNS fix instructions: Add CNAME _acme-challenge.api.production.com → validation.letsencrypt.org",
            290,
        ),
    ];
    inc002.cost_saved = 800;

    let mut inc003 = incident(
        "INC-003",
        "Memory Leak in Worker Service",
        "Worker-service pods OOMKilled 3 times in the last hour. Memory usage growing linearly at ~50MB/min.",
        Severity::Critical,
        IncidentStatus::Open,
        "Kubernetes Event",
    );
    inc003.agent_actions = vec![
        action(
            "act-007",
            "INC-003",
            PLAYWRIGHT,
            "Scraped Kubernetes dashboard for pod restart events",
            "worker-service-7f8d9 OOMKilled 3x. Memory limit: 512Mi. Current: 498Mi. Linear growth pattern detected.",
            1_100,
        ),
        action(
            "act-008",
            "INC-003",
            GITHUB,
            "Searched for recent changes to worker-service in last 24h",
            "PR #851 \"Add Redis caching layer\" merged 6h ago. Redis client not properly releasing connections - missing client.quit() in finally block.",
            920,
        ),
    ];
    inc003.diagnose(&resolution(
        "Redis client connection leak in PR #851 - missing client.quit() in error handling path",
        1_600,
    ));

    let mut inc004 = incident(
        "INC-004",
        "Elevated 5xx Error Rate on API Gateway",
        "5xx error rate jumped from 0.1% to 2.3% in the last 15 minutes",
        Severity::Warning,
        IncidentStatus::Resolved,
        "Datadog Alert",
    );
    inc004.resolved_at = Some(TickId::ZERO);
    inc004.agent_actions = vec![
        action(
            "act-009",
            "INC-004",
            PLAYWRIGHT,
            "Checked Datadog APM for error distribution",
            "Errors concentrated in /api/payments endpoint. Upstream payment-service returning 503.",
            850,
        ),
        action(
            "act-010",
            "INC-004",
            SLACK,
            "Checked #incidents channel for related reports",
            "Found message from payment provider: Scheduled maintenance 06:15-07:00 UTC. Expected behavior.",
            310,
        ),
    ];
    inc004.diagnose(&resolution(
        "Upstream payment provider scheduled maintenance (06:15-07:00 UTC)",
        400,
    ));

    let mut inc005 = incident(
        "INC-005",
        "Disk Usage Above 85% on Log Storage",
        "EBS volume /dev/xvdf on log-aggregator-01 at 87% capacity",
        Severity::Info,
        IncidentStatus::Resolved,
        "CloudWatch Alarm",
    );
    inc005.resolved_at = Some(TickId::ZERO);
    inc005.agent_actions = vec![
        action(
            "act-011",
            "INC-005",
            PLAYWRIGHT,
            "Checked AWS CloudWatch disk metrics trend",
            "Growing at 2%/day. 7 days until full. Retention policy: 90 days. Oldest logs: 120 days.",
            760,
        ),
        action(
            "act-012",
            "INC-005",
            SLACK,
            "Suggested log rotation fix to #platform-team",
            "Recommended: purge logs > 90 days (saves ~25GB), implement logrotate with 30-day max.",
            280,
        ),
    ];
    inc005.diagnose(&resolution(
        "Log retention policy not enforced - logs older than 90 days not being purged",
        300,
    ));

    vec![inc001, inc002, inc003, inc004, inc005]
}

// ── Simulated ───────────────────────────────────────────────────

fn simulated() -> Vec<Scenario> {
    vec![
        Scenario {
            incident: incident(
                "INC-006",
                "Redis Cluster Failover Detected",
                "Primary Redis node redis-cluster-01 unresponsive. Sentinel initiated automatic failover to replica redis-cluster-02.",
                Severity::Critical,
                IncidentStatus::Open,
                "Redis Sentinel",
            ),
            actions: vec![
                action(
                    "sim-act-001",
                    "INC-006",
                    PLAYWRIGHT,
                    "Checking Redis cluster dashboard for node health status",
                    "redis-cluster-01 marked as ODOWN by 3/3 sentinels. Failover to redis-cluster-02 completed at 11:52 UTC. 340ms downtime.",
                    1_050,
                ),
                action(
                    "sim-act-002",
                    "INC-006",
                    GITHUB,
                    "Checking for recent Redis config changes",
                    "PR #863 \"Increase Redis maxmemory to 8GB\" merged 45min ago. Config change triggered OOM on redis-cluster-01 (host only has 6GB RAM).",
                    780,
                ),
                action(
                    "sim-act-003",
                    "INC-006",
                    SLACK,
                    "Notifying #database-team with root cause and fix",
                    "Sent alert: \"Redis failover caused by maxmemory > host RAM in PR #863. Reduce maxmemory to 4GB or upgrade host to 8GB+ RAM.\"",
                    290,
                ),
            ],
            resolution: resolution(
                "Redis maxmemory configured higher than host RAM in PR #863",
                1_800,
            ),
        },
        Scenario {
            incident: incident(
                "INC-007",
                "CDN Cache Hit Ratio Dropped Below 70%",
                "CloudFront cache hit ratio dropped from 94% to 67% in the last 10 minutes. Origin server load increasing.",
                Severity::Warning,
                IncidentStatus::Open,
                "CloudWatch Alarm",
            ),
            actions: vec![
                action(
                    "sim-act-004",
                    "INC-007",
                    PLAYWRIGHT,
                    "Analyzing CloudFront distribution cache behavior",
                    "Cache miss spike on /api/v2/* endpoints. New query string parameter `_t` added in frontend v3.2.1 is busting cache for every request.",
                    920,
                ),
                action(
                    "sim-act-005",
                    "INC-007",
                    GITHUB,
                    "Searching for cache-busting parameter in recent frontend deploys",
                    "Found in PR #859: Added timestamp query param for \"cache busting during dev\". Should have been removed before merge.",
                    670,
                ),
            ],
            resolution: resolution(
                "Cache-busting timestamp query param left in production build from PR #859",
                1_800,
            ),
        },
        Scenario {
            incident: incident(
                "INC-008",
                "Anomalous Login Pattern Detected",
                "Auth service logged 2,400 failed login attempts from 15 IPs in 5 minutes. Possible credential stuffing attack.",
                Severity::Critical,
                IncidentStatus::Open,
                "WAF Alert",
            ),
            actions: vec![
                action(
                    "sim-act-006",
                    "INC-008",
                    PLAYWRIGHT,
                    "Scraping WAF dashboard for attack pattern analysis",
                    "2,400 POST /auth/login requests from 15 IPs across 3 ASNs (AS14061, AS16509, AS13335). Credential pairs from known breach database.",
                    1_180,
                ),
                action(
                    "sim-act-007",
                    "INC-008",
                    SLACK,
                    "Alerting #security-team with IP list and attack details",
                    "CRITICAL alert sent to #security-team with 15 attacker IPs. Recommended: enable rate limiting on /auth/login, block ASNs temporarily.",
                    410,
                ),
                blocked(
                    action(
                        "sim-act-008",
                        "INC-008",
                        GITHUB,
                        "Attempted to push WAF rule update to block attacker IPs",
                        "BLOCKED: Security Guardian denied automatic WAF rule modification. Requires security team approval.",
                        150,
                    ),
                    "Security policy: WAF/firewall rule modifications require human approval from security team",
                    "claude-opus-4.6",
                ),
            ],
            resolution: resolution(
                "Credential stuffing attack using leaked database credentials",
                5_200,
            ),
        },
    ]
}
