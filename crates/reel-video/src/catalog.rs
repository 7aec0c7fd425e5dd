//! The eleven scenes of the DevOps Copilot demo video.
//!
//! Each scene is a [`SceneSpec`] built from element presets shared across
//! scenes: headings rise on a soft spring, cards grow into place, boxes
//! in the architecture diagram pop on a heavier spring. Delays are in
//! scene-local frames; they do not change when a plan moves a scene.

use reel_anim::{InterpolationWindow, SpringConfig};
use reel_core::AnimError;

use crate::config::VideoConfigError;
use crate::element::{Ease, ElementSpec, Motion, Rgb, Tint};
use crate::scene::SceneSpec;

/// Scene names in play order.
pub const SCENE_NAMES: [&str; 11] = [
    "Title",
    "Problem",
    "Architecture",
    "Archestra",
    "Dashboard",
    "ChatDemo",
    "IncidentDemo",
    "Security",
    "Cost",
    "Features",
    "Outro",
];

/// Whether `name` is a catalog scene.
pub fn is_known(name: &str) -> bool {
    SCENE_NAMES.contains(&name)
}

/// Build the element tree of the scene called `name`.
///
/// # Errors
///
/// [`VideoConfigError::UnknownScene`] for a name outside
/// [`SCENE_NAMES`].
pub fn build(name: &str) -> Result<SceneSpec, VideoConfigError> {
    let p = Presets::new()?;
    let elements = match name {
        "Title" => title(&p),
        "Problem" => problem(&p)?,
        "Architecture" => architecture(&p),
        "Archestra" => archestra(&p),
        "Dashboard" => dashboard(&p)?,
        "ChatDemo" => chat_demo(&p),
        "IncidentDemo" => incident_demo(&p),
        "Security" => security(&p)?,
        "Cost" => cost(&p)?,
        "Features" => features(&p),
        "Outro" => outro(&p),
        _ => {
            return Err(VideoConfigError::UnknownScene {
                name: name.to_string(),
            })
        }
    };
    Ok(SceneSpec::new(name, elements))
}

// ── Palette ─────────────────────────────────────────────────────

const RED: Rgb = Rgb::hex(0xf87171);
const AMBER: Rgb = Rgb::hex(0xfbbf24);
const VIOLET: Rgb = Rgb::hex(0x7c3aed);
const EMERALD: Rgb = Rgb::hex(0x34d399);
const CYAN: Rgb = Rgb::hex(0x22d3ee);
const BLUE: Rgb = Rgb::hex(0x60a5fa);
const MUTED: Rgb = Rgb::hex(0xa1a1aa);
const TEXT: Rgb = Rgb::hex(0xfafafa);
const BLACK: Rgb = Rgb::hex(0x000000);

// ── Presets ─────────────────────────────────────────────────────

struct Presets {
    heading: SpringConfig,
    card: SpringConfig,
    boxed: SpringConfig,
    step: SpringConfig,
    browser: SpringConfig,
    alert: SpringConfig,
    block: SpringConfig,
    shield: SpringConfig,
}

impl Presets {
    fn new() -> Result<Self, AnimError> {
        Ok(Self {
            heading: SpringConfig::new(20.0, 100.0, 0.5)?,
            card: SpringConfig::new(12.0, 100.0, 0.5)?,
            boxed: SpringConfig::new(15.0, 80.0, 0.6)?,
            step: SpringConfig::new(15.0, 80.0, 0.5)?,
            browser: SpringConfig::new(18.0, 80.0, 0.7)?,
            alert: SpringConfig::new(10.0, 120.0, 0.5)?,
            block: SpringConfig::new(8.0, 150.0, 0.5)?,
            shield: SpringConfig::new(12.0, 80.0, 0.8)?,
        })
    }

    /// Rising text line.
    fn line(&self, label: &str, text: &str, delay: i64) -> ElementSpec {
        ElementSpec::text(text)
            .named(label)
            .at(delay)
            .fade(20)
            .with_motion(Motion::rise(Ease::Spring(self.heading), 40.0))
    }

    /// Text line that fades without moving.
    fn still(&self, label: &str, text: &str, delay: i64) -> ElementSpec {
        ElementSpec::text(text).named(label).at(delay).fade(20)
    }

    /// Card that rises and grows.
    fn card(&self, title: &str, delay: i64) -> ElementSpec {
        ElementSpec::panel(title)
            .named(title)
            .at(delay)
            .fade(12)
            .with_motion(Motion::rise(Ease::Spring(self.card), 60.0).scaled_from(0.85))
    }

    /// Architecture box.
    fn boxed(&self, title: &str, delay: i64, color: Rgb) -> ElementSpec {
        ElementSpec::panel(title)
            .named(title)
            .at(delay)
            .fade(12)
            .with_motion(Motion::grow(Ease::Spring(self.boxed), 0.8))
            .with_tint(Tint::solid(color))
    }

    /// Architecture container outline.
    fn container(&self, title: &str, delay: i64, color: Rgb) -> ElementSpec {
        ElementSpec::panel(title)
            .named(title)
            .at(delay)
            .fade(12)
            .with_motion(Motion::grow(Ease::Spring(self.boxed), 0.97))
            .with_tint(Tint::solid(color))
    }

    /// Glow wrapped around a line of text, both starting together.
    fn glowing(&self, label: &str, text: &str, delay: i64, color: Rgb) -> ElementSpec {
        ElementSpec::group(vec![
            ElementSpec::glow(30).named("halo").with_tint(Tint::solid(color)),
            self.line("text", text, 0),
        ])
        .named(label)
        .at(delay)
        .fade(15)
    }
}

fn arrow(delay: i64, color: Rgb) -> ElementSpec {
    ElementSpec::arrow(20)
        .named("arrow")
        .at(delay)
        .fade(1)
        .with_tint(Tint::solid(color))
}

fn linear(over: u64) -> Ease {
    Ease::Linear { over }
}

// ── Scenes ──────────────────────────────────────────────────────

fn title(p: &Presets) -> Vec<ElementSpec> {
    vec![
        p.glowing("logo", "DevOps Copilot", 5, VIOLET),
        p.line("subtitle", "Autonomous Incident Response with MCP Agents", 20),
        p.still("event", "2 Fast 2 MCP Hackathon", 40)
            .with_tint(Tint::solid(MUTED)),
    ]
}

fn problem(p: &Presets) -> Result<Vec<ElementSpec>, AnimError> {
    let manual = InterpolationWindow::linear(10.0, 70.0, 0.0, 70.0)?;
    let mut elements = vec![
        p.line("heading", "The Problem", 0),
        ElementSpec::group(vec![
            ElementSpec::glow(30)
                .named("halo")
                .at(5)
                .with_tint(Tint::solid(RED)),
            ElementSpec::counter(manual, "%").named("manual-share"),
        ])
        .named("stat")
        .at(10)
        .fade(15),
        p.line("caption", "of incident response time is manual triage", 40),
    ];
    let pains = [
        ("Alert Fatigue", "Teams overwhelmed by noise"),
        ("Slow MTTR", "Hours spent on manual triage"),
        ("Context Switching", "Jumping between 10+ tools"),
    ];
    for (i, (title, detail)) in pains.into_iter().enumerate() {
        elements.push(
            ElementSpec::panel(title)
                .detail(detail)
                .named(title)
                .at(90 + 30 * i as i64)
                .fade(15)
                .with_motion(Motion::rise(linear(20), 30.0)),
        );
    }
    Ok(elements)
}

fn architecture(p: &Presets) -> Vec<ElementSpec> {
    let boxes = vec![
        p.container("Archestra Platform", 5, VIOLET),
        p.container("MCP Orchestrator (K8s)", 18, CYAN),
        p.container("Agent Pipeline", 55, EMERALD),
        p.boxed("DevOps Copilot Dashboard", 0, BLUE)
            .detail("Next.js · Real-time · Observability"),
        p.boxed("Playwright MCP", 28, CYAN).detail("Browser Automation"),
        p.boxed("GitHub MCP", 32, CYAN).detail("Code & PR Analysis"),
        p.boxed("Slack MCP", 36, CYAN).detail("Team Notifications"),
        p.boxed("Alert", 60, RED),
        p.boxed("Triage Agent", 62, EMERALD).detail("gpt-4o-mini"),
        p.boxed("Root Cause Agent", 65, EMERALD).detail("claude-opus-4.6"),
        p.boxed("Notification", 72, EMERALD),
        p.boxed("Security Guardian", 78, AMBER)
            .detail("Dual-LLM Safety Gate · claude-opus-4.6"),
        p.boxed("Cost Controls", 88, EMERALD),
        p.boxed("Observability", 91, CYAN),
        p.boxed("Security Policies", 94, AMBER),
        p.boxed("Model Routing", 97, VIOLET),
        p.boxed("Grafana / Datadog / K8s", 100, MUTED),
        p.boxed("GitHub Repos & PRs", 103, MUTED),
        p.boxed("Slack Channels", 106, MUTED),
    ];
    let arrows = [
        (8, BLUE),
        (48, CYAN),
        (50, CYAN),
        (52, CYAN),
        (64, EMERALD),
        (68, EMERALD),
        (72, EMERALD),
        (78, AMBER),
        (100, MUTED),
        (103, MUTED),
        (106, MUTED),
    ];

    let mut elements = vec![
        p.line("heading", "Architecture", 0).with_tint(Tint::solid(VIOLET)),
        p.line("subtitle", "Multi-Agent MCP Architecture", 8),
    ];
    let diagram: Vec<ElementSpec> = boxes
        .into_iter()
        .chain(arrows.into_iter().map(|(d, c)| arrow(d, c)))
        .collect();
    elements.push(ElementSpec::group(diagram).named("diagram").fade(0));
    elements
}

fn archestra(p: &Presets) -> Vec<ElementSpec> {
    let components: [(&str, i64, Rgb, [(&str, &str); 3]); 3] = [
        (
            "AI Agents",
            30,
            EMERALD,
            [
                (
                    "Incident Triage Agent",
                    "gpt-4o-mini · Playwright MCP, Slack MCP",
                ),
                (
                    "Root Cause Analyzer",
                    "claude-opus-4.6 · GitHub MCP, Playwright MCP",
                ),
                (
                    "Security Guardian",
                    "claude-opus-4.6 · None (validation only)",
                ),
            ],
        ),
        (
            "MCP Servers",
            100,
            CYAN,
            [
                (
                    "Playwright MCP",
                    "Browser automation · Scrape Grafana, Datadog, K8s",
                ),
                (
                    "GitHub MCP",
                    "Code analysis · PR correlation & deployment checks",
                ),
                (
                    "Slack MCP",
                    "Team comms · On-call alerts & resolution updates",
                ),
            ],
        ),
        (
            "Platform Features",
            170,
            VIOLET,
            [
                (
                    "MCP Orchestrator",
                    "K8s-native MCP server deployment & lifecycle",
                ),
                ("MCP Registry", "Centralized management of all MCP configs"),
                ("RBAC", "Role-based access control for agent permissions"),
            ],
        ),
    ];
    let features = [
        ("Security Sub-Agents", "Dual-LLM validation on every action", 250),
        (
            "Full Observability",
            "Token costs, latency, success rates per agent",
            270,
        ),
        ("Cost Optimization", "Smart model routing · $10/day budget cap", 290),
        ("Graceful Fallback", "Archestra → Gemini → Mock demo mode", 310),
    ];

    let mut elements = vec![
        p.still("kicker", "Powered by", 0),
        p.glowing("brand", "Archestra", 5, VIOLET),
        p.line("subtitle", "The AI Infrastructure We Built On", 12),
    ];
    for (category, delay, color, items) in components {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(i, (name, detail))| {
                ElementSpec::panel(name)
                    .detail(detail)
                    .named(name)
                    .at(15 + 12 * i as i64)
                    .fade(12)
            })
            .collect();
        elements.push(
            ElementSpec::group(items)
                .named(category)
                .at(delay)
                .fade(20)
                .with_motion(Motion::rise(linear(25), 40.0))
                .with_tint(Tint::solid(color)),
        );
    }
    for (label, desc, delay) in features {
        elements.push(
            ElementSpec::panel(label)
                .detail(desc)
                .named(label)
                .at(delay)
                .fade(15)
                .with_motion(Motion::grow(linear(20), 0.85)),
        );
    }
    elements
}

fn dashboard(p: &Presets) -> Result<Vec<ElementSpec>, AnimError> {
    const URL: &str = "devops-copilot-six.vercel.app";
    let scroll = InterpolationWindow::new(&[75.0, 275.0, 495.0, 695.0], &[0.0, 600.0, 1200.0, 1800.0])?;
    let url_rate = URL.chars().count() as f64 / 35.0;

    let mut elements = vec![
        p.line("heading", "Live Dashboard", 0).with_tint(Tint::solid(BLUE)),
        ElementSpec::group(vec![
            ElementSpec::typed(URL, url_rate).named("url").at(10).fade(0),
            ElementSpec::cursor(8, 40).named("caret").at(10).fade(0),
            ElementSpec::counter(scroll, "px").named("scroll").fade(0),
        ])
        .named("browser")
        .at(5)
        .fade(20)
        .with_motion(Motion::grow(Ease::Spring(p.browser), 0.92)),
    ];
    let callouts = [
        ("6 Real-Time KPI Cards", 60),
        ("Live Incident Charts", 90),
        ("Active Agent Monitoring", 120),
        ("Incident Cards with Agent Logs", 150),
    ];
    for (label, delay) in callouts {
        elements.push(
            ElementSpec::panel(label)
                .named(label)
                .at(delay)
                .fade(12)
                .with_motion(Motion::slide(linear(12), 30.0)),
        );
    }
    Ok(elements)
}

fn chat_demo(p: &Presets) -> Vec<ElementSpec> {
    const ANSWER: &str = "**Latest Deployment Analysis:**\n\n\
        PR #847 'Add user analytics tracking' was merged at 10:12 UTC.\n\n\
        **Issue detected:** Database connection pool hit 95% capacity within 8 minutes of deployment.\n\n\
        **Root Cause:** N+1 query pattern found in `UserService.getAnalytics()` — each user page view triggers 15+ separate DB queries.\n\n\
        **Status:** Triage Agent flagged it as Critical. On-call team notified via Slack.\n\n\
        **Recommendation:** Add eager loading or revert PR #847.";
    const REFUSAL: &str = "**Security Guardian blocked** the auto-revert request.\n\n\
        Production code changes require **human approval** per our security policy. \
        The on-call engineer has been notified in #oncall-backend with the full context and recommended fix.\n\n\
        Cost so far: 2,600 tokens ($0.004) — ~25 min of manual investigation saved.";

    let messages = [
        (
            "question",
            "What happened with the latest deployment? Any issues?",
            40,
            false,
        ),
        ("analysis", ANSWER, 100, true),
        ("follow-up", "Can the agent auto-revert that PR?", 310, false),
        ("refusal", REFUSAL, 370, true),
    ];

    let mut elements = vec![
        p.line("kicker", "AI Chat Assistant", 0).with_tint(Tint::solid(VIOLET)),
        p.line("heading", "Ask anything about your infrastructure", 8),
        p.still(
            "description",
            "Powered by Archestra's A2A protocol, the chat connects directly to your AI agents for real-time incident investigation.",
            18,
        )
        .with_tint(Tint::solid(MUTED)),
    ];
    let bullets = [
        ("Real-time agent communication", 40),
        ("Markdown-rich responses", 50),
        ("MCP tool usage transparency", 60),
    ];
    for (text, delay) in bullets {
        elements.push(
            ElementSpec::text(text)
                .named(text)
                .at(delay)
                .fade(12)
                .with_motion(Motion::slide(linear(12), -20.0)),
        );
    }

    let bubble = Ease::Spring(p.heading);
    let mut thread = Vec::new();
    for (label, text, delay, assistant) in messages {
        let body = if assistant {
            ElementSpec::typed(text, 1.5).at(10).fade(0)
        } else {
            ElementSpec::text(text).fade(0)
        };
        let author = if assistant { "Copilot" } else { "You" };
        thread.push(
            ElementSpec::group(vec![
                ElementSpec::text(author).named("author").fade(0),
                body.named("body"),
            ])
            .named(label)
            .at(delay)
            .fade(10)
            .with_motion(Motion::rise(bubble, 20.0)),
        );
    }
    elements.push(
        ElementSpec::group(thread)
            .named("chat")
            .fade(15)
            .with_motion(Motion::slide(Ease::Spring(p.browser), 100.0)),
    );
    elements
}

fn incident_demo(p: &Presets) -> Vec<ElementSpec> {
    let steps = [
        (
            "Scanning Grafana dashboard...",
            "Connection pool at 98% capacity - critical threshold",
        ),
        (
            "Checking recent deployments on GitHub...",
            "PR #847 merged 23 min ago - query optimization changes",
        ),
        (
            "Analyzing code changes...",
            "N+1 query pattern identified in UserService.getAll()",
        ),
        (
            "Correlating with metrics...",
            "Latency spike correlates exactly with deployment timestamp",
        ),
        (
            "Notifying on-call team via Slack...",
            "Alert sent to #incidents - @oncall team notified",
        ),
    ];
    let last = steps.len() - 1;
    let timeline = steps
        .into_iter()
        .enumerate()
        .map(|(i, (label, result))| {
            let mut children = vec![ElementSpec::text(result)
                .named("result")
                .at(20)
                .with_tint(Tint::solid(EMERALD))];
            if i < last {
                children.push(ElementSpec::arrow(15).named("connector").at(15).fade(1));
            }
            ElementSpec::group(children)
                .named(label)
                .at(50 + 30 * i as i64)
                .fade(10)
                .with_motion(Motion::slide(Ease::Spring(p.step), -30.0))
        })
        .collect();

    vec![
        p.line("heading", "Live Incident Response", 0),
        ElementSpec::panel("Database Connection Pool Exhaustion")
            .detail("Critical Alert")
            .named("alert")
            .at(5)
            .fade(10)
            .with_motion(Motion::grow(Ease::Spring(p.alert), 0.9))
            .with_tint(Tint::solid(RED)),
        ElementSpec::text("Incident Triage Agent activated")
            .named("agent")
            .at(30)
            .fade(12)
            .with_tint(Tint::solid(EMERALD)),
        ElementSpec::group(timeline).named("timeline").fade(0),
        ElementSpec::panel("N+1 query pattern introduced in PR #847 causing connection pool saturation under load")
            .detail("Recommendation: Revert PR #847 or apply eager loading fix. Estimated recovery: 3-5 minutes after deployment.")
            .named("root-cause")
            .at(220)
            .fade(20)
            .with_tint(Tint::solid(AMBER)),
    ]
}

fn security(p: &Presets) -> Result<Vec<ElementSpec>, AnimError> {
    let blocked = InterpolationWindow::linear(0.0, 40.0, 0.0, 23.0)?;
    Ok(vec![
        p.line("heading", "Security Guardrails", 0).with_tint(Tint::solid(AMBER)),
        ElementSpec::panel("Auto-revert production deployment")
            .detail("Agent Request:")
            .named("attempt")
            .at(20)
            .fade(15),
        ElementSpec::panel("BLOCKED")
            .detail("by Security Guardian")
            .named("block")
            .at(60)
            .fade(10)
            .with_motion(Motion::grow(Ease::Spring(p.block), 0.5))
            .with_tint(Tint {
                from: AMBER,
                to: RED,
                over: 20,
            }),
        ElementSpec::group(vec![
            ElementSpec::glow(30).named("halo").with_tint(Tint::solid(AMBER)),
            ElementSpec::text("Dual-LLM Safety Architecture").named("title").fade(0),
            ElementSpec::text("All dangerous actions require human approval")
                .named("caption")
                .fade(0)
                .with_tint(Tint::solid(MUTED)),
        ])
        .named("shield")
        .at(100)
        .fade(15)
        .with_motion(Motion::grow(Ease::Spring(p.shield), 0.5)),
        ElementSpec::group(vec![
            ElementSpec::counter(blocked, "").named("blocked").fade(0),
            ElementSpec::text("unsafe operations blocked").named("caption").fade(0),
        ])
        .named("stats")
        .at(160)
        .fade(20),
    ])
}

fn cost(p: &Presets) -> Result<Vec<ElementSpec>, AnimError> {
    let segments = [
        ("gpt-4o-mini (Triage)", 0.42, EMERALD),
        ("claude-opus-4.6 (Analysis)", 2.18, VIOLET),
        ("claude-opus-4.6 (Security)", 1.84, BLUE),
    ];
    let total: f64 = segments.iter().map(|s| s.1).sum();
    let bars = segments
        .into_iter()
        .enumerate()
        .map(|(i, (label, value, color))| {
            ElementSpec::bar(30, value / total)
                .named(label)
                .at(10 * i as i64)
                .fade(0)
                .with_tint(Tint::solid(color))
        })
        .collect();

    let saved = InterpolationWindow::linear(0.0, 60.0, 0.0, 12_840.0)?;
    let reduction = InterpolationWindow::linear(0.0, 40.0, 0.0, 96.0)?;

    Ok(vec![
        p.line("heading", "Cost Intelligence", 0).with_tint(Tint::solid(EMERALD)),
        p.line("subtitle", "Smart Model Routing", 8),
        ElementSpec::group(bars).named("breakdown").at(25).fade(0),
        ElementSpec::group(vec![
            ElementSpec::counter(saved, "$").named("saved").fade(0),
            ElementSpec::text("Total Cost Saved").named("caption").fade(0),
        ])
        .named("savings")
        .at(80)
        .fade(15),
        ElementSpec::group(vec![
            ElementSpec::counter(reduction, "%").named("reduction").fade(0),
            ElementSpec::text("Cost Reduction").named("caption").fade(0),
        ])
        .named("reduction-card")
        .at(160)
        .fade(20),
        ElementSpec::group(vec![
            ElementSpec::panel("gpt-4o-mini").detail("Fast, cheap for initial classification"),
            ElementSpec::panel("claude-opus-4.6").detail("Deep reasoning for root cause"),
        ])
        .named("routing")
        .at(220)
        .fade(20),
    ])
}

fn features(p: &Presets) -> Vec<ElementSpec> {
    let titles = [
        "MCP-Native",
        "Multi-Agent",
        "Security-First",
        "Cost-Optimized",
        "Real-Time Dashboard",
    ];
    let mut elements = vec![
        p.line("heading", "Key Features", 0).with_tint(Tint::solid(VIOLET)),
        p.line(
            "subtitle",
            "Everything You Need for Autonomous Incident Response",
            10,
        ),
    ];
    for (i, title) in titles.into_iter().enumerate() {
        elements.push(p.card(title, 25 + 15 * i as i64));
    }
    elements
}

fn outro(p: &Presets) -> Vec<ElementSpec> {
    vec![
        p.glowing("logo", "DevOps Copilot", 5, VIOLET),
        p.line("powered", "Powered by Archestra", 25),
        p.still("event", "2 Fast 2 MCP Hackathon", 45)
            .with_tint(Tint::solid(TEXT)),
        p.still("repo", "github.com/arhestra/devops-copilot", 65)
            .with_tint(Tint::solid(MUTED)),
        ElementSpec::panel("")
            .named("fade-to-black")
            .at(150)
            .fade(30)
            .with_tint(Tint::solid(BLACK)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_anim::LocalClock;
    use reel_core::FrameRate;

    fn at(spec: &SceneSpec, tick: i64) -> Vec<crate::ElementFrame> {
        spec.frames(LocalClock::at(tick, FrameRate::VIDEO))
    }

    fn find<'a>(frames: &'a [crate::ElementFrame], label: &str) -> &'a crate::ElementFrame {
        match frames.iter().find_map(|f| f.find(label)) {
            Some(f) => f,
            None => panic!("no element labelled {label:?}"),
        }
    }

    #[test]
    fn every_name_builds() {
        for name in SCENE_NAMES {
            let spec = build(name).unwrap();
            assert_eq!(spec.name(), name);
            assert!(spec.element_count() >= 3, "{name} is nearly empty");
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        match build("Bloopers") {
            Err(VideoConfigError::UnknownScene { name }) => assert_eq!(name, "Bloopers"),
            other => panic!("expected UnknownScene, got {other:?}"),
        }
        assert!(is_known("Cost"));
        assert!(!is_known("cost"));
    }

    #[test]
    fn problem_counter_climbs_to_seventy() {
        let spec = build("Problem").unwrap();
        assert_eq!(find(&at(&spec, 10), "manual-share").value, Some(0.0));
        let mid = find(&at(&spec, 50), "manual-share").display_value();
        assert_eq!(mid, Some(35.0));
        assert_eq!(find(&at(&spec, 400), "manual-share").value, Some(70.0));
    }

    #[test]
    fn pain_points_arrive_thirty_frames_apart() {
        let spec = build("Problem").unwrap();
        let frames = at(&spec, 120);
        assert_eq!(find(&frames, "Alert Fatigue").opacity, 1.0);
        assert_eq!(find(&frames, "Slow MTTR").opacity, 0.0);
        assert_eq!(find(&frames, "Context Switching").local_tick, -30);
    }

    #[test]
    fn architecture_arrows_draw_in_order() {
        let spec = build("Architecture").unwrap();
        let frames = at(&spec, 60);
        let diagram = find(&frames, "diagram");
        let drawn: Vec<f64> = diagram
            .children
            .iter()
            .filter(|c| c.label == "arrow")
            .map(|c| c.progress)
            .collect();
        assert_eq!(drawn.len(), 11);
        assert_eq!(drawn[0], 1.0);
        assert_eq!(drawn[1], 0.6);
        assert_eq!(drawn[10], 0.0);
    }

    #[test]
    fn assistant_reply_types_after_its_bubble() {
        let spec = build("ChatDemo").unwrap();
        let frames = at(&spec, 110);
        let analysis = find(&frames, "analysis");
        assert_eq!(analysis.find("body").and_then(|b| b.text.as_deref()), Some(""));
        let frames = at(&spec, 120);
        let body = find(&frames, "analysis").find("body").unwrap();
        assert_eq!(body.text.as_deref(), Some("**Latest Deploy"));
    }

    #[test]
    fn user_message_shows_whole() {
        let spec = build("ChatDemo").unwrap();
        let frames = at(&spec, 320);
        let body = find(&frames, "follow-up").find("body").unwrap();
        assert_eq!(body.text.as_deref(), Some("Can the agent auto-revert that PR?"));
    }

    #[test]
    fn security_block_turns_red() {
        let spec = build("Security").unwrap();
        assert_eq!(find(&at(&spec, 60), "block").color, Some(AMBER));
        assert_eq!(find(&at(&spec, 90), "block").color, Some(RED));
        assert_eq!(find(&at(&spec, 300), "blocked").display_value(), Some(23.0));
    }

    #[test]
    fn cost_bars_share_the_track() {
        let spec = build("Cost").unwrap();
        let frames = at(&spec, 200);
        let shares: f64 = find(&frames, "breakdown")
            .children
            .iter()
            .filter_map(|c| c.value)
            .sum();
        assert!((shares - 1.0).abs() < 1e-12);
        assert_eq!(find(&frames, "saved").display_text().as_deref(), Some("12840$"));
    }

    #[test]
    fn features_cascade() {
        let spec = build("Features").unwrap();
        let frames = at(&spec, 40);
        assert!(find(&frames, "MCP-Native").opacity > 0.0);
        assert_eq!(find(&frames, "Multi-Agent").opacity, 0.0);
    }

    #[test]
    fn dashboard_url_types_out() {
        let spec = build("Dashboard").unwrap();
        let frames = at(&spec, 60);
        let url = find(&frames, "url");
        assert_eq!(url.text.as_deref(), Some("devops-copilot-six.vercel.app"));
        assert!(!find(&frames, "caret").is_visible());
    }
}
