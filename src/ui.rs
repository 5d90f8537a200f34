use crate::config::{Settings, Theme};
use crate::format::{format_compact, format_number, format_percent};
use crate::models::{DerivedView, RankedItem, TrendStat};
use crate::state::DashboardState;
use std::fmt::Write;

pub fn render_index(dashboard: &DashboardState, settings: &Settings) -> String {
    let body = match &dashboard.derived {
        Some(view) => render_body(view),
        None => r#"<p class="loading">Loading analytics data...</p>"#.to_string(),
    };

    INDEX_HTML
        .replace("{{THEME}}", theme_vars(settings.theme))
        .replace("{{REFRESH}}", &settings.refresh.as_secs().to_string())
        .replace("{{STATUS}}", &render_status(dashboard))
        .replace("{{BODY}}", &body)
}

/// Trend badge text: signed percentage when defined, signed diff otherwise.
pub fn trend_badge(trend: &TrendStat) -> (bool, String) {
    let positive = trend.diff >= 0.0;
    let sign = if positive { "+" } else { "-" };
    let text = match trend.percentage {
        Some(percentage) => format!("{sign}{}", format_percent(percentage.abs())),
        None => format!("{sign}{}", format_number(trend.diff.abs())),
    };
    (positive, text)
}

fn render_status(dashboard: &DashboardState) -> String {
    let mut out = String::new();
    if let Some(stamp) = dashboard.last_fetch {
        let _ = write!(
            out,
            r#"<span class="pill">Updated {}</span>"#,
            stamp.format("%H:%M:%S UTC")
        );
    }
    if dashboard.is_fallback {
        out.push_str(r#"<span class="pill warn">Showing sample data (live fetch unavailable)</span>"#);
    }
    if let Some(err) = &dashboard.last_error {
        let _ = write!(out, r#"<span class="pill error">Live fetch failed: {}</span>"#, escape(err));
    }
    out
}

fn render_body(view: &DerivedView) -> String {
    let mut out = String::new();

    out.push_str(r#"<section class="cards">"#);
    card(
        &mut out,
        "Registered students",
        &format_number(view.kpi.total_students),
        &format!(
            "{} registrations in the last 7 days",
            format_compact(view.trends.registrations.current)
        ),
        Some(&view.trends.registrations),
    );
    card(
        &mut out,
        "Avatar adoption",
        &format_percent(view.kpi.avatar_rate),
        &format!(
            "{} students customized their profile",
            format_number(view.kpi.avatar_selected)
        ),
        None,
    );
    card(
        &mut out,
        "Weekly logins",
        &format_compact(view.trends.logins.current),
        &format!(
            "{} of tracked days had logins",
            format_percent(view.kpi.engagement_rate)
        ),
        Some(&view.trends.logins),
    );
    card(
        &mut out,
        "Students per school",
        &format_number(view.kpi.average_students_per_school.round()),
        &format!("{} active schools", view.kpi.schools_count),
        None,
    );
    out.push_str("</section>");

    if !view.insights.is_empty() {
        out.push_str(r#"<section class="panel"><h2>Highlights</h2><ul class="insights">"#);
        for insight in &view.insights {
            let _ = write!(
                out,
                "<li><strong>{}</strong><span>{}</span></li>",
                escape(&insight.title),
                escape(&insight.description)
            );
        }
        out.push_str("</ul></section>");
    }

    out.push_str(r#"<section class="panel"><h2>Daily logins and registrations</h2>"#);
    if let Some(range) = &view.date_range {
        let _ = write!(
            out,
            r#"<p class="muted">{} to {}</p>"#,
            escape(&range.start),
            escape(&range.end)
        );
    }
    out.push_str("<table><thead><tr><th>Day</th><th>Logins</th><th>Registrations</th></tr></thead><tbody>");
    for row in &view.merged_series {
        let _ = write!(
            out,
            r#"<tr><td title="{}">{}</td><td>{}</td><td>{}</td></tr>"#,
            escape(&row.tooltip_label),
            escape(&row.label),
            format_number(row.logins),
            format_number(row.registrations)
        );
    }
    out.push_str("</tbody></table></section>");

    out.push_str(r#"<section class="grid">"#);
    ranked_table(&mut out, "Completions by stage", "Share", &view.stage_progress);
    ranked_table(&mut out, "Top missions", "Of leader", &view.mission_engagement);
    out.push_str("</section>");
    ranked_table(&mut out, "School ranking", "Share of students", &view.schools);

    out.push_str(r#"<section class="panel"><h2>Engagement</h2><div class="gauges">"#);
    for gauge in &view.gauges {
        let _ = write!(
            out,
            r#"<div class="gauge"><span>{}</span><div class="bar"><div style="width: {:.1}%"></div></div><strong>{}</strong></div>"#,
            escape(&gauge.name),
            gauge.value,
            format_percent(gauge.value)
        );
    }
    let _ = write!(
        out,
        "</div><p class=\"muted\">{} registrations and {} sessions in total.</p></section>",
        format_number(view.kpi.total_registrations),
        format_number(view.kpi.total_logins)
    );

    out
}

fn card(out: &mut String, label: &str, value: &str, subtitle: &str, trend: Option<&TrendStat>) {
    let badge = trend
        .map(|trend| {
            let (positive, text) = trend_badge(trend);
            let class = if positive { "up" } else { "down" };
            format!(r#"<span class="badge {class}">{text}</span>"#)
        })
        .unwrap_or_default();
    let _ = write!(
        out,
        r#"<article class="card"><header><span>{label}</span>{badge}</header><p class="value">{value}</p><p class="muted">{subtitle}</p></article>"#,
        label = escape(label),
        value = escape(value),
        subtitle = escape(subtitle),
    );
}

fn ranked_table(out: &mut String, title: &str, share_label: &str, items: &[RankedItem]) {
    let _ = write!(
        out,
        r#"<section class="panel"><h2>{title}</h2><table><thead><tr><th>#</th><th>Name</th><th>Count</th><th>{share_label}</th></tr></thead><tbody>"#
    );
    for (index, item) in items.iter().enumerate() {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            index + 1,
            escape(&item.name),
            format_number(item.value),
            format_percent(item.percentage)
        );
    }
    out.push_str("</tbody></table></section>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn theme_vars(theme: Theme) -> &'static str {
    match theme {
        Theme::Aurora => {
            "--bg: #020617; --panel: rgba(15, 23, 42, 0.82); --ink: #e2e8f0; --muted: #94a3b8; --accent: #22d3ee; --border: rgba(148, 163, 184, 0.18);"
        }
        Theme::Slate => {
            "--bg: #f1f5f9; --panel: #ffffff; --ink: #0f172a; --muted: #475569; --accent: #2563eb; --border: #cbd5e1;"
        }
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta http-equiv="refresh" content="{{REFRESH}}" />
  <title>Gamification Dashboard</title>
  <style>
    :root { {{THEME}} }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      width: min(1200px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.05rem;
    }

    .muted {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .status {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin-top: 12px;
    }

    .pill {
      border: 1px solid var(--border);
      border-radius: 999px;
      padding: 4px 12px;
      font-size: 0.8rem;
    }

    .pill.warn {
      border-color: #f59e0b;
      color: #f59e0b;
    }

    .pill.error {
      border-color: #f43f5e;
      color: #f43f5e;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .card, .panel {
      background: var(--panel);
      border: 1px solid var(--border);
      border-radius: 20px;
      padding: 20px;
    }

    .card header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      color: var(--muted);
    }

    .value {
      font-size: 2rem;
      font-weight: 600;
      margin: 12px 0 4px;
    }

    .badge {
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.75rem;
    }

    .badge.up {
      background: rgba(16, 185, 129, 0.15);
      color: #10b981;
    }

    .badge.down {
      background: rgba(244, 63, 94, 0.15);
      color: #f43f5e;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 16px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.9rem;
    }

    th, td {
      text-align: left;
      padding: 8px;
      border-bottom: 1px solid var(--border);
    }

    .insights {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 10px;
    }

    .insights li {
      display: grid;
      gap: 2px;
    }

    .gauges {
      display: grid;
      gap: 12px;
    }

    .gauge .bar {
      height: 10px;
      border-radius: 999px;
      background: var(--border);
      overflow: hidden;
    }

    .gauge .bar div {
      height: 100%;
      background: var(--accent);
    }

    .loading {
      text-align: center;
      color: var(--muted);
      padding: 48px 0;
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Gamification in Schools</h1>
      <p class="muted">Student engagement, refreshed every {{REFRESH}} seconds.</p>
      <div class="status">{{STATUS}}</div>
    </header>
    {{BODY}}
  </main>
</body>
</html>
"#;
