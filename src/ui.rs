use crate::calendar::local_time;
use crate::config::HourWindow;
use crate::heatmap::build_grid;
use crate::series::Series;
use crate::view::{display_name, last_updated_label, Tier, View, ViewState};
use chrono::{FixedOffset, NaiveDateTime};

/// Everything besides state and data that a page depends on.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub hours: HourWindow,
    pub offset: FixedOffset,
    pub now: NaiveDateTime,
}

pub fn render(state: &ViewState, series: &Series, ctx: &RenderContext) -> String {
    if state.loading {
        return page("Gym Capacity", &render_loading("Loading gym data..."));
    }
    match &state.view {
        View::Dashboard => page("Gym Capacity", &render_dashboard(state, series, ctx)),
        View::Heatmap(name) => page("Capacity Heatmap", &render_heatmap(name, series, ctx)),
        View::Settings => page("Settings", &render_settings(state, series)),
    }
}

fn render_loading(message: &str) -> String {
    format!(
        r#"<div class="loading"><div class="spinner"></div><p>{}</p></div>"#,
        escape_html(message)
    )
}

fn render_dashboard(state: &ViewState, series: &Series, ctx: &RenderContext) -> String {
    let latest = series
        .latest()
        .and_then(|point| local_time(&point.timestamp, ctx.offset));
    let updated = last_updated_label(latest, ctx.now);

    let mut rows = String::new();
    for name in &state.pinned {
        let capacity = series.latest_occupancy(name);
        let tier = Tier::of(capacity);
        rows.push_str(&format!(
            r#"<form class="gym-row" method="get" action="/heatmap">
  <input type="hidden" name="gym" value="{name}" />
  <button type="submit">
    <span class="emoji">{emoji}</span>
    <span class="gym-text"><span class="gym-name">{short}</span><span class="gym-status">{message}</span></span>
    <span class="badge {class}">{capacity}%</span>
  </button>
</form>
"#,
            name = escape_html(name),
            emoji = tier.emoji(),
            short = escape_html(&display_name(name)),
            message = tier.message(),
            class = tier.css_class(),
            capacity = capacity,
        ));
    }
    if state.pinned.is_empty() {
        rows.push_str(
            r#"<div class="empty-hint"><p>No gyms pinned yet.</p><p class="small">Go to Settings to pin your favorite gyms!</p></div>"#,
        );
    }

    DASHBOARD_HTML
        .replace("{{UPDATED}}", &escape_html(&updated))
        .replace("{{ROWS}}", &rows)
}

fn render_heatmap(name: &str, series: &Series, ctx: &RenderContext) -> String {
    let grid = build_grid(series, name, ctx.hours, ctx.offset);

    let mut cells = String::from("<div></div>");
    for hour in &grid.hours {
        cells.push_str(&format!(r#"<div class="hour-label">{hour}:00</div>"#));
    }
    for (day, row) in grid.days.iter().zip(&grid.data) {
        cells.push_str(&format!(r#"<div class="day-label">{day}</div>"#));
        for (hour, value) in grid.hours.iter().zip(row) {
            let (class, content, title) = match value {
                Some(avg) => (
                    Tier::of(*avg as f64).css_class(),
                    avg.to_string(),
                    format!("{day} {hour}:00 - {avg}% avg"),
                ),
                None => ("empty", "—".to_string(), format!("{day} {hour}:00 - No data")),
            };
            cells.push_str(&format!(
                r#"<div class="cell {class}" title="{title}">{content}</div>"#
            ));
        }
    }

    let latest = series
        .latest()
        .map(|point| point.timestamp.as_str())
        .unwrap_or("");

    HEATMAP_HTML
        .replace("{{NAME}}", &escape_html(&display_name(name)))
        .replace(
            "{{HOURS}}",
            &format!(
                "{} - {} (UTC{})",
                clock_label(ctx.hours.start),
                clock_label(ctx.hours.end),
                ctx.offset
            ),
        )
        .replace("{{COLUMNS}}", &grid.hours.len().to_string())
        .replace("{{CELLS}}", &cells)
        .replace("{{POINTS}}", &series.len().to_string())
        .replace("{{LATEST}}", &escape_html(latest))
}

fn render_settings(state: &ViewState, series: &Series) -> String {
    let mut rows = String::new();
    for name in series.locations() {
        let selected = state.is_pinned(&name);
        rows.push_str(&format!(
            r#"<form class="pin-row" method="post" action="/settings/pin">
  <input type="hidden" name="name" value="{name}" />
  <button type="submit" class="{class}"><span>{short}</span><span class="check"></span></button>
</form>
"#,
            name = escape_html(&name),
            class = if selected { "selected" } else { "" },
            short = escape_html(&display_name(&name)),
        ));
    }

    let count = state.pinned.len();
    let plural = if count == 1 { "" } else { "s" };

    SETTINGS_HTML
        .replace("{{ROWS}}", &rows)
        .replace("{{COUNT}}", &format!("{count} gym{plural} selected"))
}

fn page(title: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", title)
        .replace("{{BODY}}", body)
}

fn clock_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{hour} AM"),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const DASHBOARD_HTML: &str = r#"<section class="app narrow">
  <header class="bar">
    <div>
      <h1>Gym Capacity</h1>
      <p class="subtitle">🕒 Updated {{UPDATED}}</p>
    </div>
    <nav class="actions">
      <a class="ghost" href="/?reload=true" title="Reload">⟳</a>
      <a class="ghost" href="/settings" title="Settings">⚙</a>
    </nav>
  </header>
  <div class="card">
    <h2>🚦 Your Gyms</h2>
    <div class="rows">
{{ROWS}}
    </div>
  </div>
</section>"#;

const HEATMAP_HTML: &str = r#"<section class="app wide">
  <header class="bar">
    <a class="ghost" href="/">← Back to Dashboard</a>
    <h1>Capacity Heatmap</h1>
  </header>
  <div class="card">
    <h2>Weekly Patterns - {{NAME}}</h2>
    <p class="subtitle">Gym hours: {{HOURS}}</p>
    <div class="scroll">
      <div class="heatmap" style="grid-template-columns: auto repeat({{COLUMNS}}, 1fr);">
{{CELLS}}
      </div>
    </div>
    <div class="legend">
      <span>Less busy</span>
      <span class="swatch good"></span>
      <span class="swatch moderate"></span>
      <span class="swatch busy"></span>
      <span class="swatch empty"></span>
      <span>More busy / No data</span>
    </div>
    <p class="footnote">Total data points: {{POINTS}}, Latest timestamp: {{LATEST}}</p>
  </div>
</section>"#;

const SETTINGS_HTML: &str = r#"<section class="app narrow">
  <header class="bar">
    <a class="ghost" href="/">← Back to Dashboard</a>
    <h1>Settings</h1>
  </header>
  <div class="card">
    <h2>Favorite Gyms</h2>
    <p class="subtitle">Select your favorite gyms to pin to your dashboard:</p>
    <div class="rows scroll-y">
{{ROWS}}
    </div>
    <p class="footnote">{{COUNT}}</p>
  </div>
</section>"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&display=swap');

    :root {
      --bg: #f5f6f8;
      --ink: #22252a;
      --muted: #6b7079;
      --card: #ffffff;
      --good: #22c55e;
      --moderate: #eab308;
      --busy: #ef4444;
      --empty: #e5e7eb;
      --accent: #3b82f6;
      --shadow: 0 12px 32px rgba(34, 37, 42, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 16px;
    }

    .app {
      margin: 0 auto;
      display: grid;
      gap: 16px;
    }

    .app.narrow {
      max-width: 28rem;
    }

    .app.wide {
      max-width: 56rem;
    }

    .bar {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: 1.5rem;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.1rem;
    }

    .subtitle,
    .footnote,
    .small {
      margin: 4px 0;
      color: var(--muted);
      font-size: 0.85rem;
    }

    .ghost {
      color: var(--ink);
      text-decoration: none;
      padding: 8px 12px;
      border-radius: 8px;
    }

    .ghost:hover {
      background: var(--empty);
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .rows {
      display: grid;
      gap: 10px;
    }

    .scroll-y {
      max-height: 16rem;
      overflow-y: auto;
    }

    form {
      margin: 0;
    }

    form button {
      width: 100%;
      display: flex;
      align-items: center;
      gap: 10px;
      border: 1px solid transparent;
      border-radius: 10px;
      background: var(--bg);
      padding: 12px;
      font: inherit;
      text-align: left;
      cursor: pointer;
    }

    form button:hover {
      background: var(--empty);
    }

    .gym-text {
      flex: 1;
      display: grid;
    }

    .gym-name {
      font-weight: 600;
    }

    .gym-status {
      font-size: 0.75rem;
      color: var(--muted);
    }

    .badge {
      font-weight: 700;
      padding: 2px 10px;
      border-radius: 999px;
      background: var(--empty);
    }

    .pin-row button {
      justify-content: space-between;
      background: white;
      border-color: var(--empty);
    }

    .pin-row button.selected {
      background: #eff6ff;
      border-color: #bfdbfe;
    }

    .check {
      width: 16px;
      height: 16px;
      border-radius: 4px;
      border: 2px solid #d1d5db;
    }

    .selected .check {
      background: var(--accent);
      border-color: var(--accent);
    }

    .empty-hint {
      text-align: center;
      padding: 24px 0;
      color: var(--muted);
    }

    .scroll {
      overflow-x: auto;
    }

    .heatmap {
      display: grid;
      gap: 4px;
      min-width: max-content;
    }

    .hour-label,
    .day-label {
      font-size: 0.75rem;
      font-weight: 600;
      padding: 8px;
      text-align: center;
    }

    .cell {
      min-width: 40px;
      min-height: 40px;
      border-radius: 6px;
      display: flex;
      align-items: center;
      justify-content: center;
      font-size: 0.75rem;
      font-weight: 600;
      color: white;
    }

    .good {
      background: var(--good);
    }

    .moderate {
      background: var(--moderate);
    }

    .busy {
      background: var(--busy);
    }

    .empty {
      background: var(--empty);
      color: #9ca3af;
    }

    .legend {
      display: flex;
      align-items: center;
      gap: 6px;
      margin-top: 16px;
      font-size: 0.75rem;
    }

    .swatch {
      width: 16px;
      height: 16px;
      border-radius: 4px;
    }

    .loading {
      min-height: 60vh;
      display: grid;
      place-items: center;
      color: var(--muted);
    }

    .spinner {
      width: 32px;
      height: 32px;
      border-radius: 50%;
      border: 3px solid var(--empty);
      border-top-color: var(--accent);
      animation: spin 800ms linear infinite;
    }

    @keyframes spin {
      to {
        transform: rotate(360deg);
      }
    }
  </style>
</head>
<body>
{{BODY}}
</body>
</html>
"#;
