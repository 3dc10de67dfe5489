use chrono::NaiveDate;

use crate::models::{Preferences, StreakStatus, StreakView, Theme};

/// Renders the landing page with the streak cards already in place, so the
/// page is useful before (or without) the client script. The script re-renders
/// the same markup from `/api/streaks` afterwards.
pub fn render_index(streaks: &[StreakView], preferences: &Preferences) -> String {
    let cards: String = streaks.iter().map(render_card).collect();
    let theme = match preferences.theme {
        Theme::Light => "theme-light",
        Theme::Dark => "theme-dark",
        Theme::System => "",
    };
    let sound = if preferences.sound_enabled { "\u{1F50A}" } else { "\u{1F507}" };

    // User text lands in the cards, so they are substituted last and never
    // re-scanned for placeholders.
    INDEX_HTML
        .replace("{{THEME}}", theme)
        .replace("{{SOUND}}", sound)
        .replace("{{EMPTY}}", if streaks.is_empty() { "" } else { "hidden" })
        .replace("{{CARDS}}", &cards)
}

fn render_card(view: &StreakView) -> String {
    let streak = &view.streak;
    let (status_class, status_icon, status_label) = match view.status {
        StreakStatus::Active => ("active", "\u{1F525}", "active"),
        StreakStatus::AtRisk => ("at-risk", "\u{26A0}\u{FE0F}", "at-risk"),
        StreakStatus::Broken => ("broken", "\u{1F494}", "broken"),
    };
    let id = escape_html(&streak.id);
    let description = match &streak.description {
        Some(text) if !text.is_empty() => {
            format!("<p class=\"card-desc\">{}</p>", escape_html(text))
        }
        _ => String::new(),
    };
    let disabled = if view.can_check_in { "" } else { " disabled" };

    format!(
        concat!(
            "<article class=\"card\" data-id=\"{id}\">",
            "<div class=\"card-top\">",
            "<h3 class=\"card-name\"><span class=\"card-emoji\">{emoji}</span> {name}</h3>",
            "<span class=\"badge {status_class}\">{status_icon} {status_label}</span>",
            "</div>",
            "{description}",
            "<div class=\"counters\">",
            "<div class=\"counter\"><span class=\"counter-icon\">\u{1F3AF}</span><div>",
            "<div class=\"counter-value\">{current}</div><div class=\"counter-label\">Current</div></div></div>",
            "<div class=\"counter\"><span class=\"counter-icon\">\u{1F3C6}</span><div>",
            "<div class=\"counter-value\">{longest}</div><div class=\"counter-label\">Best</div></div></div>",
            "</div>",
            "<div class=\"stats-panel\">",
            "<div class=\"stats-title\">Statistics</div>",
            "<div class=\"stats-grid\">",
            "<div><div class=\"stat-label\">Started On</div><div class=\"stat-value\">\u{1F4C5} {start}</div></div>",
            "<div><div class=\"stat-label\">Last Active</div><div class=\"stat-value\">\u{23F1}\u{FE0F} {last}</div></div>",
            "<div><div class=\"stat-label\">Total Days</div><div class=\"stat-value\">\u{1F4C6} {total} days</div></div>",
            "<div><div class=\"stat-label\">Success Rate</div><div class=\"stat-value\">\u{1F4C8} {rate}%</div></div>",
            "</div>",
            "<div class=\"meter\"><div class=\"meter-fill\" style=\"width: {rate}%\"></div></div>",
            "<div class=\"meter-note\">Success Rate: {rate}%</div>",
            "</div>",
            "<div class=\"card-actions\">",
            "<form method=\"post\" action=\"/streaks/{id}/checkin\">",
            "<button class=\"btn-checkin\" type=\"submit\" data-action=\"checkin\" data-id=\"{id}\"{disabled}>\u{2705} Did It Today</button>",
            "</form>",
            "<form method=\"post\" action=\"/streaks/{id}/fail\">",
            "<button class=\"btn-fail\" type=\"submit\" data-action=\"fail\" data-id=\"{id}\">\u{1F494} Failed Today</button>",
            "</form>",
            "<form method=\"post\" action=\"/streaks/{id}/delete\">",
            "<button class=\"btn-delete\" type=\"submit\" data-action=\"delete\" data-id=\"{id}\" title=\"Delete streak\">\u{1F5D1}\u{FE0F}</button>",
            "</form>",
            "</div>",
            "</article>"
        ),
        id = id,
        emoji = escape_html(&streak.emoji),
        name = escape_html(&streak.name),
        status_class = status_class,
        status_icon = status_icon,
        status_label = status_label,
        description = description,
        current = streak.current_streak,
        longest = streak.longest_streak,
        start = format_date(streak.start_date),
        last = format_date(streak.last_checked),
        total = view.total_days,
        rate = view.success_rate,
        disabled = disabled,
    )
}

fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn escape_html(text: &str) -> String {
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

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Streak Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg: #111827;
      --panel: #1f2937;
      --panel-2: rgba(17, 24, 39, 0.55);
      --ink: #f9fafb;
      --muted: #9ca3af;
      --line: #374151;
      --accent: #3b82f6;
      --accent-strong: #2563eb;
      --ok: #6ee7b7;
      --ok-bg: rgba(6, 78, 59, 0.5);
      --ok-line: #047857;
      --warn: #fde68a;
      --warn-bg: rgba(120, 53, 15, 0.45);
      --warn-line: #b45309;
      --bad: #fca5a5;
      --bad-bg: rgba(127, 29, 29, 0.45);
      --bad-line: #b91c1c;
      --shadow: 0 18px 44px rgba(0, 0, 0, 0.4);
    }

    body.theme-light {
      --bg: #f3f4f6;
      --panel: #ffffff;
      --panel-2: #f9fafb;
      --ink: #111827;
      --muted: #6b7280;
      --line: #e5e7eb;
      --shadow: 0 18px 44px rgba(17, 24, 39, 0.12);
    }

    @media (prefers-color-scheme: light) {
      body:not(.theme-dark):not(.theme-light) {
        --bg: #f3f4f6;
        --panel: #ffffff;
        --panel-2: #f9fafb;
        --ink: #111827;
        --muted: #6b7280;
        --line: #e5e7eb;
        --shadow: 0 18px 44px rgba(17, 24, 39, 0.12);
      }
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
      padding: 32px 18px 64px;
    }

    .app {
      width: min(1180px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 26px;
    }

    header {
      display: flex;
      flex-direction: column;
      align-items: center;
      gap: 6px;
      text-align: center;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
      display: flex;
      align-items: center;
      gap: 10px;
    }

    .subtitle {
      margin: 0;
      color: var(--muted);
      font-size: 1rem;
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      justify-content: center;
      align-items: center;
    }

    button {
      font-family: inherit;
      font-size: 1rem;
      border: none;
      border-radius: 12px;
      cursor: pointer;
      transition: transform 120ms ease, background 160ms ease, box-shadow 160ms ease;
    }

    button:active {
      transform: scale(0.97);
    }

    button:disabled {
      cursor: default;
      opacity: 0.55;
      transform: none;
    }

    .btn-add {
      background: var(--accent);
      color: white;
      font-weight: 600;
      padding: 13px 26px;
      box-shadow: var(--shadow);
      min-width: 260px;
    }

    .btn-add:hover {
      background: var(--accent-strong);
    }

    .btn-ghost {
      background: var(--panel);
      color: var(--ink);
      border: 1px solid var(--line);
      padding: 11px 18px;
    }

    .btn-ghost:hover {
      border-color: var(--muted);
    }

    .empty {
      text-align: center;
      color: var(--muted);
      padding: 48px 0;
    }

    .empty-icon {
      font-size: 2.6rem;
      margin-bottom: 12px;
    }

    .empty-title {
      font-size: 1.15rem;
      margin: 0 0 6px;
    }

    .empty-note {
      font-size: 0.9rem;
      margin: 0;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(320px, 1fr));
      gap: 22px;
    }

    .card {
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 16px;
      padding: 22px;
      display: grid;
      gap: 16px;
      box-shadow: var(--shadow);
      transition: transform 160ms ease;
    }

    .card:hover {
      transform: translateY(-3px);
    }

    .card-top {
      display: flex;
      justify-content: space-between;
      align-items: flex-start;
      gap: 10px;
    }

    .card-name {
      margin: 0;
      font-size: 1.15rem;
      font-weight: 600;
      display: flex;
      align-items: center;
      gap: 8px;
      overflow-wrap: anywhere;
    }

    .card-emoji {
      font-size: 1.4rem;
    }

    .card-desc {
      margin: -6px 0 0;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .badge {
      padding: 5px 12px;
      border-radius: 999px;
      font-size: 0.82rem;
      font-weight: 500;
      white-space: nowrap;
      border: 1px solid transparent;
    }

    .badge.active {
      background: var(--ok-bg);
      color: var(--ok);
      border-color: var(--ok-line);
    }

    .badge.at-risk {
      background: var(--warn-bg);
      color: var(--warn);
      border-color: var(--warn-line);
    }

    .badge.broken {
      background: var(--bad-bg);
      color: var(--bad);
      border-color: var(--bad-line);
    }

    .counters {
      display: flex;
      gap: 26px;
    }

    .counter {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    .counter-icon {
      font-size: 1.3rem;
    }

    .counter-value {
      font-size: 1.35rem;
      font-weight: 600;
      line-height: 1.1;
    }

    .counter-label {
      font-size: 0.72rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stats-panel {
      background: var(--panel-2);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 14px 16px;
      display: grid;
      gap: 12px;
    }

    .stats-title {
      font-size: 0.72rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stats-grid {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 10px 16px;
    }

    .stat-label {
      font-size: 0.75rem;
      color: var(--muted);
      margin-bottom: 2px;
    }

    .stat-value {
      font-size: 0.92rem;
    }

    .meter {
      height: 8px;
      border-radius: 999px;
      background: var(--line);
      overflow: hidden;
    }

    .meter-fill {
      height: 100%;
      background: var(--accent);
      border-radius: inherit;
      transition: width 600ms ease;
    }

    .meter-note {
      font-size: 0.75rem;
      color: var(--muted);
      text-align: center;
    }

    .card-actions {
      display: flex;
      gap: 10px;
    }

    .card-actions form {
      margin: 0;
      flex: 1;
    }

    .card-actions form:last-child {
      flex: 0 0 auto;
    }

    .card-actions button {
      width: 100%;
      padding: 10px 12px;
      font-size: 0.92rem;
    }

    .btn-checkin {
      background: var(--ok-bg);
      color: var(--ok);
      border: 1px solid var(--ok-line);
    }

    .btn-fail {
      background: var(--warn-bg);
      color: var(--warn);
      border: 1px solid var(--warn-line);
    }

    .btn-delete {
      background: var(--bad-bg);
      color: var(--bad);
      border: 1px solid var(--bad-line);
    }

    .status {
      min-height: 22px;
      text-align: center;
      font-size: 0.92rem;
      color: var(--muted);
    }

    .status[data-type='error'] {
      color: var(--bad);
    }

    .status[data-type='ok'] {
      color: var(--ok);
    }

    .hint {
      text-align: center;
      color: var(--muted);
      font-size: 0.82rem;
      margin: 0;
    }

    .modal {
      position: fixed;
      inset: 0;
      display: flex;
      align-items: center;
      justify-content: center;
      z-index: 40;
    }

    .modal[hidden], .overlay[hidden], .empty[hidden], .emoji-panel[hidden] {
      display: none;
    }

    .modal-backdrop {
      position: absolute;
      inset: 0;
      background: rgba(0, 0, 0, 0.55);
    }

    .modal-card {
      position: relative;
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 16px;
      padding: 26px;
      width: min(420px, calc(100vw - 36px));
      box-shadow: var(--shadow);
    }

    .modal-card h2 {
      margin: 0 0 14px;
      font-size: 1.4rem;
    }

    .field-label {
      display: block;
      font-size: 0.85rem;
      color: var(--muted);
      margin: 10px 0 6px;
    }

    .modal-card input[type='text'], .modal-card select {
      width: 100%;
      padding: 11px 13px;
      border-radius: 10px;
      border: 1px solid var(--line);
      background: var(--panel-2);
      color: var(--ink);
      font-family: inherit;
      font-size: 0.95rem;
    }

    .modal-card input[type='text']:focus, .modal-card select:focus {
      outline: none;
      border-color: var(--accent);
    }

    .emoji-field {
      position: relative;
    }

    .emoji-button {
      width: 52px;
      height: 52px;
      font-size: 1.5rem;
      background: var(--panel-2);
      border: 1px solid var(--line);
    }

    .emoji-panel {
      position: absolute;
      top: calc(100% + 8px);
      left: 0;
      z-index: 10;
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 12px;
      box-shadow: var(--shadow);
      padding: 12px;
      width: 300px;
    }

    .emoji-tabs {
      display: flex;
      gap: 5px;
      flex-wrap: wrap;
      margin-bottom: 10px;
    }

    .emoji-tab {
      padding: 4px 11px;
      border-radius: 999px;
      font-size: 0.8rem;
      background: var(--panel-2);
      color: var(--muted);
      border: 1px solid var(--line);
    }

    .emoji-tab.active {
      background: var(--accent);
      color: white;
      border-color: var(--accent);
    }

    .emoji-grid {
      display: grid;
      grid-template-columns: repeat(5, 1fr);
      gap: 6px;
    }

    .emoji-cell {
      font-size: 1.25rem;
      padding: 7px 0;
      background: transparent;
      border-radius: 8px;
    }

    .emoji-cell:hover {
      background: var(--panel-2);
    }

    .emoji-cell.selected {
      background: var(--accent);
    }

    .modal-actions {
      display: flex;
      gap: 10px;
      margin-top: 18px;
    }

    .modal-actions button {
      flex: 1;
      padding: 11px 0;
    }

    .btn-primary {
      background: var(--accent);
      color: white;
      font-weight: 600;
    }

    .btn-primary:hover {
      background: var(--accent-strong);
    }

    .overlay {
      position: fixed;
      inset: 0;
      display: flex;
      align-items: center;
      justify-content: center;
      z-index: 50;
      background: rgba(0, 0, 0, 0.5);
    }

    .overlay-card {
      background: linear-gradient(110deg, #7c3aed, #2563eb);
      border-radius: 20px;
      padding: 38px 48px;
      text-align: center;
      color: white;
      box-shadow: var(--shadow);
      animation: pop 260ms ease;
    }

    .overlay-badge {
      font-size: 3.6rem;
      margin-bottom: 12px;
    }

    .overlay-card h2 {
      margin: 0 0 10px;
      font-size: 1.8rem;
    }

    .overlay-card p {
      margin: 0 0 22px;
      color: rgba(255, 255, 255, 0.82);
    }

    .overlay-card .btn-primary {
      background: rgba(255, 255, 255, 0.18);
      padding: 10px 30px;
    }

    .confetti {
      position: fixed;
      inset: 0;
      pointer-events: none;
      overflow: hidden;
      z-index: 60;
    }

    .confetti-piece {
      position: absolute;
      top: -14px;
      width: 8px;
      height: 13px;
      border-radius: 2px;
      animation: fall 2.6s linear forwards;
    }

    @keyframes fall {
      to {
        transform: translateY(105vh) rotate(540deg);
        opacity: 0.25;
      }
    }

    @keyframes pop {
      from {
        transform: scale(0.5);
        opacity: 0;
      }
      to {
        transform: scale(1);
        opacity: 1;
      }
    }

    .sound-toggle {
      position: fixed;
      bottom: 18px;
      right: 18px;
      width: 52px;
      height: 52px;
      border-radius: 50%;
      background: var(--panel);
      border: 1px solid var(--line);
      font-size: 1.25rem;
      box-shadow: var(--shadow);
      z-index: 30;
    }

    @media (max-width: 540px) {
      .app {
        gap: 20px;
      }
      .btn-add {
        width: 100%;
      }
    }
  </style>
</head>
<body class="{{THEME}}">
  <main class="app">
    <header>
      <h1><span>&#128202;</span> Streak Tracker</h1>
      <p class="subtitle">Build habits one day at a time.</p>
    </header>

    <section class="toolbar">
      <button id="open-add" class="btn-add" type="button">&#10024; Add New Streak</button>
      <button id="export-btn" class="btn-ghost" type="button">Export</button>
      <button id="import-btn" class="btn-ghost" type="button">Import</button>
      <input id="import-file" type="file" accept="application/json,.json" hidden />
    </section>

    <section id="empty" class="empty" {{EMPTY}}>
      <div class="empty-icon">&#127775;</div>
      <p class="empty-title">No streaks yet!</p>
      <p class="empty-note">Start by adding your first streak above.</p>
    </section>

    <section id="grid" class="grid">{{CARDS}}</section>

    <div class="status" id="status"></div>
    <p class="hint">Days are counted in server-local time. One missed day breaks a run; milestones land at 7, 30, 50, 100 and 365 days. Ctrl+N opens the add dialog.</p>
  </main>

  <div id="add-modal" class="modal" hidden>
    <div class="modal-backdrop" id="modal-backdrop"></div>
    <div class="modal-card">
      <h2>Add New Streak</h2>
      <form id="add-form" method="post" action="/streaks/add">
        <label class="field-label">Choose an Emoji</label>
        <div class="emoji-field">
          <button type="button" id="emoji-button" class="emoji-button">&#10024;</button>
          <input type="hidden" name="emoji" id="emoji-input" value="&#10024;" />
          <div id="emoji-panel" class="emoji-panel" hidden>
            <div id="emoji-tabs" class="emoji-tabs"></div>
            <div id="emoji-grid" class="emoji-grid"></div>
          </div>
        </div>
        <label class="field-label" for="streak-name">Streak Name</label>
        <input id="streak-name" name="name" type="text" placeholder="Enter streak name" autocomplete="off" />
        <label class="field-label" for="streak-category">Category</label>
        <select id="streak-category" name="category">
          <option>Health</option>
          <option>Productivity</option>
          <option>Learning</option>
          <option>Lifestyle</option>
          <option selected>Other</option>
        </select>
        <div class="modal-actions">
          <button type="button" id="cancel-add" class="btn-ghost">Cancel</button>
          <button type="submit" class="btn-primary">Add Streak</button>
        </div>
      </form>
    </div>
  </div>

  <div id="milestone-overlay" class="overlay" hidden>
    <div class="overlay-card">
      <div id="milestone-badge" class="overlay-badge">&#127881;</div>
      <h2 id="milestone-title">Milestone!</h2>
      <p>Keep up the great work!</p>
      <button id="milestone-close" class="btn-primary" type="button">Continue</button>
    </div>
  </div>
  <div id="confetti" class="confetti" aria-hidden="true"></div>

  <button id="sound-toggle" class="sound-toggle" type="button" title="Toggle sounds">{{SOUND}}</button>

  <script>
    const gridEl = document.getElementById('grid');
    const emptyEl = document.getElementById('empty');
    const statusEl = document.getElementById('status');
    const modalEl = document.getElementById('add-modal');
    const backdropEl = document.getElementById('modal-backdrop');
    const addFormEl = document.getElementById('add-form');
    const nameInput = document.getElementById('streak-name');
    const categorySelect = document.getElementById('streak-category');
    const emojiButton = document.getElementById('emoji-button');
    const emojiInput = document.getElementById('emoji-input');
    const emojiPanel = document.getElementById('emoji-panel');
    const emojiTabsEl = document.getElementById('emoji-tabs');
    const emojiGridEl = document.getElementById('emoji-grid');
    const overlayEl = document.getElementById('milestone-overlay');
    const overlayBadge = document.getElementById('milestone-badge');
    const overlayTitle = document.getElementById('milestone-title');
    const confettiEl = document.getElementById('confetti');
    const soundButton = document.getElementById('sound-toggle');
    const importInput = document.getElementById('import-file');

    const EMOJI_CATEGORIES = {
      'Activities': ['⚽️', '\u{1F3AE}', '\u{1F3A8}', '\u{1F4DA}', '\u{1F4AA}', '\u{1F9D8}', '\u{1F3C3}', '\u{1F6B4}', '\u{1F3B5}', '✍️'],
      'Health': ['\u{1F48A}', '\u{1F3E5}', '\u{1F9E0}', '❤️', '\u{1F957}', '\u{1F964}', '\u{1F634}', '\u{1F9D8}‍♀️', '\u{1F6B0}', '\u{1F966}'],
      'Productivity': ['\u{1F4BB}', '\u{1F4F1}', '✏️', '\u{1F4DD}', '⏰', '\u{1F4C5}', '✅', '\u{1F4C8}', '\u{1F4A1}', '\u{1F3AF}'],
      'Lifestyle': ['\u{1F305}', '\u{1F9F9}', '\u{1F6CF}️', '\u{1FAB4}', '\u{1F415}', '\u{1F4D6}', '\u{1F3B8}', '\u{1F3A8}', '\u{1F9D8}‍♂️', '\u{1F6BF}'],
      'Other': ['⭐️', '\u{1F31F}', '✨', '\u{1F389}', '\u{1F525}', '\u{1F4AB}', '\u{1F308}', '\u{1F38A}', '\u{1F3C6}', '\u{1F48E}']
    };

    const MILESTONE_MESSAGES = {
      7: '\u{1F31F} One Week Streak!',
      30: '\u{1F389} One Month Strong!',
      50: '\u{1F680} Halfway to 100!',
      100: '\u{1F4AB} Century Club!',
      365: '\u{1F3C6} One Year Champion!'
    };

    const STATUS_ICONS = {
      'active': '\u{1F525}',
      'at-risk': '⚠️',
      'broken': '\u{1F494}'
    };

    const CONFETTI_COLORS = ['#FFD700', '#FFA500', '#FF69B4', '#87CEEB', '#98FB98', '#DDA0DD'];

    const TONES = {
      success: [[660, 0, 0.15, 0.5]],
      milestone: [[523, 0, 0.12, 0.7], [659, 0.12, 0.12, 0.7], [784, 0.24, 0.22, 0.7]],
      fail: [[196, 0, 0.3, 0.5]],
      add: [[440, 0, 0.12, 0.5]],
      delete: [[311, 0, 0.15, 0.4]],
      click: [[520, 0, 0.05, 0.3]]
    };

    let prefs = { theme: 'system', notifications: false, reminderTime: null, weekStartsOn: 1, soundEnabled: true };
    let streaks = [];
    let selectedEmoji = '✨';
    let emojiCategory = 'Activities';
    let celebrationTimer = null;
    let statusTimer = null;
    let audioCtx = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      clearTimeout(statusTimer);
      if (message && type !== 'error') {
        statusTimer = setTimeout(() => setStatus('', ''), 1800);
      }
    };

    const showError = (err) => setStatus(err.message || 'Something went wrong', 'error');

    const escapeHtml = (text) =>
      String(text).replace(/[&<>'"]/g, (ch) => '&#' + ch.charCodeAt(0) + ';');

    const formatDate = (iso) =>
      new Date(iso + 'T00:00:00').toLocaleDateString('en-US', { year: 'numeric', month: 'short', day: 'numeric' });

    const playSound = (name) => {
      if (!prefs.soundEnabled) {
        return;
      }
      try {
        audioCtx = audioCtx || new (window.AudioContext || window.webkitAudioContext)();
        const now = audioCtx.currentTime;
        TONES[name].forEach(([freq, offset, length, volume]) => {
          const osc = audioCtx.createOscillator();
          const gain = audioCtx.createGain();
          osc.type = 'sine';
          osc.frequency.value = freq;
          gain.gain.setValueAtTime(volume, now + offset);
          gain.gain.exponentialRampToValueAtTime(0.001, now + offset + length);
          osc.connect(gain);
          gain.connect(audioCtx.destination);
          osc.start(now + offset);
          osc.stop(now + offset + length);
        });
      } catch (err) {
        // Audio is best effort.
      }
    };

    const cardHtml = (view) => {
      const icon = STATUS_ICONS[view.status] || '';
      const desc = view.description ? `<p class="card-desc">${escapeHtml(view.description)}</p>` : '';
      const disabled = view.canCheckIn ? '' : ' disabled';
      const id = escapeHtml(view.id);
      return `<article class="card" data-id="${id}">` +
        `<div class="card-top">` +
        `<h3 class="card-name"><span class="card-emoji">${escapeHtml(view.emoji)}</span> ${escapeHtml(view.name)}</h3>` +
        `<span class="badge ${view.status}">${icon} ${view.status}</span>` +
        `</div>` +
        desc +
        `<div class="counters">` +
        `<div class="counter"><span class="counter-icon">\u{1F3AF}</span><div>` +
        `<div class="counter-value">${view.currentStreak}</div><div class="counter-label">Current</div></div></div>` +
        `<div class="counter"><span class="counter-icon">\u{1F3C6}</span><div>` +
        `<div class="counter-value">${view.longestStreak}</div><div class="counter-label">Best</div></div></div>` +
        `</div>` +
        `<div class="stats-panel">` +
        `<div class="stats-title">Statistics</div>` +
        `<div class="stats-grid">` +
        `<div><div class="stat-label">Started On</div><div class="stat-value">\u{1F4C5} ${formatDate(view.startDate)}</div></div>` +
        `<div><div class="stat-label">Last Active</div><div class="stat-value">⏱️ ${formatDate(view.lastChecked)}</div></div>` +
        `<div><div class="stat-label">Total Days</div><div class="stat-value">\u{1F4C6} ${view.totalDays} days</div></div>` +
        `<div><div class="stat-label">Success Rate</div><div class="stat-value">\u{1F4C8} ${view.successRate}%</div></div>` +
        `</div>` +
        `<div class="meter"><div class="meter-fill" style="width: ${view.successRate}%"></div></div>` +
        `<div class="meter-note">Success Rate: ${view.successRate}%</div>` +
        `</div>` +
        `<div class="card-actions">` +
        `<form method="post" action="/streaks/${id}/checkin">` +
        `<button class="btn-checkin" type="submit" data-action="checkin" data-id="${id}"${disabled}>✅ Did It Today</button>` +
        `</form>` +
        `<form method="post" action="/streaks/${id}/fail">` +
        `<button class="btn-fail" type="submit" data-action="fail" data-id="${id}">\u{1F494} Failed Today</button>` +
        `</form>` +
        `<form method="post" action="/streaks/${id}/delete">` +
        `<button class="btn-delete" type="submit" data-action="delete" data-id="${id}" title="Delete streak">\u{1F5D1}️</button>` +
        `</form>` +
        `</div>` +
        `</article>`;
    };

    const renderStreaks = () => {
      emptyEl.hidden = streaks.length > 0;
      gridEl.innerHTML = streaks.map(cardHtml).join('');
    };

    const dismissCelebration = () => {
      if (overlayEl.hidden) {
        return;
      }
      overlayEl.hidden = true;
      confettiEl.innerHTML = '';
      clearTimeout(celebrationTimer);
      fetch('/api/milestone/ack', { method: 'POST' }).catch(() => {});
    };

    const celebrate = (milestone) => {
      overlayBadge.textContent = milestone >= 365 ? '\u{1F451}' : milestone >= 100 ? '\u{1F31F}' : '\u{1F389}';
      overlayTitle.textContent = MILESTONE_MESSAGES[milestone] || `Amazing! ${milestone} Days!`;
      overlayEl.hidden = false;
      playSound('milestone');
      confettiEl.innerHTML = '';
      for (let i = 0; i < 90; i += 1) {
        const piece = document.createElement('span');
        piece.className = 'confetti-piece';
        piece.style.left = `${Math.random() * 100}%`;
        piece.style.background = CONFETTI_COLORS[i % CONFETTI_COLORS.length];
        piece.style.animationDelay = `${Math.random() * 1.8}s`;
        confettiEl.appendChild(piece);
      }
      clearTimeout(celebrationTimer);
      celebrationTimer = setTimeout(dismissCelebration, 3000);
    };

    const load = async () => {
      const res = await fetch('/api/streaks');
      if (!res.ok) {
        throw new Error('Unable to load streaks');
      }
      const data = await res.json();
      streaks = data.streaks;
      renderStreaks();
      if (data.milestone) {
        celebrate(data.milestone);
      }
    };

    const upsertView = (view) => {
      const index = streaks.findIndex((entry) => entry.id === view.id);
      if (index === -1) {
        streaks.push(view);
      } else {
        streaks[index] = view;
      }
      renderStreaks();
    };

    const post = async (path) => {
      const res = await fetch(path, { method: 'POST' });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const checkIn = async (id) => {
      const data = await post(`/api/streaks/${encodeURIComponent(id)}/checkin`);
      playSound('success');
      upsertView(data.streak);
      if (data.milestone) {
        celebrate(data.milestone);
      }
    };

    const failStreak = async (id) => {
      playSound('fail');
      upsertView(await post(`/api/streaks/${encodeURIComponent(id)}/fail`));
    };

    const deleteStreak = async (id) => {
      playSound('delete');
      const res = await fetch(`/api/streaks/${encodeURIComponent(id)}`, { method: 'DELETE' });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      streaks = streaks.filter((entry) => entry.id !== id);
      renderStreaks();
    };

    const renderEmojiPicker = () => {
      emojiTabsEl.innerHTML = Object.keys(EMOJI_CATEGORIES)
        .map((cat) => `<button type="button" class="emoji-tab${cat === emojiCategory ? ' active' : ''}" data-cat="${cat}">${cat}</button>`)
        .join('');
      emojiGridEl.innerHTML = EMOJI_CATEGORIES[emojiCategory]
        .map((emoji) => `<button type="button" class="emoji-cell${emoji === selectedEmoji ? ' selected' : ''}" data-emoji="${emoji}">${emoji}</button>`)
        .join('');
    };

    const openModal = () => {
      modalEl.hidden = false;
      renderEmojiPicker();
      nameInput.focus();
    };

    const closeModal = () => {
      modalEl.hidden = true;
      emojiPanel.hidden = true;
      nameInput.value = '';
      selectedEmoji = '✨';
      emojiInput.value = selectedEmoji;
      emojiButton.textContent = selectedEmoji;
      categorySelect.value = 'Other';
    };

    const submitStreak = async () => {
      const name = nameInput.value.trim();
      if (!name) {
        nameInput.focus();
        return;
      }
      playSound('add');
      const res = await fetch('/api/streaks', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ name, emoji: selectedEmoji, category: categorySelect.value })
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Could not add streak');
      }
      closeModal();
      upsertView(await res.json());
    };

    const updateSoundButton = () => {
      soundButton.textContent = prefs.soundEnabled ? '\u{1F50A}' : '\u{1F507}';
    };

    const applyTheme = () => {
      document.body.classList.remove('theme-light', 'theme-dark');
      if (prefs.theme === 'light') {
        document.body.classList.add('theme-light');
      } else if (prefs.theme === 'dark') {
        document.body.classList.add('theme-dark');
      }
    };

    const loadPrefs = async () => {
      const res = await fetch('/api/preferences');
      if (res.ok) {
        prefs = await res.json();
      }
      applyTheme();
      updateSoundButton();
    };

    const savePrefs = async () => {
      const res = await fetch('/api/preferences', {
        method: 'PUT',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(prefs)
      });
      if (!res.ok) {
        throw new Error('Could not save preferences');
      }
    };

    const importFile = async (file) => {
      const text = await file.text();
      const res = await fetch('/api/import', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: text
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Import failed');
      }
      setStatus('Import complete', 'ok');
      await load();
    };

    gridEl.addEventListener('click', (event) => {
      const button = event.target.closest('button[data-action]');
      if (!button) {
        return;
      }
      event.preventDefault();
      const id = button.dataset.id;
      if (button.dataset.action === 'checkin') {
        checkIn(id).catch(showError);
      } else if (button.dataset.action === 'fail') {
        failStreak(id).catch(showError);
      } else if (button.dataset.action === 'delete') {
        deleteStreak(id).catch(showError);
      }
    });

    document.getElementById('open-add').addEventListener('click', openModal);
    document.getElementById('cancel-add').addEventListener('click', closeModal);
    backdropEl.addEventListener('click', closeModal);

    addFormEl.addEventListener('submit', (event) => {
      event.preventDefault();
      submitStreak().catch(showError);
    });

    emojiButton.addEventListener('click', () => {
      emojiPanel.hidden = !emojiPanel.hidden;
    });

    emojiTabsEl.addEventListener('click', (event) => {
      const tab = event.target.closest('button[data-cat]');
      if (tab) {
        emojiCategory = tab.dataset.cat;
        renderEmojiPicker();
      }
    });

    emojiGridEl.addEventListener('click', (event) => {
      const cell = event.target.closest('button[data-emoji]');
      if (cell) {
        selectedEmoji = cell.dataset.emoji;
        emojiInput.value = selectedEmoji;
        emojiButton.textContent = selectedEmoji;
        emojiPanel.hidden = true;
      }
    });

    document.getElementById('milestone-close').addEventListener('click', dismissCelebration);
    overlayEl.addEventListener('click', (event) => {
      if (event.target === overlayEl) {
        dismissCelebration();
      }
    });

    soundButton.addEventListener('click', () => {
      prefs.soundEnabled = !prefs.soundEnabled;
      updateSoundButton();
      playSound('click');
      savePrefs().catch(showError);
    });

    document.getElementById('export-btn').addEventListener('click', () => {
      playSound('click');
      window.location.href = '/api/export';
    });

    document.getElementById('import-btn').addEventListener('click', () => importInput.click());
    importInput.addEventListener('change', () => {
      const file = importInput.files[0];
      if (file) {
        importFile(file).catch(showError).finally(() => {
          importInput.value = '';
        });
      }
    });

    document.addEventListener('keydown', (event) => {
      if (event.ctrlKey && event.key === 'n') {
        event.preventDefault();
        openModal();
      } else if (event.key === 'Escape') {
        closeModal();
        dismissCelebration();
      }
    });

    loadPrefs().catch(showError);
    load().catch(showError);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewStreak, Streak, StreakCategory};
    use crate::streaks::create_streak_at;
    use chrono::NaiveDate;

    fn sample(name: &str, emoji: &str) -> Streak {
        create_streak_at(
            NewStreak {
                name: name.into(),
                description: None,
                emoji: emoji.into(),
                category: StreakCategory::Other,
            },
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        )
    }

    fn view(streak: Streak) -> StreakView {
        StreakView {
            streak,
            status: StreakStatus::Active,
            can_check_in: false,
            total_days: 1,
            success_rate: 100,
        }
    }

    #[test]
    fn render_index_replaces_every_placeholder() {
        let page = render_index(&[], &Preferences::default());
        assert!(!page.contains("{{"));
        assert!(page.contains("No streaks yet!"));
        assert!(page.contains("Streak Tracker"));
    }

    #[test]
    fn empty_state_hidden_once_a_card_exists() {
        let page = render_index(&[view(sample("Read", "\u{1F4DA}"))], &Preferences::default());
        assert!(page.contains("class=\"empty\" hidden"));
        assert!(page.contains("Read"));
        assert!(page.contains("\u{1F4DA}"));
    }

    #[test]
    fn card_escapes_user_markup() {
        let mut streak = sample("<script>alert(1)</script>", "\u{2728}");
        streak.description = Some("a \"quoted\" note".into());
        let page = render_index(&[view(streak)], &Preferences::default());
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("a &quot;quoted&quot; note"));
    }

    #[test]
    fn theme_preference_reaches_the_body_tag() {
        let prefs = Preferences {
            theme: Theme::Light,
            ..Preferences::default()
        };
        let page = render_index(&[], &prefs);
        assert!(page.contains("<body class=\"theme-light\">"));
    }

    #[test]
    fn check_in_button_disabled_when_already_done_today() {
        let page = render_index(&[view(sample("Gym", "\u{1F4AA}"))], &Preferences::default());
        assert!(page.contains("data-action=\"checkin\""));
        assert!(page.contains(" disabled>"));
    }

    #[test]
    fn dates_render_in_long_form() {
        let page = render_index(&[view(sample("Gym", "\u{1F4AA}"))], &Preferences::default());
        assert!(page.contains("Mar 1, 2026"));
    }
}
