use crate::checkin::{CheckInOutcome, GeneratedReply};
use crate::models::{CheckInEntry, Mood};
use std::fmt::Write;

pub struct PageView<'a> {
    pub selected: Option<Mood>,
    pub outcome: Option<&'a CheckInOutcome>,
    pub failure: Option<String>,
    /// Newest first; `Err` carries the load failure shown in place of the list.
    pub recent: Result<Vec<(String, CheckInEntry)>, String>,
}

impl Default for PageView<'_> {
    fn default() -> Self {
        Self {
            selected: None,
            outcome: None,
            failure: None,
            recent: Ok(Vec::new()),
        }
    }
}

// Placeholders are only looked up in the template itself, never in
// substituted text, so user input cannot expand into other sections.
pub fn render_index(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(INDEX_HTML.len() + 1024);
    let mut rest = INDEX_HTML;
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start..].find("}}") else {
            break;
        };
        html.push_str(&rest[..start]);
        match &rest[start + 2..start + len] {
            "MOOD_OPTIONS" => html.push_str(&mood_options(view.selected)),
            "NOTICE" => html.push_str(&notice(view.failure.as_deref())),
            "REPLY" => html.push_str(&view.outcome.map(reply).unwrap_or_default()),
            "RECENT" => html.push_str(&recent(&view.recent)),
            _ => html.push_str(&rest[start..start + len + 2]),
        }
        rest = &rest[start + len + 2..];
    }
    html.push_str(rest);
    html
}

fn mood_options(selected: Option<Mood>) -> String {
    let mut html = String::new();
    for mood in Mood::ALL {
        let marker = if Some(mood) == selected { " selected" } else { "" };
        let _ = writeln!(
            html,
            r#"<option value="{}"{marker}>{}</option>"#,
            mood.as_str(),
            mood.label()
        );
    }
    html
}

fn notice(failure: Option<&str>) -> String {
    match failure {
        Some(message) => format!(r#"<p class="notice error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

fn reply(outcome: &CheckInOutcome) -> String {
    let mut html = String::from(r#"<section class="reply"><p class="ok">VERA heard you.</p>"#);
    let _ = write!(
        html,
        "<p><strong>VERA ({}):</strong> {}</p>",
        outcome.tone(),
        escape(&outcome.response)
    );
    match &outcome.generated {
        GeneratedReply::Disabled => {}
        GeneratedReply::Reply(text) => {
            let _ = write!(html, r#"<p class="generated">{}</p>"#, escape(text));
        }
        GeneratedReply::Unavailable(_) => {
            html.push_str(r#"<p class="notice">A longer reflection is unavailable right now.</p>"#);
        }
    }
    html.push_str("</section>");
    html
}

fn recent(entries: &Result<Vec<(String, CheckInEntry)>, String>) -> String {
    let entries = match entries {
        Ok(entries) => entries,
        Err(message) => {
            return format!(
                r#"<p class="notice error">Recent check-ins could not be loaded: {}</p>"#,
                escape(message)
            );
        }
    };
    if entries.is_empty() {
        return r#"<p class="empty">No check-ins yet.</p>"#.to_string();
    }

    let mut html = String::from("<ul>");
    for (timestamp, entry) in entries {
        let _ = write!(
            html,
            "<li><strong>{}</strong> &mdash; Mood: {}, Focus: {}<br>\
             <em>{}</em><br>Tone: <code>{}</code></li>",
            escape(timestamp),
            entry.mood.label(),
            escape(&entry.focus),
            escape(&entry.note),
            entry.tone
        );
    }
    html.push_str("</ul>");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>VERA Check-In</title>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      background: #f5f5f5;
      color: #2b2a28;
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(680px, 100%);
      background: white;
      border-radius: 18px;
      padding: 32px;
      display: grid;
      gap: 20px;
    }

    form {
      display: grid;
      gap: 12px;
    }

    .notice {
      color: #5f5c57;
    }

    .notice.error {
      color: #b3261e;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>VERA - Daily Check-In</h1>
      <p>How are you feeling today?</p>
    </header>
    {{NOTICE}}
    <form method="post" action="/checkin">
      <label>Mood
        <select name="mood">
{{MOOD_OPTIONS}}        </select>
      </label>
      <label>What's your focus today?
        <input type="text" name="focus" />
      </label>
      <label>Anything on your mind?
        <textarea name="note" rows="4"></textarea>
      </label>
      <button type="submit">Submit Check-In</button>
    </form>
    {{REPLY}}
    <details open>
      <summary>Recent Check-Ins</summary>
      {{RECENT}}
    </details>
  </main>
</body>
</html>
"#;
