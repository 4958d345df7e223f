//! HTML templates for the web interface.

use crate::error::InsightError;
use crate::models::{InsightResult, PromptMode, Study};
use crate::utils::html_escape;

/// One-line status message shown above a form.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    fn render(&self) -> String {
        let class = if self.is_error { "notice-error" } else { "notice-ok" };
        format!(r#"<p class="{}">{}</p>"#, class, html_escape(&self.text))
    }
}

/// Values to pre-fill the snippet form with.
#[derive(Debug, Clone)]
pub struct SnippetForm<'a> {
    pub snippet: &'a str,
    pub mode: PromptMode,
    pub objective: &'a str,
}

/// Base HTML page. `title` is escaped; `content` is inserted as-is.
pub fn base_template(title: &str, content: &str) -> String {
    let title = html_escape(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Interview Insights</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">Interview Insights</a>
            <a href="/">studies</a>
        </nav>
    </header>
    <main>
        <h1>{}</h1>
        {}
    </main>
</body>
</html>"#,
        title, title, content
    )
}

/// Home page body: API key panel and the study list.
pub fn home(studies: &[Study], has_key: bool, notice: Option<&Notice>) -> String {
    let status = if has_key {
        "API key is set and ready."
    } else {
        "No API key set yet."
    };
    let notice = notice.map(Notice::render).unwrap_or_default();

    let mut cards = String::new();
    for study in studies {
        cards.push_str(&format!(
            r#"<a class="panel study-card" href="/studies/{}">
                <h3>{}</h3>
                <p>{}</p>
                <p class="muted">Persona: {}</p>
            </a>"#,
            html_escape(&study.id),
            html_escape(&study.title),
            html_escape(&study.description),
            html_escape(&study.persona),
        ));
    }

    format!(
        r#"<section class="panel">
            <h2>API key</h2>
            <p class="muted">The key is validated, then stored in the local data directory with owner-only permissions.</p>
            <p>{}</p>
            <form method="post" action="/key">
                <input type="password" name="key" placeholder="sk-..." autocomplete="off">
                <button type="submit">Validate &amp; Save</button>
            </form>
            <form method="post" action="/key/clear">
                <button type="submit" class="link">Clear stored key</button>
            </form>
            {}
        </section>
        <section>
            <p class="muted">Select a study, paste an interview snippet, and generate a summary with key themes.</p>
            <div class="study-grid">{}</div>
        </section>"#,
        status, notice, cards
    )
}

fn mode_options(selected: PromptMode) -> String {
    PromptMode::ALL
        .iter()
        .map(|mode| {
            let attr = if *mode == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                mode.as_str(),
                attr,
                mode.as_str()
            )
        })
        .collect()
}

fn insights_panel(result: &InsightResult) -> String {
    let summary = if result.summary.is_empty() {
        r#"<p class="muted">No summary returned.</p>"#.to_string()
    } else {
        format!("<p>{}</p>", html_escape(&result.summary))
    };

    let themes = if result.themes.is_empty() {
        r#"<p class="muted">No themes returned.</p>"#.to_string()
    } else {
        let items: String = result
            .themes
            .iter()
            .map(|t| {
                format!(
                    "<li><strong>{}</strong><br><span class=\"muted\">{}</span></li>",
                    html_escape(&t.title),
                    html_escape(&t.description)
                )
            })
            .collect();
        format!(r#"<ul class="themes">{}</ul>"#, items)
    };

    format!(
        r#"<section class="panel">
            <h2>Summary</h2>
            {}
            <h2>Key themes</h2>
            {}
        </section>"#,
        summary, themes
    )
}

/// Study page body: study details, snippet form, and the last outcome.
pub fn study_detail(
    study: &Study,
    form: &SnippetForm<'_>,
    outcome: Option<&Result<InsightResult, InsightError>>,
) -> String {
    let (notice, insights) = match outcome {
        Some(Ok(result)) => (String::new(), insights_panel(result)),
        Some(Err(e)) => (Notice::error(e.to_string()).render(), String::new()),
        None => (String::new(), String::new()),
    };

    format!(
        r#"<p><a href="/">&larr; All studies</a></p>
        <section class="panel">
            <p>{}</p>
            <p class="muted">Persona: {}</p>
        </section>
        <section class="panel">
            <form method="post" action="/studies/{}">
                <label for="snippet">Interview snippet</label>
                <textarea id="snippet" name="snippet" placeholder="Paste a short excerpt from a user interview...">
{}</textarea>
                <label for="mode">Prompt mode</label>
                <select id="mode" name="mode">{}</select>
                <label for="objective">Research objective (optional)</label>
                <input id="objective" name="objective" value="{}">
                <button type="submit">Generate insights</button>
            </form>
            {}
        </section>
        {}"#,
        html_escape(&study.description),
        html_escape(&study.persona),
        html_escape(&study.id),
        html_escape(form.snippet),
        mode_options(form.mode),
        html_escape(form.objective),
        notice,
        insights
    )
}

/// Not-found page body.
pub fn not_found(message: &str) -> String {
    format!(
        r#"<p class="notice-error">{}</p>
        <p><a href="/">&larr; All studies</a></p>"#,
        html_escape(message)
    )
}
