use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use dashboard_core::{AppViewModel, JobDetailsView, JobRowView};

const URL_WIDTH: usize = 36;
const TITLE_WIDTH: usize = 24;

/// Renders the whole screen as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    render_header(&mut out, view);
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}  (dismiss to hide)");
    }
    render_table(&mut out, view);
    render_actions(&mut out, view);
    if let Some(details) = &view.details {
        render_details(&mut out, details);
    }
    out
}

fn render_header(out: &mut String, view: &AppViewModel) {
    let search = if view.search_term.is_empty() {
        "-".to_string()
    } else {
        format!("{:?}", view.search_term)
    };
    let _ = writeln!(
        out,
        "Page {}/{} ({} per page, {} matching)  search: {}{}",
        view.page,
        view.total_pages,
        view.page_size,
        view.total_matching,
        search,
        if view.loading { "  [loading]" } else { "" }
    );
}

fn render_table(out: &mut String, view: &AppViewModel) {
    if view.rows.is_empty() {
        let _ = writeln!(out, "  (no jobs)");
        return;
    }
    let _ = writeln!(
        out,
        "{} #  {:<URL_WIDTH$}  {:<TITLE_WIDTH$}  {:<9}  {:>5}  {:>5}  {:>6}  {}",
        if view.all_selected { "[x]" } else { "[ ]" },
        "URL",
        "Title",
        "HTML",
        "Int",
        "Ext",
        "Broken",
        "Status"
    );
    for (index, row) in view.rows.iter().enumerate() {
        render_row(out, index + 1, row);
    }
}

fn render_row(out: &mut String, position: usize, row: &JobRowView) {
    let _ = writeln!(
        out,
        "{} {:<2} {:<URL_WIDTH$}  {:<TITLE_WIDTH$}  {:<9}  {:>5}  {:>5}  {:>6}  {}",
        if row.selected { "[x]" } else { "[ ]" },
        position,
        clip(&row.url, URL_WIDTH),
        clip(&row.title, TITLE_WIDTH),
        clip(&row.html_version, 9),
        row.internal_links,
        row.external_links,
        row.broken_links,
        row.status
    );
}

fn render_actions(out: &mut String, view: &AppViewModel) {
    let _ = writeln!(
        out,
        "{} selected  | add:{} start:{} delete:{} | prev:{} next:{}",
        view.selected_count,
        on_off(view.add_enabled),
        on_off(view.start_enabled),
        on_off(view.delete_enabled),
        on_off(view.has_prev),
        on_off(view.has_next)
    );
}

fn render_details(out: &mut String, details: &JobDetailsView) {
    let _ = writeln!(out, "--- {} ---", details.url);
    let _ = writeln!(out, "Title:        {}", details.title);
    let _ = writeln!(out, "HTML version: {}", details.html_version);
    let _ = writeln!(out, "Status:       {}", details.status);
    if let Some(error) = &details.error {
        let _ = writeln!(out, "Error:        {error}");
    }
    let _ = writeln!(out, "Created:      {}", local_time(details.created_at));
    let completed = details
        .completed_at
        .map(local_time)
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "Completed:    {completed}");
    let _ = writeln!(
        out,
        "Links:        {} internal ({:.1}%), {} external ({:.1}%)",
        details.internal_links,
        details.internal_share,
        details.external_links,
        details.external_share
    );
    let headings: Vec<String> = details
        .headings
        .iter()
        .map(|(level, count)| format!("{level}={count}"))
        .collect();
    let _ = writeln!(out, "Headings:     {}", headings.join(" "));
    let _ = writeln!(
        out,
        "Login form:   {}",
        if details.has_login_form { "yes" } else { "no" }
    );
    if details.broken_links.is_empty() {
        let _ = writeln!(out, "Broken links: none");
    } else {
        let _ = writeln!(out, "Broken links:");
        for link in &details.broken_links {
            let _ = writeln!(out, "  {} {} {}", link.status_code, link.url, link.error);
        }
    }
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}
