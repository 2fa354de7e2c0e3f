//! Terminal command parsing.
//!
//! Rows can be addressed by their 1-based position on the current page or
//! by job id.

use dashboard_core::{AppViewModel, JobId, Msg};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  add <url>            queue a new analysis
  search [text]        filter by url or title (empty clears)
  page <n> | next | prev
  size <n>             rows per page (1-100)
  refresh              reload the current page
  select <row|id>...   tick rows        unselect <row|id>...
  all | none           tick or clear every row on the page
  start | delete       act on the ticked rows
  show <row|id>        open details     close
  dismiss              hide the current error
  help | quit";

pub fn parse(line: &str, view: &AppViewModel) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Dispatch(Vec::new()),
        "add" => Command::Dispatch(vec![Msg::UrlSubmitted(rest.to_string())]),
        "search" => Command::Dispatch(vec![Msg::SearchChanged(rest.to_string())]),
        "page" => match rest.parse() {
            Ok(page) => Command::Dispatch(vec![Msg::PageChanged(page)]),
            Err(_) => Command::Invalid(format!("not a page number: {rest:?}")),
        },
        "next" if view.has_next => Command::Dispatch(vec![Msg::PageChanged(view.page + 1)]),
        "next" => Command::Invalid("already on the last page".to_string()),
        "prev" if view.has_prev => Command::Dispatch(vec![Msg::PageChanged(view.page - 1)]),
        "prev" => Command::Invalid("already on the first page".to_string()),
        "size" => match rest.parse() {
            Ok(size) => Command::Dispatch(vec![Msg::PageSizeChanged(size)]),
            Err(_) => Command::Invalid(format!("not a page size: {rest:?}")),
        },
        "refresh" => Command::Dispatch(vec![Msg::RefreshClicked]),
        "select" => toggle_rows(rest, view, true),
        "unselect" => toggle_rows(rest, view, false),
        "all" => Command::Dispatch(vec![Msg::SelectAllToggled(true)]),
        "none" => Command::Dispatch(vec![Msg::SelectAllToggled(false)]),
        "start" => Command::Dispatch(vec![Msg::StartClicked]),
        "delete" => Command::Dispatch(vec![Msg::DeleteClicked]),
        "show" => match resolve_row(rest, view) {
            Ok(id) => Command::Dispatch(vec![Msg::DetailsRequested(id)]),
            Err(message) => Command::Invalid(message),
        },
        "close" => Command::Dispatch(vec![Msg::DetailsClosed]),
        "dismiss" => Command::Dispatch(vec![Msg::ErrorDismissed]),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command {other:?}, try help")),
    }
}

fn toggle_rows(args: &str, view: &AppViewModel, included: bool) -> Command {
    if args.is_empty() {
        return Command::Invalid("name at least one row".to_string());
    }
    let mut msgs = Vec::new();
    for target in args.split_whitespace() {
        match resolve_row(target, view) {
            Ok(id) => msgs.push(Msg::RowToggled { id, included }),
            Err(message) => return Command::Invalid(message),
        }
    }
    Command::Dispatch(msgs)
}

fn resolve_row(target: &str, view: &AppViewModel) -> Result<JobId, String> {
    if target.is_empty() {
        return Err("name a row number or job id".to_string());
    }
    if let Ok(position) = target.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| view.rows.get(index))
            .map(|row| row.id.clone())
            .ok_or_else(|| format!("no row {position} on this page"));
    }
    // Ids of jobs off the current page are passed through as-is.
    Ok(target.to_string())
}
