use chrono::{DateTime, Utc};
use dashboard_core::{update, AppState, Effect, Job, JobPage, Msg, SelectionSet};

fn job(id: &str) -> Job {
    Job::queued(id, format!("https://{id}.test"), DateTime::<Utc>::UNIX_EPOCH)
}

fn jobs(ids: &[&str]) -> Vec<Job> {
    ids.iter().map(|id| job(id)).collect()
}

fn state_with_page(ids: &[&str]) -> AppState {
    let (state, effects) = update(AppState::new(), Msg::RefreshClicked);
    let Some(Effect::FetchPage(ticket)) = effects.into_iter().next() else {
        panic!("expected a refresh");
    };
    let result = Ok(JobPage {
        results: jobs(ids),
        total: ids.len() as u64,
    });
    update(state, Msg::PageLoaded { ticket, result }).0
}

fn selected(state: &AppState) -> Vec<String> {
    state.selection().ids().iter().cloned().collect()
}

#[test]
fn select_all_replaces_previous_selection() {
    let mut selection = SelectionSet::default();
    selection.toggle("z", true);
    selection.toggle("a", true);

    selection.select_all(&jobs(&["a", "b", "c"]));

    let ids: Vec<_> = selection.ids().iter().cloned().collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn all_selected_requires_every_visible_job() {
    let visible = jobs(&["a", "b"]);
    let mut selection = SelectionSet::default();
    assert!(!selection.all_selected(&visible));

    selection.toggle("a", true);
    assert!(!selection.all_selected(&visible));

    selection.toggle("b", true);
    assert!(selection.all_selected(&visible));

    // Extra off-page ids do not matter either way.
    selection.toggle("elsewhere", true);
    assert!(selection.all_selected(&visible));
}

#[test]
fn all_selected_is_false_for_empty_page() {
    let mut selection = SelectionSet::default();
    assert!(!selection.all_selected(&[]));
    selection.toggle("a", true);
    assert!(!selection.all_selected(&[]));
}

#[test]
fn toggle_adds_and_removes_single_ids() {
    let state = state_with_page(&["1", "2", "3"]);
    let (state, _) = update(
        state,
        Msg::RowToggled {
            id: "2".into(),
            included: true,
        },
    );
    let (state, _) = update(
        state,
        Msg::RowToggled {
            id: "3".into(),
            included: true,
        },
    );
    assert_eq!(selected(&state), vec!["2", "3"]);

    let (mut state, effects) = update(
        state,
        Msg::RowToggled {
            id: "2".into(),
            included: false,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(selected(&state), vec!["3"]);
    assert!(state.consume_dirty());
}

#[test]
fn select_all_checkbox_follows_visible_page() {
    let state = state_with_page(&["1", "2"]);
    let (state, _) = update(state, Msg::SelectAllToggled(true));
    let view = state.view();
    assert!(view.all_selected);
    assert_eq!(view.selected_count, 2);
    assert!(view.rows.iter().all(|row| row.selected));

    let (state, _) = update(
        state,
        Msg::RowToggled {
            id: "1".into(),
            included: false,
        },
    );
    assert!(!state.view().all_selected);

    let (state, _) = update(state, Msg::SelectAllToggled(false));
    assert!(state.selection().is_empty());
    assert!(!state.view().start_enabled);
}

#[test]
fn selection_survives_page_change() {
    let state = state_with_page(&["1", "2"]);
    let (state, _) = update(
        state,
        Msg::RowToggled {
            id: "1".into(),
            included: true,
        },
    );

    let (state, effects) = update(state, Msg::PageChanged(2));
    let Some(Effect::FetchPage(ticket)) = effects.into_iter().next() else {
        panic!("expected a refresh");
    };
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            ticket,
            result: Ok(JobPage {
                results: jobs(&["3"]),
                total: 3,
            }),
        },
    );

    assert_eq!(selected(&state), vec!["1"]);
    let view = state.view();
    assert_eq!(view.selected_count, 1);
    assert!(!view.all_selected);
    assert!(view.start_enabled);
}
