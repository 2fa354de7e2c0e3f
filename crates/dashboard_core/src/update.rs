use crate::{
    AppState, CommandError, Effect, Msg, Operation, QueryState, ServiceError, ValidationError,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchChanged(term) => match state.query.with_search_term(term) {
            Some(query) => vec![state.set_query(query)],
            None => Vec::new(),
        },
        Msg::PageChanged(page) => {
            let next = state.query.with_page(page);
            change_query(&mut state, next)
        }
        Msg::PageSizeChanged(page_size) => {
            let next = state.query.with_page_size(page_size);
            change_query(&mut state, next)
        }
        Msg::RefreshClicked => vec![state.issue_refresh()],
        Msg::UrlSubmitted(raw) => {
            let issued = state.dispatcher.add_job(&raw);
            command(&mut state, Operation::AddJob, issued)
        }
        Msg::RowToggled { id, included } => {
            state.selection.toggle(&id, included);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SelectAllToggled(checked) => {
            if checked {
                state.selection.select_all(state.collection.items());
            } else {
                state.selection.deselect_all();
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::StartClicked => {
            let issued = state.dispatcher.start_crawling(&state.selection);
            command(&mut state, Operation::StartCrawling, issued)
        }
        Msg::DeleteClicked => {
            let issued = state.dispatcher.delete_jobs(&state.selection);
            command(&mut state, Operation::DeleteJobs, issued)
        }
        Msg::DetailsRequested(id) => vec![state.request_details(id)],
        Msg::DetailsClosed => {
            state.close_details();
            Vec::new()
        }
        Msg::ErrorDismissed => {
            state.dismiss_notice();
            Vec::new()
        }
        Msg::PageLoaded { ticket, result } => {
            state.apply_page(ticket, result);
            Vec::new()
        }
        Msg::JobCreated(result) => {
            let outcome = state.dispatcher.job_created(&mut state.collection, result);
            settle(&mut state, Operation::AddJob, outcome)
        }
        Msg::StartFinished { ids, result } => {
            let outcome = state.dispatcher.start_finished(
                &mut state.collection,
                &mut state.selection,
                &ids,
                result,
            );
            if outcome.is_ok() {
                state.sync_details();
            }
            settle(&mut state, Operation::StartCrawling, outcome)
        }
        Msg::DeleteFinished { ids, result } => {
            let outcome = state.dispatcher.delete_finished(
                &mut state.collection,
                &mut state.selection,
                &ids,
                result,
            );
            if outcome.is_ok() && state.is_showing_details_of(&ids) {
                state.close_details();
            }
            settle(&mut state, Operation::DeleteJobs, outcome)
        }
        Msg::DetailsLoaded { id, result } => {
            state.apply_details(id, result);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn change_query(
    state: &mut AppState,
    next: Result<Option<QueryState>, ValidationError>,
) -> Vec<Effect> {
    match next {
        Ok(Some(query)) => vec![state.set_query(query)],
        Ok(None) => Vec::new(),
        Err(err) => {
            state.report(Operation::ChangeQuery, err.into());
            Vec::new()
        }
    }
}

fn command(
    state: &mut AppState,
    operation: Operation,
    issued: Result<Option<Effect>, ValidationError>,
) -> Vec<Effect> {
    match issued {
        Ok(Some(effect)) => {
            state.mark_dirty();
            vec![effect]
        }
        // Same class of command already in flight.
        Ok(None) => Vec::new(),
        Err(err) => {
            state.report(operation, err.into());
            Vec::new()
        }
    }
}

fn settle<T>(
    state: &mut AppState,
    operation: Operation,
    outcome: Result<T, ServiceError>,
) -> Vec<Effect> {
    state.mark_dirty();
    match outcome {
        Ok(_) => {
            state.clear_notice(operation);
            state.supersede_pending_refresh().into_iter().collect()
        }
        Err(err) => {
            state.report(operation, CommandError::from(err));
            Vec::new()
        }
    }
}
