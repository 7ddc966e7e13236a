use hisab_flow::{ContactsPage, CreateGroupModal, SearchState, SubmitError};
use hisab_model::Member;

use super::SEARCH_TIMEOUT;
use crate::context::Context;

pub async fn cmd_group_create(
    ctx: &Context,
    name: &str,
    description: Option<String>,
    members: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page =
        ContactsPage::new(ctx.services()).with_min_search_chars(ctx.config.search_min_chars);
    page.open_create_group().await?;

    let modal = page.modal_mut();
    modal.set_name(name);
    if let Some(description) = description {
        modal.set_description(description);
    }

    for query in members {
        let member = resolve_member(modal, query).await?;
        if !modal.add_member(member.clone()) {
            println!("  {} is already a member", member.label());
        }
    }
    if let Some(warning) = modal.member_warning() {
        return Err(warning.into());
    }

    let id = match page.submit_group().await {
        Ok(id) => id,
        // Already reported by the notifier
        Err(SubmitError::Remote(_)) => return Err("Group was not created".into()),
        Err(e) => return Err(e.into()),
    };
    ctx.save_data()?;

    println!("Created group: {}", name);
    println!("  ID: {}", id);
    Ok(())
}

/// Find one member through the picker's search.
async fn resolve_member(
    modal: &mut CreateGroupModal,
    query: &str,
) -> Result<Member, Box<dyn std::error::Error>> {
    modal.set_search_query(query);
    if let Some(text) = too_short(&modal.search_state()) {
        return Err(format!("'{}': {}", query, text).into());
    }

    // A repeated query keeps its live subscription and its results
    modal.apply_search_results();
    if modal.search_state() == SearchState::InFlight {
        tokio::time::timeout(SEARCH_TIMEOUT, modal.search_changed())
            .await
            .map_err(|_| format!("Search for '{}' timed out", query))?;
    }

    match modal.search_state() {
        SearchState::Results(candidates) => Ok(pick_member(query, candidates)?.clone()),
        _ => Err(format!("No users found for '{}'", query).into()),
    }
}

fn too_short(state: &SearchState<'_>) -> Option<String> {
    match state {
        SearchState::QueryTooShort { .. } => state.placeholder(),
        _ => None,
    }
}

/// Exact id, email or name match wins; otherwise the query must be unambiguous.
fn pick_member<'a>(query: &str, candidates: &'a [Member]) -> Result<&'a Member, String> {
    let exact: Vec<&Member> = candidates
        .iter()
        .filter(|m| {
            m.id.as_str() == query
                || m.name.eq_ignore_ascii_case(query)
                || m.email
                    .as_deref()
                    .is_some_and(|email| email.eq_ignore_ascii_case(query))
        })
        .collect();

    match (exact.as_slice(), candidates) {
        ([only], _) => Ok(*only),
        (_, [only]) => Ok(only),
        (_, []) => Err(format!("No users found for '{}'", query)),
        (_, many) => {
            let labels: Vec<String> = many.iter().map(Member::label).collect();
            Err(format!(
                "'{}' matches {} users ({}); be more specific",
                query,
                many.len(),
                labels.join(", ")
            ))
        }
    }
}
