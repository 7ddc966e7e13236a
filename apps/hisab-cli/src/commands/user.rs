use hisab_api::QueryService;
use hisab_flow::{MemberSearch, SearchState};
use hisab_model::{Member, UserId};
use std::sync::Arc;

use super::SEARCH_TIMEOUT;
use crate::context::Context;

pub fn cmd_user_add(
    ctx: &Context,
    id: &str,
    name: &str,
    email: Option<String>,
    image_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if id.is_empty() || name.is_empty() {
        return Err("User id and name must not be empty".into());
    }

    let mut member = Member::new(id, name);
    member.email = email;
    member.image_url = image_url;

    let existed = ctx.service.find_user(&member.id).is_some();
    ctx.service.upsert_user(member.clone());
    ctx.save_data()?;

    let verb = if existed { "Updated" } else { "Added" };
    println!("{} user: {}", verb, member.label());
    println!("  ID: {}", member.id);

    Ok(())
}

pub fn cmd_user_list(ctx: &Context) {
    let users = ctx.service.users();
    if users.is_empty() {
        println!("No users found");
        return;
    }

    let current = ctx.config.current_user.as_deref();
    println!("Users:");
    for user in users {
        let marker = if Some(user.id.as_str()) == current {
            "*"
        } else {
            " "
        };
        println!("{} {} - {}", marker, user.id, user.label());
    }
}

pub fn cmd_user_use(ctx: &mut Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let user = ctx
        .service
        .find_user(&UserId::from(id))
        .ok_or_else(|| format!("User '{}' not found", id))?;

    ctx.config.current_user = Some(id.to_string());
    ctx.save_config()?;

    println!("✓ Now acting as {}", user.label());
    Ok(())
}

pub async fn cmd_user_whoami(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let me = ctx.service.get_current_user().await?;
    println!("[{}] {} (you)", me.initial(), me.label());
    println!("  ID: {}", me.id);
    Ok(())
}

pub async fn cmd_user_search(ctx: &Context, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut search = MemberSearch::new(Arc::new(ctx.service.clone()))
        .with_min_chars(ctx.config.search_min_chars);
    search.set_query(query);

    if !matches!(search.state(), SearchState::QueryTooShort { .. }) {
        tokio::time::timeout(SEARCH_TIMEOUT, search.changed())
            .await
            .map_err(|_| format!("Search for '{}' timed out", query))?;
    }

    let state = search.state();
    match state {
        SearchState::Results(members) if !members.is_empty() => {
            for member in members {
                println!("[{}] {}  ({})", member.initial(), member.label(), member.id);
            }
        }
        _ => println!("{}", state.placeholder().unwrap_or_default()),
    }

    Ok(())
}
