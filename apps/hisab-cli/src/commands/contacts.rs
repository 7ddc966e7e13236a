use hisab_flow::{ContactsPage, Route};

use crate::context::Context;

pub async fn cmd_contacts(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = ContactsPage::new(ctx.services());
    page.load().await?;

    println!("People:");
    match page.people_placeholder() {
        Some(text) => println!("  {}", text),
        None => {
            for user in page.contacts().map(|c| c.users.as_slice()).unwrap_or_default() {
                let route = Route::Person(user.id.clone());
                println!("  [{}] {}  {}", user.initial(), user.label(), route);
            }
        }
    }

    println!("Groups:");
    match page.groups_placeholder() {
        Some(text) => println!("  {}", text),
        None => {
            for group in page.contacts().map(|c| c.groups.as_slice()).unwrap_or_default() {
                let route = Route::Group(group.id.clone());
                println!(
                    "  {} ({} members)  {}",
                    group.name, group.member_count, route
                );
            }
        }
    }

    Ok(())
}
