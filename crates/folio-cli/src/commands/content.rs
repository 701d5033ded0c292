use std::sync::Arc;

use anyhow::Result;
use folio_core::{CategoryFilter, ContentItem, ContentPatch, ContentType, NewContent, parse_tags};
use folio_engine::ContentLibrary;
use folio_storage::Storage;

use crate::cli::ContentCommands;

pub async fn handle(cmd: ContentCommands, storage: Arc<Storage>) -> Result<()> {
    let library = ContentLibrary::new(storage, true);
    match cmd {
        ContentCommands::List { content_type, all } => list(&library, content_type, all).await,
        ContentCommands::Get { id } => get(&library, &id).await,
        ContentCommands::Add {
            content_type,
            title,
            description,
            media_url,
            link,
            tags,
            hidden,
        } => {
            let mut content = NewContent::new(content_type.parse()?, title);
            content.description = description;
            content.media_url = media_url;
            content.external_link = link;
            content.tags = tags.as_deref().and_then(parse_tags);
            content.is_visible = !hidden;
            add(&library, content).await
        }
        ContentCommands::Edit {
            id,
            title,
            description,
            media_url,
            link,
            tags,
        } => {
            let patch = ContentPatch {
                title,
                description: description.map(clearable),
                media_url: media_url.map(clearable),
                external_link: link.map(clearable),
                tags: tags.map(|t| parse_tags(&t)),
                is_visible: None,
            };
            edit(&library, &id, patch).await
        }
        ContentCommands::Remove { id } => remove(&library, &id).await,
        ContentCommands::Show { id } => set_visible(&library, &id, true).await,
        ContentCommands::Hide { id } => set_visible(&library, &id, false).await,
    }
}

/// `--field ""` clears the field
fn clearable(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

fn print_item(item: &ContentItem) {
    let visibility = if item.is_visible { "" } else { " (hidden)" };
    println!("  [{}] {}{}", item.content_type, item.title, visibility);
    println!("    ID: {}", item.id);
    if let Some(link) = &item.external_link {
        println!("    Link: {}", link);
    }
    if let Some(url) = &item.media_url {
        println!("    Media: {}", url);
    }
    if let Some(tags) = &item.tags {
        println!("    Tags: {}", tags.join(", "));
    }
}

async fn list(library: &ContentLibrary, content_type: Option<String>, all: bool) -> Result<()> {
    let mut items = library.list(all).await?;
    if let Some(raw) = content_type {
        let content_type: ContentType = raw.parse()?;
        items.retain(|item| item.content_type == content_type);
    }

    if items.is_empty() {
        println!("No content found.");
        return Ok(());
    }

    println!("Content ({}):", items.len());
    for item in &items {
        print_item(item);
    }

    Ok(())
}

async fn get(library: &ContentLibrary, id: &str) -> Result<()> {
    let item = library.get(id).await?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}

async fn add(library: &ContentLibrary, content: NewContent) -> Result<()> {
    let item = library.create(content).await?;
    println!("✓ Created {} '{}'", item.content_type, item.title);
    println!("  ID: {}", item.id);
    Ok(())
}

async fn edit(library: &ContentLibrary, id: &str, patch: ContentPatch) -> Result<()> {
    if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    let item = library.update(id, patch).await?;
    println!("✓ Updated: {}", item.title);
    Ok(())
}

async fn remove(library: &ContentLibrary, id: &str) -> Result<()> {
    library.delete(id).await?;
    println!("✓ Deleted: {}", id);
    Ok(())
}

async fn set_visible(library: &ContentLibrary, id: &str, is_visible: bool) -> Result<()> {
    let item = library.toggle_visibility(id, is_visible).await?;
    let state = if item.is_visible { "visible" } else { "hidden" };
    println!("✓ {} is now {}", item.title, state);
    Ok(())
}

/// Cards as the public page shows them, seed certificates included
pub async fn projects(storage: Arc<Storage>, category: String) -> Result<()> {
    let filter: CategoryFilter = category.parse()?;
    let library = ContentLibrary::new(storage, false);
    library.refresh().await?;

    let cards = library.projects(filter).await;
    if cards.is_empty() {
        println!("No projects in this category.");
        return Ok(());
    }

    for card in cards {
        let marker = if card.plays_as_video() { " ▶" } else { "" };
        println!("  [{}] {}{}", card.category, card.title, marker);
        if !card.description.is_empty() {
            println!("    {}", card.description);
        }
        if let Some(link) = &card.link {
            println!("    {}", link);
        }
    }

    Ok(())
}
