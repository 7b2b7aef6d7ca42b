use super::{Prompt, Repositories};
use crate::errors::Result;
use std::io::{BufRead, Write};

pub(super) async fn list<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    match repos.categories.list_all().await {
        Ok(categories) => {
            prompt.say(format!("📋 {} categories", categories.len()))?;
            for category in categories {
                prompt.say(format!("  [{}] {}", category.id, category.name))?;
            }
            Ok(())
        }
        Err(e) => prompt.fail("list categories", &e),
    }
}

pub(super) async fn find_by_id<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(id) = prompt.ask_id("Category ID")? else {
        return Ok(());
    };
    match repos.categories.get_by_id(id).await {
        Ok(Some(category)) => prompt.say(format!("  [{}] {}", category.id, category.name)),
        Ok(None) => prompt.say(format!("❌ Category {id} not found")),
        Err(e) => prompt.fail("find category", &e),
    }
}

pub(super) async fn find_by_name<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(name) = prompt.ask("Name")? else {
        return Ok(());
    };
    match repos.categories.get_by_name(&name).await {
        Ok(Some(category)) => prompt.say(format!("  [{}] {}", category.id, category.name)),
        Ok(None) => prompt.say(format!("❌ No category named '{name}'")),
        Err(e) => prompt.fail("find category", &e),
    }
}

pub(super) async fn create<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(name) = prompt.ask("Name")? else {
        return Ok(());
    };
    match repos.categories.create(&name).await {
        Ok(category) => prompt.say(format!("✅ Category created with ID {}", category.id)),
        Err(e) => prompt.fail("create category", &e),
    }
}

pub(super) async fn rename<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(id) = prompt.ask_id("Category ID")? else {
        return Ok(());
    };
    let Some(name) = prompt.ask("New name")? else {
        return Ok(());
    };
    match repos.categories.update(id, &name).await {
        Ok(category) => prompt.say(format!("✅ Category {} is now '{}'", category.id, category.name)),
        Err(e) => prompt.fail("rename category", &e),
    }
}

pub(super) async fn delete<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(id) = prompt.ask_id("Category ID")? else {
        return Ok(());
    };
    match repos.categories.delete(id).await {
        Ok(()) => prompt.say(format!("✅ Category {id} deleted")),
        Err(e) => prompt.fail("delete category", &e),
    }
}
