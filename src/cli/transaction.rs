use super::{Prompt, Reply, Repositories, parse_amount, parse_date};
use crate::{
    core::{NewTransaction, TransactionPatch, report::format_transaction_summary},
    entities::TransactionType,
    errors::Result,
};
use std::io::{BufRead, Write};
use std::ops::ControlFlow;

fn text(input: &str) -> Option<String> {
    Some(input.to_string())
}

/// `Break` abandons the edit, `Continue(None)` keeps the stored value.
fn keep_or_set<T>(reply: Reply<T>) -> ControlFlow<(), Option<T>> {
    match reply {
        Reply::Value(value) => ControlFlow::Continue(Some(value)),
        Reply::Blank => ControlFlow::Continue(None),
        Reply::Abort => ControlFlow::Break(()),
    }
}

pub(super) async fn add<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(category_id) = prompt.ask_id("Category ID")? else {
        return Ok(());
    };
    match repos.categories.get_by_id(category_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return prompt.say(format!("❌ Category {category_id} not found")),
        Err(e) => return prompt.fail("add transaction", &e),
    }

    let ControlFlow::Continue(description) =
        keep_or_set(prompt.ask_value("Description", "description", text)?)
    else {
        return Ok(());
    };
    let Some(transaction_date) =
        prompt.ask_required("Date (YYYY-MM-DD or DD-MM-YYYY)", "date", parse_date)?
    else {
        return Ok(());
    };
    let Some(transaction_value) = prompt.ask_required("Amount", "amount", parse_amount)? else {
        return Ok(());
    };
    let Some(kind) =
        prompt.ask_required("Type (income/expense)", "type", TransactionType::from_label)?
    else {
        return Ok(());
    };

    let new = NewTransaction {
        description,
        transaction_date,
        transaction_value,
        kind,
        category_id,
    };
    match repos.transactions.create(new).await {
        Ok(created) => prompt.say(format!("✅ Transaction created with ID {}", created.id)),
        Err(e) => prompt.fail("add transaction", &e),
    }
}

pub(super) async fn list<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    match repos.transactions.list_with_categories(true).await {
        Ok(rows) => {
            prompt.say(format!("📋 {} transactions", rows.len()))?;
            for (transaction, category) in rows {
                let name = category.as_ref().map(|c| c.name.as_str());
                prompt.say(format!("  {}", format_transaction_summary(&transaction, name)))?;
            }
            Ok(())
        }
        Err(e) => prompt.fail("list transactions", &e),
    }
}

pub(super) async fn edit<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(id) = prompt.ask_id("Transaction ID")? else {
        return Ok(());
    };
    let current = match repos.transactions.get_by_id(id).await {
        Ok(Some(current)) => current,
        Ok(None) => return prompt.say(format!("❌ Transaction {id} not found")),
        Err(e) => return prompt.fail("edit transaction", &e),
    };
    prompt.say(format!("  {}", format_transaction_summary(&current, None)))?;
    prompt.say("Leave a field blank to keep its current value.")?;

    let mut patch = TransactionPatch::new(id);

    let label = format!(
        "Description [{}]",
        current.description.as_deref().unwrap_or("")
    );
    let ControlFlow::Continue(description) =
        keep_or_set(prompt.ask_value(&label, "description", text)?)
    else {
        return Ok(());
    };
    patch.description = description;

    let label = format!("Date [{}]", current.transaction_date.format("%Y-%m-%d"));
    let ControlFlow::Continue(date) = keep_or_set(prompt.ask_value(&label, "date", parse_date)?)
    else {
        return Ok(());
    };
    patch.transaction_date = date;

    let label = format!("Amount [{}]", current.transaction_value);
    let ControlFlow::Continue(value) =
        keep_or_set(prompt.ask_value(&label, "amount", parse_amount)?)
    else {
        return Ok(());
    };
    patch.transaction_value = value;

    let label = format!("Type [{}]", current.kind);
    let ControlFlow::Continue(kind) =
        keep_or_set(prompt.ask_value(&label, "type", TransactionType::from_label)?)
    else {
        return Ok(());
    };
    patch.kind = kind;

    let label = format!("Category ID [{}]", current.category_id);
    let ControlFlow::Continue(category_id) =
        keep_or_set(prompt.ask_value(&label, "ID", super::parse_id)?)
    else {
        return Ok(());
    };
    patch.category_id = category_id;

    if patch.is_empty() {
        return prompt.say("Nothing to change.");
    }
    match repos.transactions.update(patch).await {
        Ok(updated) => {
            prompt.say("✅ Transaction updated")?;
            prompt.say(format!("  {}", format_transaction_summary(&updated, None)))
        }
        Err(e) => prompt.fail("edit transaction", &e),
    }
}

pub(super) async fn delete<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(id) = prompt.ask_id("Transaction ID")? else {
        return Ok(());
    };
    match repos.transactions.delete(id).await {
        Ok(()) => prompt.say(format!("✅ Transaction {id} deleted")),
        Err(e) => prompt.fail("delete transaction", &e),
    }
}
