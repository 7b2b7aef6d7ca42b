use super::{Prompt, Repositories};
use crate::{
    core::{
        MonthlyTotals,
        report::{Totals, format_amount},
    },
    errors::Result,
};
use std::io::{BufRead, Write};

fn month_line(month: &str, totals: &Totals) -> String {
    format!(
        "  {month} | income {} | expense {} | balance {}",
        format_amount(totals.income),
        format_amount(totals.expense),
        format_amount(totals.balance()),
    )
}

fn print_months<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    months: &MonthlyTotals,
) -> Result<()> {
    if months.is_empty() {
        return prompt.say("No transactions yet.");
    }
    for (month, totals) in months {
        prompt.say(month_line(month, totals))?;
    }
    Ok(())
}

/// Reports fall back to zero totals when the store cannot be read; the failure is
/// already logged by the repository.
pub(super) async fn dashboard<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let totals = repos
        .transactions
        .totals_by_type()
        .await
        .unwrap_or_default();

    prompt.say("📊 Dashboard")?;
    prompt.say(format!("  Income:  {}", format_amount(totals.income)))?;
    prompt.say(format!("  Expense: {}", format_amount(totals.expense)))?;
    prompt.say(format!("  Balance: {}", format_amount(totals.balance())))
}

pub(super) async fn monthly<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let months = repos
        .transactions
        .totals_by_month()
        .await
        .unwrap_or_default();

    prompt.say("📅 Monthly totals")?;
    print_months(prompt, &months)
}

pub(super) async fn category_monthly<R: BufRead, W: Write>(
    repos: &Repositories,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let Some(id) = prompt.ask_id("Category ID")? else {
        return Ok(());
    };
    let category = match repos.categories.get_by_id(id).await {
        Ok(Some(category)) => category,
        Ok(None) => return prompt.say(format!("❌ Category {id} not found")),
        Err(e) => return prompt.fail("build category report", &e),
    };

    match repos.transactions.totals_by_category(id).await {
        Ok(months) => {
            prompt.say(format!("📅 Monthly report for '{}'", category.name))?;
            print_months(prompt, &months)
        }
        Err(e) => prompt.fail("build category report", &e),
    }
}
