//! Interactive terminal front end.
//!
//! A numbered menu read from any [`BufRead`] and written to any [`Write`], so the
//! same loop drives stdin/stdout in `main` and in-memory buffers in tests. Input
//! ends the session at end-of-file. Failures of an individual action are printed
//! and the menu continues; only I/O errors on the terminal itself end the loop.

/// Category actions
mod category;
/// Dashboard and monthly reports
mod report;
/// Transaction actions
mod transaction;

use crate::{
    core::{CategoryRepository, TransactionRepository},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, prelude::Date};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

const MENU: &str = "\
==================================================
PERSONAL FINANCE
==================================================
 1. List categories
 2. Find category by ID
 3. Find category by name
 4. Create category
 5. Rename category
 6. Delete category
 7. Add transaction
 8. List transactions
 9. Edit transaction
10. Delete transaction
11. Dashboard
12. Monthly totals
13. Category monthly report
 0. Quit
--------------------------------------------------";

/// The two repositories the menu works against, sharing one connection pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Category CRUD
    pub categories: CategoryRepository,
    /// Transaction CRUD and reports
    pub transactions: TransactionRepository,
}

impl Repositories {
    /// Builds both repositories over `db`.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        let db = db.into();
        Self {
            categories: CategoryRepository::new(Arc::clone(&db)),
            transactions: TransactionRepository::new(db),
        }
    }

    /// Closes the shared connection pool.
    pub async fn close(self) -> Result<()> {
        drop(self.categories);
        self.transactions.close().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    ListCategories,
    FindCategoryById,
    FindCategoryByName,
    CreateCategory,
    RenameCategory,
    DeleteCategory,
    AddTransaction,
    ListTransactions,
    EditTransaction,
    DeleteTransaction,
    Dashboard,
    MonthlyTotals,
    CategoryReport,
    Quit,
}

impl MenuAction {
    fn from_choice(choice: &str) -> Option<Self> {
        Some(match choice.trim() {
            "1" => Self::ListCategories,
            "2" => Self::FindCategoryById,
            "3" => Self::FindCategoryByName,
            "4" => Self::CreateCategory,
            "5" => Self::RenameCategory,
            "6" => Self::DeleteCategory,
            "7" => Self::AddTransaction,
            "8" => Self::ListTransactions,
            "9" => Self::EditTransaction,
            "10" => Self::DeleteTransaction,
            "11" => Self::Dashboard,
            "12" => Self::MonthlyTotals,
            "13" => Self::CategoryReport,
            "0" => Self::Quit,
            _ => return None,
        })
    }
}

/// Runs the menu until the user quits or `input` is exhausted.
///
/// # Errors
/// Only I/O failures on `input`/`output` are returned.
pub async fn run<R: BufRead, W: Write>(repos: &Repositories, input: R, output: W) -> Result<()> {
    let mut prompt = Prompt::new(input, output);

    loop {
        prompt.say(MENU)?;
        let Some(choice) = prompt.ask("Choose an option")? else {
            break;
        };
        let Some(action) = MenuAction::from_choice(&choice) else {
            prompt.say("❌ Invalid option")?;
            continue;
        };

        match action {
            MenuAction::ListCategories => category::list(repos, &mut prompt).await?,
            MenuAction::FindCategoryById => category::find_by_id(repos, &mut prompt).await?,
            MenuAction::FindCategoryByName => category::find_by_name(repos, &mut prompt).await?,
            MenuAction::CreateCategory => category::create(repos, &mut prompt).await?,
            MenuAction::RenameCategory => category::rename(repos, &mut prompt).await?,
            MenuAction::DeleteCategory => category::delete(repos, &mut prompt).await?,
            MenuAction::AddTransaction => transaction::add(repos, &mut prompt).await?,
            MenuAction::ListTransactions => transaction::list(repos, &mut prompt).await?,
            MenuAction::EditTransaction => transaction::edit(repos, &mut prompt).await?,
            MenuAction::DeleteTransaction => transaction::delete(repos, &mut prompt).await?,
            MenuAction::Dashboard => report::dashboard(repos, &mut prompt).await?,
            MenuAction::MonthlyTotals => report::monthly(repos, &mut prompt).await?,
            MenuAction::CategoryReport => report::category_monthly(repos, &mut prompt).await?,
            MenuAction::Quit => break,
        }
    }

    prompt.say("Bye.")?;
    Ok(())
}

/// What the user typed in answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply<T> {
    Value(T),
    /// Empty line
    Blank,
    /// End of input, or a line that did not parse
    Abort,
}

/// Line-oriented question/answer over a reader and a writer.
#[derive(Debug)]
struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn fail(&mut self, action: &str, err: &Error) -> Result<()> {
        self.say(format!("❌ Could not {action}: {}", err.user_message()))
    }

    /// Reads one trimmed line. `None` at end of input.
    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Reads and parses one value, reporting `what` when it does not parse.
    fn ask_value<T>(
        &mut self,
        label: &str,
        what: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Reply<T>> {
        let Some(line) = self.ask(label)? else {
            return Ok(Reply::Abort);
        };
        if line.is_empty() {
            return Ok(Reply::Blank);
        }
        match parse(&line) {
            Some(value) => Ok(Reply::Value(value)),
            None => {
                self.say(format!("❌ Invalid {what}: '{line}'"))?;
                Ok(Reply::Abort)
            }
        }
    }

    /// Like [`Self::ask_value`] for a field that cannot be left blank.
    fn ask_required<T>(
        &mut self,
        label: &str,
        what: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.ask_value(label, what, parse)? {
            Reply::Value(value) => Ok(Some(value)),
            Reply::Blank => {
                self.say(format!("❌ A {what} is required"))?;
                Ok(None)
            }
            Reply::Abort => Ok(None),
        }
    }

    fn ask_id(&mut self, label: &str) -> Result<Option<i64>> {
        self.ask_required(label, "ID", parse_id)
    }
}

fn parse_id(input: &str) -> Option<i64> {
    input.parse().ok()
}

/// Accepts `YYYY-MM-DD` or `DD-MM-YYYY`.
fn parse_date(input: &str) -> Option<Date> {
    Date::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| Date::parse_from_str(input, "%d-%m-%Y"))
        .ok()
}

/// Accepts a point or a comma as the decimal separator.
fn parse_amount(input: &str) -> Option<Decimal> {
    Decimal::from_str(&input.replace(',', ".")).ok()
}
