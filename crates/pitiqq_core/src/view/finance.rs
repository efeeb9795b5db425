//! Finance view-models: monthly ledger totals, budget utilization, goal
//! progress and the currency account summary.
//!
//! # Invariants
//! - A movement belongs to month `M` when its date starts with `M`
//!   (`YYYY-MM`).
//! - Category breakdowns follow catalog order and omit zero totals;
//!   unknown category ids are folded into the catalog's "other" entry.
//! - Budget `remaining` is never negative.

use super::{clamped_percentage, rounded_percentage};
use crate::model::catalog::{Catalog, Category, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
use crate::model::finance::{Budget, DollarAccount, DollarOperationKind, Goal, Movement, MovementKind};
use crate::model::record::RecordId;
use std::collections::{BTreeSet, HashMap};

/// `YYYY-MM` prefix of an ISO date; the whole input when shorter.
pub fn month_key(date: &str) -> &str {
    date.get(..7).unwrap_or(date)
}

pub fn in_month(movement: &Movement, month: &str) -> bool {
    movement.date.starts_with(month)
}

/// Total for one category in a breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: &'static Category,
    pub amount: f64,
}

/// Ledger aggregates for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: String,
    pub income: f64,
    pub expense: f64,
    /// `income - expense`; may be negative.
    pub balance: f64,
    pub expense_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
    pub movement_count: usize,
}

/// Aggregates the movements of `month`.
pub fn monthly_summary(movements: &[Movement], month: &str) -> MonthlySummary {
    let in_scope: Vec<&Movement> = movements.iter().filter(|m| in_month(m, month)).collect();
    let income = sum_kind(&in_scope, MovementKind::Income);
    let expense = sum_kind(&in_scope, MovementKind::Expense);

    MonthlySummary {
        month: month.to_string(),
        income,
        expense,
        balance: income - expense,
        expense_by_category: breakdown(&in_scope, MovementKind::Expense, EXPENSE_CATEGORIES),
        income_by_category: breakdown(&in_scope, MovementKind::Income, INCOME_CATEGORIES),
        movement_count: in_scope.len(),
    }
}

/// Spent amount per expense category id in `month`, unknown ids kept as-is.
pub fn expenses_by_category(movements: &[Movement], month: &str) -> HashMap<String, f64> {
    let mut totals = HashMap::new();
    for movement in movements
        .iter()
        .filter(|m| m.kind == MovementKind::Expense && in_month(m, month))
    {
        *totals.entry(movement.category.clone()).or_insert(0.0) += movement.amount;
    }
    totals
}

fn sum_kind(movements: &[&Movement], kind: MovementKind) -> f64 {
    movements
        .iter()
        .filter(|m| m.kind == kind)
        .map(|m| m.amount)
        .sum()
}

fn breakdown(movements: &[&Movement], kind: MovementKind, catalog: Catalog) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&'static str, f64> = HashMap::new();
    for movement in movements.iter().filter(|m| m.kind == kind) {
        *totals.entry(catalog.resolve(&movement.category).id).or_insert(0.0) += movement.amount;
    }

    catalog
        .entries()
        .iter()
        .filter_map(|category| {
            let amount = totals.get(category.id).copied().unwrap_or(0.0);
            (amount != 0.0).then_some(CategoryTotal { category, amount })
        })
        .collect()
}

/// Distinct months present in `movements` plus `current`, newest first.
pub fn available_months(movements: &[Movement], current: &str) -> Vec<String> {
    let mut months: BTreeSet<String> = movements
        .iter()
        .map(|m| month_key(&m.date).to_string())
        .collect();
    months.insert(current.to_string());
    months.into_iter().rev().collect()
}

/// Ledger list filter; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFilter {
    pub month: Option<String>,
    pub kind: Option<MovementKind>,
    pub category: Option<String>,
}

/// Movements matching `filter`, newest date first.
pub fn filter_movements<'a>(movements: &'a [Movement], filter: &MovementFilter) -> Vec<&'a Movement> {
    let mut matched: Vec<&Movement> = movements
        .iter()
        .filter(|m| filter.month.as_deref().map_or(true, |month| in_month(m, month)))
        .filter(|m| filter.kind.map_or(true, |kind| m.kind == kind))
        .filter(|m| {
            filter
                .category
                .as_deref()
                .map_or(true, |category| m.category == category)
        })
        .collect();
    matched.sort_by(|a, b| b.date.cmp(&a.date));
    matched
}

/// The `limit` most recent movements across all months.
pub fn recent_movements(movements: &[Movement], limit: usize) -> Vec<&Movement> {
    let mut sorted = filter_movements(movements, &MovementFilter::default());
    sorted.truncate(limit);
    sorted
}

/// Utilization of one budget in a month.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLine {
    pub budget_id: RecordId,
    pub category: &'static Category,
    pub amount: f64,
    pub spent: f64,
    /// `min(100, round(spent / amount * 100))`.
    pub percentage: u32,
    pub over: bool,
    /// `spent - amount` when over, else `0`.
    pub over_by: f64,
}

/// Severity band of overall budget use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetAlert {
    /// At most 70% used.
    Ok,
    /// Above 70%, at most 90%.
    Warning,
    /// Above 90%.
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetOverview {
    pub lines: Vec<BudgetLine>,
    pub total_budget: f64,
    pub total_spent: f64,
    /// `max(0, total_budget - total_spent)`.
    pub remaining: f64,
    pub percentage: u32,
    pub alert: BudgetAlert,
}

/// Budget utilization against the expenses of `month`.
pub fn budget_overview(budgets: &[Budget], movements: &[Movement], month: &str) -> BudgetOverview {
    let spent_by_category = expenses_by_category(movements, month);
    let lines: Vec<BudgetLine> = budgets
        .iter()
        .map(|budget| {
            let spent = spent_by_category
                .get(&budget.category)
                .copied()
                .unwrap_or(0.0);
            let over = spent > budget.amount;
            BudgetLine {
                budget_id: budget.id.clone(),
                category: EXPENSE_CATEGORIES.resolve(&budget.category),
                amount: budget.amount,
                spent,
                percentage: rounded_percentage(spent, budget.amount),
                over,
                over_by: if over { spent - budget.amount } else { 0.0 },
            }
        })
        .collect();

    let total_budget: f64 = lines.iter().map(|line| line.amount).sum();
    let total_spent: f64 = lines.iter().map(|line| line.spent).sum();
    let ratio = if total_budget > 0.0 {
        total_spent / total_budget
    } else {
        0.0
    };
    let alert = if ratio > 0.9 {
        BudgetAlert::Critical
    } else if ratio > 0.7 {
        BudgetAlert::Warning
    } else {
        BudgetAlert::Ok
    };

    BudgetOverview {
        lines,
        total_budget,
        total_spent,
        remaining: (total_budget - total_spent).max(0.0),
        percentage: rounded_percentage(total_spent, total_budget),
        alert,
    }
}

/// Expense categories that do not have a budget yet, in catalog order.
pub fn unbudgeted_categories(budgets: &[Budget]) -> Vec<&'static Category> {
    EXPENSE_CATEGORIES
        .entries()
        .iter()
        .filter(|category| !budgets.iter().any(|budget| budget.category == category.id))
        .collect()
}

/// Progress of one savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    /// Rounded, clamped to 100, and only 100 once the target is reached.
    pub percentage: u32,
    pub complete: bool,
    /// Amount still missing; `0` once complete.
    pub remaining: f64,
}

/// Percentage of the target saved so far.
///
/// Unlike a plain `min(100, round(current / target * 100))`, the percentage
/// stays at 99 until `current >= target`, so a goal between 99.5% and 100%
/// never reports 100 or `complete` early.
pub fn goal_progress(goal: &Goal) -> GoalProgress {
    let reached = goal.target > 0.0 && goal.current >= goal.target;
    let mut percentage = rounded_percentage(goal.current, goal.target);
    if !reached {
        percentage = percentage.min(99);
    }
    GoalProgress {
        percentage,
        complete: percentage >= 100,
        remaining: (goal.target - goal.current).max(0.0),
    }
}

/// Holdings and average acquisition price of the currency account.
#[derive(Debug, Clone, PartialEq)]
pub struct DollarSummary {
    pub balance: f64,
    /// Local currency paid per unit across all buys, rounded; `0` without buys.
    pub average_buy_price: f64,
    pub operation_count: usize,
}

pub fn dollar_summary(account: &DollarAccount) -> DollarSummary {
    let (units, paid) = account
        .operations
        .iter()
        .filter(|op| op.kind == DollarOperationKind::Buy)
        .fold((0.0, 0.0), |(units, paid), op| (units + op.amount, paid + op.total));
    DollarSummary {
        balance: account.balance,
        average_buy_price: if units > 0.0 { (paid / units).round() } else { 0.0 },
        operation_count: account.operations.len(),
    }
}

/// Share of `amount` in `total` for chart legends, `0..=100`.
pub fn share_of(amount: f64, total: f64) -> f64 {
    clamped_percentage(amount, total)
}
