//! Finance use-case service.
//!
//! # Responsibility
//! - Validate and record ledger movements, budgets and goals.
//! - Keep the savings balance and currency account floored at zero.
//!
//! # Invariants
//! - Amounts entering the ledger are finite and positive.
//! - Budgets are unique per category.

use crate::model::finance::{Budget, DollarOperation, DollarOperationKind, Goal, Movement};
use crate::model::record::RecordId;
use crate::service::workspace::{Clock, Workspace};
use crate::service::{require_positive, require_text, ServiceResult};
use chrono::NaiveDate;
use log::info;

/// Request model for one currency buy/sell.
#[derive(Debug, Clone, PartialEq)]
pub struct DollarOperationRequest {
    pub kind: DollarOperationKind,
    /// Foreign-currency amount.
    pub amount: f64,
    /// Local price per unit.
    pub price: f64,
    /// ISO date of the operation.
    pub date: String,
}

/// Use-case wrapper for ledger, budget, goal and savings operations.
pub struct FinanceService<'w> {
    workspace: &'w mut Workspace,
}

impl<'w> FinanceService<'w> {
    pub fn new(workspace: &'w mut Workspace) -> Self {
        Self { workspace }
    }

    /// Appends a movement to the ledger.
    ///
    /// # Contract
    /// - `amount` must be positive; `date` and `category` must be non-empty.
    /// - Returns the stored movement with its fresh id.
    pub fn record_movement(&mut self, movement: Movement) -> ServiceResult<Movement> {
        require_positive("amount", movement.amount)?;
        require_text("date", &movement.date)?;
        require_text("category", &movement.category)?;
        let stored = self.workspace.movements.append(movement);
        info!(
            "event=movement_record module=service status=ok kind={} id={}",
            stored.kind, stored.id
        );
        Ok(stored)
    }

    /// Replaces a movement's content, keeping its id.
    ///
    /// Returns `Ok(false)` when no movement has this id.
    pub fn edit_movement(&mut self, id: &RecordId, movement: Movement) -> ServiceResult<bool> {
        require_positive("amount", movement.amount)?;
        require_text("date", &movement.date)?;
        Ok(self.workspace.movements.replace(id, movement))
    }

    pub fn delete_movement(&mut self, id: &RecordId) -> bool {
        self.workspace.movements.remove(id)
    }

    /// Creates or overwrites the budget of `category`.
    ///
    /// # Contract
    /// - `amount` must be positive.
    /// - An existing budget for the category keeps its id.
    pub fn set_budget(&mut self, category: &str, amount: f64) -> ServiceResult<Budget> {
        require_text("category", category)?;
        require_positive("amount", amount)?;

        let existing = self
            .workspace
            .budgets
            .items()
            .iter()
            .find(|budget| budget.category == category)
            .map(|budget| budget.id.clone());

        let budget = match existing {
            Some(id) => {
                self.workspace
                    .budgets
                    .modify(&id, |budget| budget.amount = amount);
                self.workspace.budgets.find(&id).cloned().unwrap_or_default()
            }
            None => self.workspace.budgets.append(Budget {
                id: RecordId::default(),
                category: category.to_string(),
                amount,
            }),
        };
        info!(
            "event=budget_set module=service status=ok category={} id={}",
            category, budget.id
        );
        Ok(budget)
    }

    pub fn delete_budget(&mut self, id: &RecordId) -> bool {
        self.workspace.budgets.remove(id)
    }

    /// Creates a savings goal starting at zero.
    pub fn create_goal(
        &mut self,
        name: &str,
        target: f64,
        deadline: Option<NaiveDate>,
    ) -> ServiceResult<Goal> {
        require_text("name", name)?;
        require_positive("target", target)?;
        let goal = self
            .workspace
            .goals
            .append(Goal::new(name.trim(), target, deadline));
        info!("event=goal_create module=service status=ok id={}", goal.id);
        Ok(goal)
    }

    /// Adds a timestamped contribution to a goal.
    ///
    /// # Contract
    /// - `amount` must be positive.
    /// - Returns `Ok(false)` when the goal does not exist.
    pub fn contribute(&mut self, goal_id: &RecordId, amount: f64) -> ServiceResult<bool> {
        require_positive("amount", amount)?;
        let at = self.workspace.clock().now();
        let applied = self
            .workspace
            .goals
            .modify(goal_id, |goal| goal.contribute(amount, at));
        info!(
            "event=goal_contribute module=service status={} id={goal_id}",
            if applied { "ok" } else { "skip" }
        );
        Ok(applied)
    }

    pub fn delete_goal(&mut self, id: &RecordId) -> bool {
        self.workspace.goals.remove(id)
    }

    pub fn savings(&self) -> f64 {
        *self.workspace.savings.get()
    }

    /// Overwrites the savings balance; non-finite or negative input becomes 0.
    pub fn set_savings(&mut self, amount: f64) -> f64 {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.workspace.savings.set(amount);
        amount
    }

    pub fn add_savings(&mut self, amount: f64) -> ServiceResult<f64> {
        require_positive("amount", amount)?;
        Ok(self.workspace.savings.update(|balance| {
            *balance += amount;
            *balance
        }))
    }

    /// Withdraws from savings; the balance never goes below zero.
    pub fn subtract_savings(&mut self, amount: f64) -> ServiceResult<f64> {
        require_positive("amount", amount)?;
        Ok(self.workspace.savings.update(|balance| {
            *balance = (*balance - amount).max(0.0);
            *balance
        }))
    }

    /// Records a currency operation and adjusts the balance.
    pub fn record_dollar_operation(
        &mut self,
        request: &DollarOperationRequest,
    ) -> ServiceResult<RecordId> {
        require_positive("amount", request.amount)?;
        require_positive("price", request.price)?;
        let operation = DollarOperation {
            id: RecordId::default(),
            kind: request.kind,
            amount: request.amount,
            price: request.price,
            total: 0.0,
            date: request.date.clone(),
        };
        let id = self.workspace.dollars.update(|account| account.apply(operation));
        info!(
            "event=dollar_operation module=service status=ok kind={} id={id}",
            request.kind
        );
        Ok(id)
    }

    /// Deletes a currency operation and reverts its balance effect.
    pub fn delete_dollar_operation(&mut self, id: &RecordId) -> bool {
        self.workspace.dollars.update(|account| account.revert(id))
    }
}
