//! Domain models for Tillbook

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::PeriodSummary;
use crate::allocation::MonthlyNet;
use crate::ledger::AccountBalance;

// ============================================================================
// Revenue & expenses
// ============================================================================

/// Revenue recorded for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revenue {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Expense status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Money has left the till; counts toward totals
    #[default]
    Spent,
    /// Planned expense, excluded from totals
    Draft,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spent => "spent",
            Self::Draft => "draft",
        }
    }
}

impl std::str::FromStr for ExpenseStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spent" => Ok(Self::Spent),
            "draft" => Ok(Self::Draft),
            _ => Err(format!("Unknown expense status: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense. `year` and `month` always mirror `expense_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub status: ExpenseStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub name: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub status: ExpenseStatus,
    pub notes: Option<String>,
}

/// Partial expense update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub expense_date: Option<NaiveDate>,
    pub status: Option<ExpenseStatus>,
    pub notes: Option<String>,
}

// ============================================================================
// Reserve funds
// ============================================================================

/// A reserve bucket receiving a percentage of monthly net profit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationAccount {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub percentage: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAllocationAccount {
    pub name: String,
    pub description: Option<String>,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct AllocationAccountUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub percentage: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// A manually recorded allocation entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveAllocation {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub account_type: String,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReserveAllocation {
    pub year: i32,
    pub month: u32,
    pub account_type: String,
    pub amount: Decimal,
    pub notes: Option<String>,
}

/// Money drawn from a reserve account. `source_type` is the account name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveExpenditure {
    pub id: i64,
    pub name: String,
    pub source_type: String,
    pub amount: Decimal,
    pub expenditure_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReserveExpenditure {
    pub name: String,
    pub source_type: String,
    pub amount: Decimal,
    pub expenditure_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReserveExpenditureUpdate {
    pub name: Option<String>,
    pub source_type: Option<String>,
    pub amount: Option<Decimal>,
    pub expenditure_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

// ============================================================================
// Stock
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl StockItem {
    pub fn is_low(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}

#[derive(Debug, Clone)]
pub struct NewStockItem {
    pub name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct StockItemUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub min_stock: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMovement {
    In,
    Out,
}

impl StockMovement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl std::str::FromStr for StockMovement {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            _ => Err(format!("Unknown stock movement: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: i64,
    pub item_id: i64,
    #[serde(rename = "type")]
    pub kind: StockMovement,
    pub quantity: Decimal,
    pub price: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStockTransaction {
    pub kind: StockMovement,
    pub quantity: Decimal,
    pub price: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// One entry of an item's price history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: StockMovement,
    pub price: Decimal,
}

// ============================================================================
// Reference data
// ============================================================================

/// Expense category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shareholder {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub share_percentage: Decimal,
    pub is_active: bool,
}

/// Fields shared by the reference-data tables for create and partial update
#[derive(Debug, Clone, Default)]
pub struct ReferenceFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub share_percentage: Option<Decimal>,
    pub is_active: Option<bool>,
}

// ============================================================================
// Users & settings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user account (password hash never leaves the record store)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub phone: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub phone: String,
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub phone: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// A freshly created login session. The raw token is only available here.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Everything the dashboard screen needs for one year (and focus month)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub year: i32,
    pub month: u32,
    pub currency: String,
    pub revenue: PeriodSummary,
    pub expenses: PeriodSummary,
    pub net_profit: Decimal,
    pub annual_revenue: PeriodSummary,
    pub annual_expenses: PeriodSummary,
    pub annual_net_profit: Decimal,
    pub monthly: Vec<MonthlyNet>,
    pub reserve_balances: Vec<AccountBalance>,
    pub low_stock_items: usize,
}
