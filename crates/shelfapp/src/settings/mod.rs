//! # Library Settings
//!
//! The settings page edits one JSON document with six sections. Keys are
//! camelCase so backups match the console's format:
//!
//! ```json
//! {
//!   "general":       { "libraryName": "...", "loanPeriod": 14, ... },
//!   "borrowing":     { "lateFeePerDay": 1.0, ... },
//!   "membership":    { "membershipPlans": [{ "name": "Basic", "maxBooks": 3, "price": 0 }], ... },
//!   "fines":         { "fineReminderDays": [3, 7, 14], ... },
//!   "notifications": { "dueReminderDays": 2, ... },
//!   "security":      { "sessionTimeout": 30, "ipWhitelist": [], ... }
//! }
//! ```
//!
//! Every editing operation either succeeds completely or returns an error
//! and leaves the settings as they were.

use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod backup;

pub use backup::{backup_file_name, parse_settings, restore_from, write_backup, SettingsStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    pub library_name: String,
    pub library_email: String,
    pub library_phone: String,
    pub address: String,
    pub opening_hours: String,
    pub max_books_per_member: u32,
    /// Days
    pub loan_period: u32,
    pub auto_renewal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingSettings {
    pub late_fee_per_day: f64,
    pub max_late_days: u32,
    pub reservation_hold_days: u32,
    pub max_reservations: u32,
    pub allow_renewals: bool,
    pub renewal_days: u32,
    pub grace_period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPlan {
    pub name: String,
    pub max_books: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSettings {
    pub membership_plans: Vec<MembershipPlan>,
    /// Percent
    pub student_discount: u32,
    pub senior_discount: u32,
    pub annual_discount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FineSettings {
    pub fine_per_day: f64,
    pub max_fine_amount: f64,
    pub damage_fee: f64,
    pub lost_book_fee: String,
    /// Days after the due date, ascending
    pub fine_reminder_days: Vec<u32>,
    pub auto_waive_small_fines: bool,
    pub small_fine_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Days before the due date; 0 turns due reminders off
    pub due_reminder_days: u32,
    pub reservation_ready: bool,
    pub new_book_alert: bool,
    pub newsletter_subscription: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub push_notifications: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    /// Minutes
    pub session_timeout: u32,
    /// Days
    pub require_password_change: u32,
    pub two_factor_auth: bool,
    pub ip_whitelist: Vec<String>,
    pub failed_attempts_lock: u32,
    /// Minutes
    pub lockout_duration: u32,
}

/// The whole settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySettings {
    pub general: GeneralSettings,
    pub borrowing: BorrowingSettings,
    pub membership: MembershipSettings,
    pub fines: FineSettings,
    pub notifications: NotificationSettings,
    pub security: SecuritySettings,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            general: GeneralSettings {
                library_name: "Central Public Library".into(),
                library_email: "contact@library.com".into(),
                library_phone: "+1 (234) 567-8900".into(),
                address: "123 Library Street, Knowledge City".into(),
                opening_hours: "9:00 AM - 8:00 PM".into(),
                max_books_per_member: 5,
                loan_period: 14,
                auto_renewal: true,
            },
            borrowing: BorrowingSettings {
                late_fee_per_day: 1.0,
                max_late_days: 30,
                reservation_hold_days: 3,
                max_reservations: 3,
                allow_renewals: true,
                renewal_days: 7,
                grace_period: 2,
            },
            membership: MembershipSettings {
                membership_plans: vec![
                    MembershipPlan {
                        name: "Basic".into(),
                        max_books: 3,
                        price: 0.0,
                    },
                    MembershipPlan {
                        name: "Standard".into(),
                        max_books: 5,
                        price: 49.0,
                    },
                    MembershipPlan {
                        name: "Premium".into(),
                        max_books: 10,
                        price: 99.0,
                    },
                ],
                student_discount: 20,
                senior_discount: 15,
                annual_discount: 10,
            },
            fines: FineSettings {
                fine_per_day: 0.5,
                max_fine_amount: 25.0,
                damage_fee: 15.0,
                lost_book_fee: "Book Price + Processing".into(),
                fine_reminder_days: vec![3, 7, 14],
                auto_waive_small_fines: true,
                small_fine_threshold: 2.0,
            },
            notifications: NotificationSettings {
                due_reminder_days: 2,
                reservation_ready: true,
                new_book_alert: true,
                newsletter_subscription: true,
                email_notifications: true,
                sms_notifications: false,
                push_notifications: true,
            },
            security: SecuritySettings {
                session_timeout: 30,
                require_password_change: 90,
                two_factor_auth: false,
                ip_whitelist: Vec::new(),
                failed_attempts_lock: 5,
                lockout_duration: 15,
            },
        }
    }
}

/// Field of a membership plan addressed by `update_membership_plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    Name,
    MaxBooks,
    Price,
}

impl std::str::FromStr for PlanField {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(PlanField::Name),
            "maxBooks" | "max_books" | "max-books" => Ok(PlanField::MaxBooks),
            "price" => Ok(PlanField::Price),
            other => Err(ShelfError::Settings(format!(
                "unknown membership plan field '{}'",
                other
            ))),
        }
    }
}

impl LibrarySettings {
    /// The six section names, in document order.
    pub const SECTIONS: [&'static str; 6] = [
        "general",
        "borrowing",
        "membership",
        "fines",
        "notifications",
        "security",
    ];

    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read one setting, addressed as `section.field` with camelCase names.
    pub fn get_field(&self, section: &str, field: &str) -> Result<Value> {
        let doc = self.to_value()?;
        doc.get(section)
            .ok_or_else(|| ShelfError::Settings(format!("unknown section '{}'", section)))?
            .get(field)
            .cloned()
            .ok_or_else(|| ShelfError::Settings(format!("unknown setting '{}.{}'", section, field)))
    }

    /// Check the rules the editing operations keep, sorting reminder days.
    ///
    /// At least one membership plan must exist and every reminder day must
    /// be positive.
    pub fn validated(mut self) -> Result<Self> {
        if self.membership.membership_plans.is_empty() {
            return Err(ShelfError::Settings(
                "at least one membership plan is required".into(),
            ));
        }
        if self.fines.fine_reminder_days.contains(&0) {
            return Err(ShelfError::Settings(
                "reminder days must be positive".into(),
            ));
        }
        self.fines.fine_reminder_days.sort_unstable();
        Ok(self)
    }

    /// Replace one setting.
    ///
    /// The new value must keep the document valid: a string where a number
    /// belongs, an empty plan list or a zero reminder day is rejected and
    /// nothing changes.
    pub fn set_field(&mut self, section: &str, field: &str, value: Value) -> Result<()> {
        let mut doc = self.to_value()?;
        let slot = doc
            .get_mut(section)
            .ok_or_else(|| ShelfError::Settings(format!("unknown section '{}'", section)))?
            .get_mut(field)
            .ok_or_else(|| {
                ShelfError::Settings(format!("unknown setting '{}.{}'", section, field))
            })?;
        *slot = value;
        let updated: LibrarySettings = serde_json::from_value(doc).map_err(|e| {
            ShelfError::Settings(format!("invalid value for '{}.{}': {}", section, field, e))
        })?;
        *self = updated.validated()?;
        Ok(())
    }

    /// Append a plan named "Plan N" (N = new plan count).
    pub fn add_membership_plan(&mut self) -> &MembershipPlan {
        let plans = &mut self.membership.membership_plans;
        plans.push(MembershipPlan {
            name: format!("Plan {}", plans.len() + 1),
            max_books: 3,
            price: 0.0,
        });
        &plans[plans.len() - 1]
    }

    /// Update one field of a plan from text input.
    ///
    /// Numbers that do not parse become 0.
    pub fn update_membership_plan(&mut self, index: usize, field: PlanField, input: &str) -> Result<()> {
        let count = self.membership.membership_plans.len();
        let plan = self
            .membership
            .membership_plans
            .get_mut(index)
            .ok_or_else(|| plan_index_error(index, count))?;
        match field {
            PlanField::Name => plan.name = input.to_string(),
            PlanField::MaxBooks => plan.max_books = input.trim().parse().unwrap_or(0),
            PlanField::Price => {
                plan.price = input
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite())
                    .unwrap_or(0.0)
            }
        }
        Ok(())
    }

    /// Remove a plan. The last remaining plan cannot be removed.
    pub fn remove_membership_plan(&mut self, index: usize) -> Result<MembershipPlan> {
        let plans = &mut self.membership.membership_plans;
        if index >= plans.len() {
            return Err(plan_index_error(index, plans.len()));
        }
        if plans.len() == 1 {
            return Err(ShelfError::Settings(
                "at least one membership plan is required".into(),
            ));
        }
        Ok(plans.remove(index))
    }

    /// Add a fine reminder day. Days must be positive; the list stays sorted.
    pub fn add_reminder_day(&mut self, day: i64) -> Result<()> {
        let day = u32::try_from(day)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| ShelfError::Settings(format!("reminder day must be positive, got {}", day)))?;
        let days = &mut self.fines.fine_reminder_days;
        days.push(day);
        days.sort_unstable();
        Ok(())
    }

    pub fn remove_reminder_day(&mut self, index: usize) -> Result<u32> {
        let days = &mut self.fines.fine_reminder_days;
        if index >= days.len() {
            return Err(ShelfError::Settings(format!(
                "no reminder day at position {} ({} configured)",
                index + 1,
                days.len()
            )));
        }
        Ok(days.remove(index))
    }

    pub fn reset(&mut self) {
        *self = LibrarySettings::default();
    }
}

fn plan_index_error(index: usize, count: usize) -> ShelfError {
    ShelfError::Settings(format!(
        "no membership plan at position {} ({} configured)",
        index + 1,
        count
    ))
}
