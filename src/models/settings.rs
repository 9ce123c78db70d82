use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::LedgerResult;
use crate::form_utils::{
    deserialize_optional_field, optional_text, parse_optional_number, require_non_negative,
    to_cents,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub currency: String,
    pub locale: String,
    pub timezone: String,
    pub monthly_income_goal_cents: i64,
    pub monthly_expense_budget_cents: i64,
    pub notifications: NotificationPrefs,
}

/// Which reminders the user wants. Stored as `notify_*` settings rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub budget_alerts: bool,
    pub trading_reminders: bool,
    pub monthly_reports: bool,
    pub email_notifications: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            budget_alerts: true,
            trading_reminders: false,
            monthly_reports: true,
            email_notifications: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_map(HashMap::new())
    }
}

impl Settings {
    pub fn from_map(map: HashMap<String, String>) -> Self {
        let cents = |key: &str| map.get(key).and_then(|s| s.parse().ok()).unwrap_or(0);
        let defaults = NotificationPrefs::default();
        let flag = |key: &str, default: bool| {
            map.get(key)
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(default)
        };
        Self {
            currency: map.get("currency").cloned().unwrap_or_else(|| "USD".into()),
            locale: map.get("locale").cloned().unwrap_or_else(|| "en-US".into()),
            timezone: map.get("timezone").cloned().unwrap_or_else(|| "UTC".into()),
            monthly_income_goal_cents: cents("monthly_income_goal_cents"),
            monthly_expense_budget_cents: cents("monthly_expense_budget_cents"),
            notifications: NotificationPrefs {
                budget_alerts: flag("notify_budget_alerts", defaults.budget_alerts),
                trading_reminders: flag("notify_trading_reminders", defaults.trading_reminders),
                monthly_reports: flag("notify_monthly_reports", defaults.monthly_reports),
                email_notifications: flag(
                    "notify_email_notifications",
                    defaults.email_notifications,
                ),
            },
        }
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("currency".into(), self.currency.clone());
        map.insert("locale".into(), self.locale.clone());
        map.insert("timezone".into(), self.timezone.clone());
        map.insert(
            "monthly_income_goal_cents".into(),
            self.monthly_income_goal_cents.to_string(),
        );
        map.insert(
            "monthly_expense_budget_cents".into(),
            self.monthly_expense_budget_cents.to_string(),
        );

        let n = &self.notifications;
        for (key, value) in [
            ("notify_budget_alerts", n.budget_alerts),
            ("notify_trading_reminders", n.trading_reminders),
            ("notify_monthly_reports", n.monthly_reports),
            ("notify_email_notifications", n.email_notifications),
        ] {
            map.insert(key.into(), value.to_string());
        }
        map
    }

    /// Applies a partial update. Absent fields keep their current value.
    pub fn apply(&self, update: &SettingsUpdate) -> LedgerResult<Settings> {
        let mut next = self.clone();
        if let Some(currency) = optional_text(update.currency.as_ref()) {
            next.currency = currency.to_uppercase();
        }
        if let Some(locale) = optional_text(update.locale.as_ref()) {
            next.locale = locale;
        }
        if let Some(timezone) = optional_text(update.timezone.as_ref()) {
            next.timezone = timezone;
        }
        if let Some(goal) =
            parse_optional_number("monthly_income_goal", update.monthly_income_goal.as_ref())?
        {
            next.monthly_income_goal_cents =
                to_cents(require_non_negative("monthly_income_goal", goal)?);
        }
        if let Some(budget) = parse_optional_number(
            "monthly_expense_budget",
            update.monthly_expense_budget.as_ref(),
        )? {
            next.monthly_expense_budget_cents =
                to_cents(require_non_negative("monthly_expense_budget", budget)?);
        }

        let n = &mut next.notifications;
        n.budget_alerts = update.budget_alerts.unwrap_or(n.budget_alerts);
        n.trading_reminders = update.trading_reminders.unwrap_or(n.trading_reminders);
        n.monthly_reports = update.monthly_reports.unwrap_or(n.monthly_reports);
        n.email_notifications = update.email_notifications.unwrap_or(n.email_notifications);
        Ok(next)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub locale: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub monthly_income_goal: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub monthly_expense_budget: Option<String>,
    #[serde(default)]
    pub budget_alerts: Option<bool>,
    #[serde(default)]
    pub trading_reminders: Option<bool>,
    #[serde(default)]
    pub monthly_reports: Option<bool>,
    #[serde(default)]
    pub email_notifications: Option<bool>,
}
