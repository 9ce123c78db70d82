pub mod asset;
pub mod category;
pub mod expense;
pub mod investment;
pub mod liability;
pub mod net_worth;
pub mod settings;
pub mod trade;

pub use asset::{Asset, AssetCategory, AssetDraft};
pub use category::{Category, CategoryDraft, CategoryKind};
pub use expense::{Budget, Expense, ExpenseCategory, ExpenseDraft};
pub use investment::{Investment, InvestmentCategory, InvestmentDraft};
pub use liability::{Liability, LiabilityCategory, LiabilityDraft};
pub use net_worth::{NetWorthDelta, NetWorthHistory, NetWorthPoint, NetWorthSnapshot};
pub use settings::{NotificationPrefs, Settings, SettingsUpdate};
pub use trade::{Trade, TradeDraft, TradeSide, TradeStatus};
