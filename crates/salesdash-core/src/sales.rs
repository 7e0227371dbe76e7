//! Daily sales series shown on the dashboard chart.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One day of the sales chart, already shaped for display.
///
/// `total_sales` is always `fba_amount + fbm_amount`; it is computed when
/// the record is built, never read from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesRecord {
    /// Short display form, e.g. `Jan 5`.
    pub date: String,
    pub profit: Decimal,
    pub fba_amount: Decimal,
    pub fbm_amount: Decimal,
    pub fba_shipping_amount: Decimal,
    pub total_sales: Decimal,
}

impl DailySalesRecord {
    #[must_use]
    pub fn new(
        date: String,
        profit: Decimal,
        fba_amount: Decimal,
        fbm_amount: Decimal,
        fba_shipping_amount: Decimal,
    ) -> Self {
        Self {
            date,
            profit,
            fba_amount,
            fbm_amount,
            fba_shipping_amount,
            total_sales: fba_amount + fbm_amount,
        }
    }
}

/// Chart windows offered by the period selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SalesPeriod {
    Last60,
    #[default]
    Last30,
    Last14,
    Last7,
}

#[derive(Debug, Error)]
#[error("unsupported sales period '{0}': expected 60, 30, 14, or 7")]
pub struct InvalidSalesPeriod(pub String);

impl SalesPeriod {
    /// Selector order, longest window first.
    pub const ALL: [SalesPeriod; 4] = [
        SalesPeriod::Last60,
        SalesPeriod::Last30,
        SalesPeriod::Last14,
        SalesPeriod::Last7,
    ];

    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            SalesPeriod::Last60 => 60,
            SalesPeriod::Last30 => 30,
            SalesPeriod::Last14 => 14,
            SalesPeriod::Last7 => 7,
        }
    }
}

impl std::fmt::Display for SalesPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Last {} Days", self.days())
    }
}

impl FromStr for SalesPeriod {
    type Err = InvalidSalesPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .trim()
            .parse::<u32>()
            .map_err(|_| InvalidSalesPeriod(s.to_string()))?;
        SalesPeriod::ALL
            .into_iter()
            .find(|p| p.days() == days)
            .ok_or_else(|| InvalidSalesPeriod(s.to_string()))
    }
}
