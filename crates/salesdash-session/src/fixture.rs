//! Bundled daily sales dataset served when the configured sales source is
//! [`SalesSource::Fixture`](salesdash_core::SalesSource::Fixture).

use crate::error::SessionError;
use crate::types::{ApiEnvelope, DailySalesOverviewData, RemoteDailySales};

/// Ninety chronological days in the same envelope the live endpoint uses.
/// A handful of entries omit or null out amounts.
const DAILY_SALES_FIXTURE: &str = include_str!("../fixtures/daily_sales.json");

/// Parses the bundled dataset.
///
/// # Errors
///
/// Returns [`SessionError::Deserialize`] if the bundled JSON is malformed.
pub fn fixture_daily_sales() -> Result<Vec<RemoteDailySales>, SessionError> {
    let envelope: ApiEnvelope<DailySalesOverviewData> = serde_json::from_str(DAILY_SALES_FIXTURE)
        .map_err(|e| SessionError::Deserialize {
            context: "bundled daily sales fixture".to_owned(),
            source: e,
        })?;
    Ok(envelope.data.map(|d| d.items).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_parses_and_is_chronological() {
        let items = fixture_daily_sales().unwrap();
        assert_eq!(items.len(), 90);
        assert!(items.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn fixture_contains_gaps_to_default() {
        let items = fixture_daily_sales().unwrap();
        assert!(items.iter().any(|i| i.fbm_amount.is_none()));
        assert!(items.iter().any(|i| i.fba_shipping_amount.is_none()));
    }
}
