//! Shaping of raw API records into the session's display types.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use salesdash_core::{DailySalesRecord, StoreInfo, UserInfo, UserProfile};

use crate::types::{RemoteDailySales, RemoteUser};

/// Converts the profile endpoint's user record into the session shape.
///
/// - `store`: the first entry of the remote store list, if any.
/// - `name`: `"first last"` when both parts are present, else whichever
///   single part exists.
/// - `currency`: the user's own currency, else the first store's.
/// - `membership_status`: the account status rendered as text.
#[must_use]
pub fn normalize_user(remote: RemoteUser) -> UserInfo {
    let first_store = remote.store.into_iter().next();
    let currency = remote
        .currency
        .or_else(|| first_store.as_ref().and_then(|s| s.currency.clone()));
    let store = first_store.map(|s| StoreInfo {
        store_id: s.store_id.to_string(),
        marketplace_name: s.marketplace_name,
    });

    UserInfo {
        user: UserProfile {
            id: remote.user_id.to_string(),
            email: remote.email,
            name: join_name(remote.first_name, remote.last_name),
            currency,
            membership_status: remote.account_status.map(|s| s.to_string()),
            store,
        },
    }
}

fn join_name(first: Option<String>, last: Option<String>) -> Option<String> {
    let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
    match (non_blank(first), non_blank(last)) {
        (Some(f), Some(l)) => Some(format!("{f} {l}")),
        (Some(part), None) | (None, Some(part)) => Some(part),
        (None, None) => None,
    }
}

/// Turns raw daily records into the chart series for a `day`-long window.
///
/// Records are ordered chronologically and only the most recent `day` are
/// kept. Each date becomes a short display label (`Jan 5`), missing amounts
/// become zero, and `total_sales` is computed from the FBA and FBM amounts.
/// Dates that do not parse keep their original text and sort first.
#[must_use]
pub fn shape_daily_sales(items: Vec<RemoteDailySales>, day: u32) -> Vec<DailySalesRecord> {
    let mut dated: Vec<(Option<NaiveDate>, RemoteDailySales)> = items
        .into_iter()
        .map(|item| (parse_date(&item.date), item))
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let keep = usize::try_from(day).unwrap_or(usize::MAX);
    let skip = dated.len().saturating_sub(keep);

    dated
        .into_iter()
        .skip(skip)
        .map(|(date, item)| {
            let label = date.map_or(item.date, |d| d.format("%b %-d").to_string());
            DailySalesRecord::new(
                label,
                item.profit.unwrap_or(Decimal::ZERO),
                item.fba_amount.unwrap_or(Decimal::ZERO),
                item.fbm_amount.unwrap_or(Decimal::ZERO),
                item.fba_shipping_amount.unwrap_or(Decimal::ZERO),
            )
        })
        .collect()
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and naive `YYYY-MM-DDTHH:MM:SS`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
