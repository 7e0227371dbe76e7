//! Handler for the `sales` command.

use rust_decimal::Decimal;
use salesdash_core::{DailySalesRecord, SalesPeriod, StoreInfo};
use salesdash_session::guard::DASHBOARD_PATH;
use salesdash_session::{Navigation, RouteTable, SessionStore};

/// Column sums over a sales series.
#[derive(Debug, Default, PartialEq, Eq)]
struct SalesTotals {
    profit: Decimal,
    fba_amount: Decimal,
    fbm_amount: Decimal,
    fba_shipping_amount: Decimal,
    total_sales: Decimal,
}

impl SalesTotals {
    fn from_records(records: &[DailySalesRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            profit: acc.profit + r.profit,
            fba_amount: acc.fba_amount + r.fba_amount,
            fbm_amount: acc.fbm_amount + r.fbm_amount,
            fba_shipping_amount: acc.fba_shipping_amount + r.fba_shipping_amount,
            total_sales: acc.total_sales + r.total_sales,
        })
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn heading(store_info: &StoreInfo, period: SalesPeriod) -> String {
    format!(
        "{} ({}): {period}",
        store_info.marketplace_name, store_info.store_id
    )
}

fn row(label: &str, cells: [Decimal; 5]) -> String {
    let [fba, fbm, shipping, profit, total] = cells.map(money);
    format!("{label:<8}{fba:>12}{fbm:>12}{shipping:>12}{profit:>12}{total:>12}")
}

/// Load and print the daily sales overview for the selected window.
///
/// The dashboard route is guarded: without a signed-in session the command
/// stops before any request is made.
///
/// # Errors
///
/// Returns an error if the session is not signed in, has no store, or the
/// sales request fails.
pub(crate) async fn run_sales(store: &SessionStore, period: SalesPeriod) -> anyhow::Result<()> {
    match RouteTable::default().navigate(DASHBOARD_PATH, store.is_authenticated()) {
        Navigation::Arrived(route) if route.path == DASHBOARD_PATH => {}
        Navigation::Arrived(route) => {
            anyhow::bail!("not signed in (redirected to {}); run `login` first", route.path)
        }
        other => anyhow::bail!("dashboard route unavailable: {other:?}"),
    }

    store.fetch_daily_sales_data(period.days()).await?;

    let session = store.snapshot();
    let records = &session.daily_sales_data;
    if let Some(store_info) = session.store() {
        println!("{}", heading(store_info, period));
    }
    if records.is_empty() {
        println!("no sales data for {period}");
        return Ok(());
    }

    println!(
        "{:<8}{:>12}{:>12}{:>12}{:>12}{:>12}",
        "DATE", "FBA", "FBM", "SHIPPING", "PROFIT", "TOTAL"
    );
    for r in records {
        println!(
            "{}",
            row(
                &r.date,
                [
                    r.fba_amount,
                    r.fbm_amount,
                    r.fba_shipping_amount,
                    r.profit,
                    r.total_sales
                ]
            )
        );
    }

    let totals = SalesTotals::from_records(records);
    println!(
        "{}",
        row(
            "TOTAL",
            [
                totals.fba_amount,
                totals.fbm_amount,
                totals.fba_shipping_amount,
                totals.profit,
                totals.total_sales
            ]
        )
    );

    Ok(())
}
