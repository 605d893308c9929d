//! Statistics mode: the six reporting queries. No login required.

use chrono::NaiveDate;
use shoplite_db::repository::stats::{
    CardMaxBasket, CardTotal, KindAvgPrice, ProductReach, ProductUnits, TopSpender,
};
use shoplite_db::Database;

use crate::error::ApiError;

/// Total charged per card, all time, biggest first.
pub async fn card_totals(db: &Database) -> Result<Vec<CardTotal>, ApiError> {
    Ok(db.stats().card_totals().await?)
}

/// The ten biggest-spending customers, all time.
pub async fn top_spenders(db: &Database) -> Result<Vec<TopSpender>, ApiError> {
    Ok(db.stats().top_spenders().await?)
}

/// Units sold per product between two dates, inclusive.
pub async fn best_sellers(
    db: &Database,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ProductUnits>, ApiError> {
    Ok(db.stats().best_sellers(from, to).await?)
}

/// Distinct buyers per product between two dates, inclusive.
pub async fn widest_reach(
    db: &Database,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ProductReach>, ApiError> {
    Ok(db.stats().widest_reach(from, to).await?)
}

/// The largest single basket charged per card between two dates.
pub async fn card_max_baskets(
    db: &Database,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<CardMaxBasket>, ApiError> {
    Ok(db.stats().card_max_baskets(from, to).await?)
}

/// Average sold price per product kind between two dates.
pub async fn avg_price_by_kind(
    db: &Database,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<KindAvgPrice>, ApiError> {
    Ok(db.stats().avg_price_by_kind(from, to).await?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shoplite_db::fixtures::seed_fixture;
    use shoplite_db::DbConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_reports_run_against_fixture_data() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_fixture(&db).await.unwrap();

        let totals = card_totals(&db).await.unwrap();
        assert!(!totals.is_empty());
        // Sorted biggest first.
        assert!(totals.windows(2).all(|w| w[0].total_cents >= w[1].total_cents));

        let spenders = top_spenders(&db).await.unwrap();
        assert!(spenders.len() <= 10);

        // Fixture transactions all fall in May 2025.
        let from = date(2025, 5, 1);
        let to = date(2025, 5, 31);
        assert!(!best_sellers(&db, from, to).await.unwrap().is_empty());
        assert!(!widest_reach(&db, from, to).await.unwrap().is_empty());
        assert!(!card_max_baskets(&db, from, to).await.unwrap().is_empty());
        assert!(!avg_price_by_kind(&db, from, to).await.unwrap().is_empty());

        // An empty window reports nothing.
        let empty = best_sellers(&db, date(2020, 1, 1), date(2020, 1, 31))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }
}
