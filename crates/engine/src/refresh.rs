use crate::error::EngineError;
use crate::service::{today, PortfolioService};
use analytics::revalue;
use chrono::{DateTime, Utc};
use core_types::{Asset, NewPriceSnapshot};
use database::{repository, DbError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What happened to one asset during a batch refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStatus {
    Updated,
    NotFound,
    NoData,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub asset_id: i64,
    pub ticker: Option<String>,
    pub status: RefreshStatus,
    pub price: Option<Decimal>,
    pub message: Option<String>,
}

impl RefreshOutcome {
    fn new(asset_id: i64, ticker: Option<&str>, status: RefreshStatus) -> Self {
        Self {
            asset_id,
            ticker: ticker.map(str::to_string),
            status,
            price: None,
            message: None,
        }
    }
}

/// The result of `POST /prices/update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRefreshReport {
    pub updated_assets: Vec<Asset>,
    pub updated_at: DateTime<Utc>,
    /// One entry per requested id, in request order.
    pub results: Vec<RefreshOutcome>,
}

impl PriceRefreshReport {
    pub fn count(&self, status: RefreshStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

enum Refreshed {
    Updated(Asset),
    Skipped(RefreshOutcome),
}

impl PortfolioService {
    /// Fetches the latest close for each asset and revalues it.
    ///
    /// Assets are processed one after another, each in its own transaction, so
    /// an unknown id, a ticker without data or a failed lookup only affects that
    /// asset. Nothing already applied is rolled back.
    pub async fn refresh_prices(&self, asset_ids: &[i64]) -> PriceRefreshReport {
        let mut updated_assets = Vec::new();
        let mut results = Vec::with_capacity(asset_ids.len());

        for &asset_id in asset_ids {
            let outcome = match self.refresh_one(asset_id).await {
                Ok(Refreshed::Updated(asset)) => {
                    let mut outcome =
                        RefreshOutcome::new(asset_id, Some(asset.ticker.as_str()), RefreshStatus::Updated);
                    outcome.price = Some(asset.current_price);
                    updated_assets.push(asset);
                    outcome
                }
                Ok(Refreshed::Skipped(outcome)) => outcome,
                Err(e) => {
                    tracing::error!(asset_id, error = %e, "Price refresh failed.");
                    let mut outcome = RefreshOutcome::new(asset_id, None, RefreshStatus::Failed);
                    outcome.message = Some(e.to_string());
                    outcome
                }
            };
            results.push(outcome);
        }

        let report = PriceRefreshReport {
            updated_assets,
            updated_at: Utc::now(),
            results,
        };
        tracing::info!(
            requested = asset_ids.len(),
            updated = report.count(RefreshStatus::Updated),
            no_data = report.count(RefreshStatus::NoData),
            failed = report.count(RefreshStatus::Failed),
            "Price refresh finished."
        );
        report
    }

    /// Refreshes every asset in the ledger.
    pub async fn refresh_all(&self) -> Result<PriceRefreshReport, EngineError> {
        let mut tx = self.repo.begin().await?;
        let ids: Vec<i64> = repository::all_assets(&mut tx)
            .await?
            .iter()
            .map(|asset| asset.id)
            .collect();
        tx.commit().await.map_err(DbError::from)?;
        Ok(self.refresh_prices(&ids).await)
    }

    /// Revalues one asset at its latest close.
    ///
    /// No transaction is held while the quote source is consulted. The asset is
    /// read once to learn its ticker, then re-read and written in a fresh
    /// transaction, so edits made during the lookup are kept and a deletion
    /// during the lookup is reported as `NotFound`.
    async fn refresh_one(&self, asset_id: i64) -> Result<Refreshed, EngineError> {
        let Some(asset) = self.find(asset_id).await? else {
            tracing::warn!(asset_id, "Skipping price refresh for unknown asset.");
            return Ok(Refreshed::Skipped(RefreshOutcome::new(
                asset_id,
                None,
                RefreshStatus::NotFound,
            )));
        };

        let price = match self.quotes.latest_close(&asset.ticker).await {
            Ok(Some(price)) => price,
            Ok(None) => {
                tracing::warn!(asset_id, ticker = %asset.ticker, "No quote data available.");
                return Ok(Refreshed::Skipped(RefreshOutcome::new(
                    asset_id,
                    Some(asset.ticker.as_str()),
                    RefreshStatus::NoData,
                )));
            }
            Err(e) => {
                tracing::error!(asset_id, ticker = %asset.ticker, error = %e, "Quote lookup failed.");
                let mut outcome =
                    RefreshOutcome::new(asset_id, Some(asset.ticker.as_str()), RefreshStatus::Failed);
                outcome.message = Some(e.to_string());
                return Ok(Refreshed::Skipped(outcome));
            }
        };

        let mut tx = self.repo.begin().await?;
        let Some(current) = repository::find_asset(&mut tx, asset_id).await? else {
            tracing::warn!(asset_id, ticker = %asset.ticker, "Asset was deleted during price refresh.");
            return Ok(Refreshed::Skipped(RefreshOutcome::new(
                asset_id,
                Some(asset.ticker.as_str()),
                RefreshStatus::NotFound,
            )));
        };

        let mut asset = revalue(current, price)?;
        asset.last_updated = Utc::now();
        repository::update_asset(&mut tx, &asset).await?;
        repository::insert_snapshot(&mut tx, &NewPriceSnapshot::of(&asset, today())).await?;
        tx.commit().await.map_err(DbError::from)?;

        tracing::info!(asset_id, ticker = %asset.ticker, %price, "Price refreshed.");
        Ok(Refreshed::Updated(asset))
    }

    /// Reads one asset in a short-lived transaction.
    async fn find(&self, asset_id: i64) -> Result<Option<Asset>, EngineError> {
        let mut tx = self.repo.begin().await?;
        let asset = repository::find_asset(&mut tx, asset_id).await?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_asset, service, StubQuotes};
    use async_trait::async_trait;
    use database::{connect_in_memory, DbRepository};
    use quote_client::error::QuoteError;
    use quote_client::QuoteSource;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    /// What a concurrent client does to the asset while its quote is in flight.
    enum Interleaved {
        Delete,
        SetQuantity(Decimal),
    }

    /// A quote source that writes to the ledger before answering.
    struct WritingQuotes {
        repo: DbRepository,
        action: Interleaved,
        price: Decimal,
    }

    #[async_trait]
    impl QuoteSource for WritingQuotes {
        async fn latest_close(&self, ticker: &str) -> Result<Option<Decimal>, QuoteError> {
            let mut tx = self.repo.begin().await.unwrap();
            let assets = repository::all_assets(&mut tx).await.unwrap();
            for mut asset in assets.into_iter().filter(|a| a.ticker == ticker) {
                match self.action {
                    Interleaved::Delete => {
                        repository::delete_asset(&mut tx, asset.id).await.unwrap();
                    }
                    Interleaved::SetQuantity(quantity) => {
                        asset.quantity = quantity;
                        repository::update_asset(&mut tx, &asset).await.unwrap();
                    }
                }
            }
            tx.commit().await.unwrap();
            Ok(Some(self.price))
        }
    }

    async fn writing_service(action: Interleaved, price: Decimal) -> PortfolioService {
        let repo = DbRepository::new(connect_in_memory().await.unwrap());
        let quotes = WritingQuotes {
            repo: repo.clone(),
            action,
            price,
        };
        PortfolioService::new(repo, Arc::new(quotes))
    }

    #[tokio::test]
    async fn batch_continues_past_missing_and_failing_assets() {
        let quotes = StubQuotes::default()
            .with_price("GOOD", dec!(1100))
            .failing("DOWN");
        let svc = service(quotes).await;
        let good = svc.create_asset(new_asset("GOOD", dec!(100), dec!(1000))).await.unwrap();
        let silent = svc.create_asset(new_asset("NODATA", dec!(1), dec!(50))).await.unwrap();
        let down = svc.create_asset(new_asset("DOWN", dec!(1), dec!(50))).await.unwrap();

        let report = svc.refresh_prices(&[down.id, 999, silent.id, good.id]).await;

        let statuses: Vec<RefreshStatus> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            [
                RefreshStatus::Failed,
                RefreshStatus::NotFound,
                RefreshStatus::NoData,
                RefreshStatus::Updated
            ]
        );
        assert_eq!(report.results[0].ticker.as_deref(), Some("DOWN"));
        assert!(report.results[0].message.is_some());

        assert_eq!(report.updated_assets.len(), 1);
        let updated = &report.updated_assets[0];
        assert_eq!(updated.id, good.id);
        assert_eq!(updated.current_value, dec!(110000));
        assert_eq!(updated.performance, dec!(10));
        assert_eq!(report.results[3].price, Some(dec!(1100)));
    }

    #[tokio::test]
    async fn refresh_persists_price_and_appends_snapshot() {
        let svc = service(StubQuotes::default().with_price("GOOD", dec!(900))).await;
        let asset = svc.create_asset(new_asset("GOOD", dec!(50), dec!(1000))).await.unwrap();

        svc.refresh_prices(&[asset.id]).await;

        let stored = svc.get_asset(asset.id).await.unwrap();
        assert_eq!(stored.current_price, dec!(900));
        assert_eq!(stored.current_value, dec!(45000));
        assert_eq!(stored.performance, dec!(-10));

        let history = svc.price_history(asset.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].value, dec!(45000));
    }

    #[tokio::test]
    async fn skipped_assets_are_left_untouched() {
        let svc = service(StubQuotes::default().failing("DOWN")).await;
        let asset = svc.create_asset(new_asset("DOWN", dec!(10), dec!(100))).await.unwrap();

        svc.refresh_prices(&[asset.id]).await;

        let stored = svc.get_asset(asset.id).await.unwrap();
        assert_eq!(stored.current_price, dec!(100));
        assert_eq!(svc.price_history(asset.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_all_visits_every_asset() {
        let quotes = StubQuotes::default()
            .with_price("A", dec!(11))
            .with_price("B", dec!(22));
        let svc = service(quotes).await;
        svc.create_asset(new_asset("A", dec!(1), dec!(10))).await.unwrap();
        svc.create_asset(new_asset("B", dec!(1), dec!(20))).await.unwrap();

        let report = svc.refresh_all().await.unwrap();

        assert_eq!(report.count(RefreshStatus::Updated), 2);
        assert_eq!(report.results.len(), 2);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let svc = service(StubQuotes::default()).await;
        let report = svc.refresh_prices(&[]).await;
        assert!(report.updated_assets.is_empty());
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn writes_during_the_lookup_are_not_blocked_and_are_kept() {
        // The in-memory pool has a single connection, so a transaction held
        // across the lookup would starve the writer.
        let svc = writing_service(Interleaved::SetQuantity(dec!(200)), dec!(1100)).await;
        let asset = svc.create_asset(new_asset("7203", dec!(100), dec!(1000))).await.unwrap();

        let report = tokio::time::timeout(Duration::from_secs(5), svc.refresh_prices(&[asset.id]))
            .await
            .expect("refresh must not wait on its own transaction");

        assert_eq!(report.results[0].status, RefreshStatus::Updated);
        let stored = svc.get_asset(asset.id).await.unwrap();
        assert_eq!(stored.quantity, dec!(200));
        assert_eq!(stored.current_value, dec!(220000));
        assert_eq!(stored.performance, dec!(10));
    }

    #[tokio::test]
    async fn asset_deleted_during_the_lookup_is_not_found() {
        let svc = writing_service(Interleaved::Delete, dec!(1100)).await;
        let asset = svc.create_asset(new_asset("7203", dec!(100), dec!(1000))).await.unwrap();

        let report = tokio::time::timeout(Duration::from_secs(5), svc.refresh_prices(&[asset.id]))
            .await
            .expect("refresh must not wait on its own transaction");

        assert_eq!(report.results[0].status, RefreshStatus::NotFound);
        assert_eq!(report.results[0].ticker.as_deref(), Some("7203"));
        assert!(report.updated_assets.is_empty());
        assert!(matches!(svc.get_asset(asset.id).await, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn refreshed_snapshot_uses_the_local_date() {
        let svc = service(StubQuotes::default().with_price("GOOD", dec!(900))).await;
        let asset = svc.create_asset(new_asset("GOOD", dec!(1), dec!(1000))).await.unwrap();

        svc.refresh_prices(&[asset.id]).await;

        let history = svc.price_history(asset.id).await.unwrap();
        assert!(history.iter().all(|s| s.date == today()));
    }
}
