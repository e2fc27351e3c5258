use crate::rows::{AssetRow, PriceSnapshotRow};
use crate::DbError;
use chrono::NaiveDate;
use core_types::{Asset, NewPriceSnapshot, PriceSnapshot};
use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use sqlx::Transaction;
use std::collections::HashMap;

const ASSET_COLUMNS: &str = "id, name, ticker, type, quantity, purchase_price, purchase_date, \
     current_price, current_value, performance, last_updated";

/// The `DbRepository` owns the connection pool and hands out units of work.
///
/// The query functions in this module take the connection they run on, so a
/// caller can group several of them into one transaction:
///
/// ```ignore
/// let mut tx = repo.begin().await?;
/// let asset = repository::insert_asset(&mut tx, &asset).await?;
/// repository::insert_snapshot(&mut tx, &NewPriceSnapshot::of(&asset, today)).await?;
/// tx.commit().await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Starts a transaction. Dropping it without `commit` rolls it back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, DbError> {
        Ok(self.pool.begin().await?)
    }
}

/// Fetches one page of assets ordered by id.
pub async fn list_assets(
    conn: &mut SqliteConnection,
    skip: i64,
    limit: i64,
) -> Result<Vec<Asset>, DbError> {
    let rows = sqlx::query_as::<_, AssetRow>(&format!(
        "SELECT {ASSET_COLUMNS} FROM assets ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(Asset::try_from).collect()
}

/// Fetches every asset ordered by id.
pub async fn all_assets(conn: &mut SqliteConnection) -> Result<Vec<Asset>, DbError> {
    let rows = sqlx::query_as::<_, AssetRow>(&format!(
        "SELECT {ASSET_COLUMNS} FROM assets ORDER BY id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(Asset::try_from).collect()
}

/// Fetches a single asset, or `None` when the id is unknown.
pub async fn find_asset(conn: &mut SqliteConnection, id: i64) -> Result<Option<Asset>, DbError> {
    let row = sqlx::query_as::<_, AssetRow>(&format!(
        "SELECT {ASSET_COLUMNS} FROM assets WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(Asset::try_from).transpose()
}

/// Inserts a new asset and returns it with its assigned id.
pub async fn insert_asset(conn: &mut SqliteConnection, asset: &Asset) -> Result<Asset, DbError> {
    let result = sqlx::query(
        r#"
        INSERT INTO assets (
            name, ticker, type, quantity, purchase_price, purchase_date,
            current_price, current_value, performance, last_updated
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&asset.name)
    .bind(&asset.ticker)
    .bind(&asset.asset_type)
    .bind(asset.quantity.to_string())
    .bind(asset.purchase_price.to_string())
    .bind(asset.purchase_date)
    .bind(asset.current_price.to_string())
    .bind(asset.current_value.to_string())
    .bind(asset.performance.to_string())
    .bind(asset.last_updated)
    .execute(&mut *conn)
    .await?;

    Ok(Asset {
        id: result.last_insert_rowid(),
        ..asset.clone()
    })
}

/// Overwrites every stored column of an existing asset.
pub async fn update_asset(conn: &mut SqliteConnection, asset: &Asset) -> Result<(), DbError> {
    sqlx::query(
        r#"
        UPDATE assets SET
            name = ?, ticker = ?, type = ?, quantity = ?, purchase_price = ?,
            purchase_date = ?, current_price = ?, current_value = ?, performance = ?,
            last_updated = ?
        WHERE id = ?
        "#,
    )
    .bind(&asset.name)
    .bind(&asset.ticker)
    .bind(&asset.asset_type)
    .bind(asset.quantity.to_string())
    .bind(asset.purchase_price.to_string())
    .bind(asset.purchase_date)
    .bind(asset.current_price.to_string())
    .bind(asset.current_value.to_string())
    .bind(asset.performance.to_string())
    .bind(asset.last_updated)
    .bind(asset.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Deletes an asset together with its whole price history.
///
/// Returns the number of asset rows removed (0 or 1).
pub async fn delete_asset(conn: &mut SqliteConnection, id: i64) -> Result<u64, DbError> {
    sqlx::query("DELETE FROM price_history WHERE asset_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM assets WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Appends a price snapshot. Snapshots are never updated afterwards.
pub async fn insert_snapshot(
    conn: &mut SqliteConnection,
    snapshot: &NewPriceSnapshot,
) -> Result<PriceSnapshot, DbError> {
    let result = sqlx::query("INSERT INTO price_history (asset_id, date, price, value) VALUES (?, ?, ?, ?)")
        .bind(snapshot.asset_id)
        .bind(snapshot.date)
        .bind(snapshot.price.to_string())
        .bind(snapshot.value.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(PriceSnapshot {
        id: result.last_insert_rowid(),
        asset_id: snapshot.asset_id,
        date: snapshot.date,
        price: snapshot.price,
        value: snapshot.value,
    })
}

/// The full price history of one asset, oldest first.
pub async fn snapshots_for_asset(
    conn: &mut SqliteConnection,
    asset_id: i64,
) -> Result<Vec<PriceSnapshot>, DbError> {
    let rows = sqlx::query_as::<_, PriceSnapshotRow>(
        "SELECT id, asset_id, date, price, value FROM price_history WHERE asset_id = ? ORDER BY date, id",
    )
    .bind(asset_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(PriceSnapshot::try_from).collect()
}

/// All snapshots dated within `[start, end]`, grouped by asset id.
///
/// Each group is ordered by date, then by insertion order.
pub async fn snapshots_between(
    conn: &mut SqliteConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashMap<i64, Vec<PriceSnapshot>>, DbError> {
    let rows = sqlx::query_as::<_, PriceSnapshotRow>(
        r#"
        SELECT id, asset_id, date, price, value
        FROM price_history
        WHERE date >= ? AND date <= ?
        ORDER BY asset_id, date, id
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(&mut *conn)
    .await?;

    let mut grouped: HashMap<i64, Vec<PriceSnapshot>> = HashMap::new();
    for row in rows {
        let snapshot = PriceSnapshot::try_from(row)?;
        grouped.entry(snapshot.asset_id).or_default().push(snapshot);
    }
    Ok(grouped)
}
