use crate::database::models::{BandRecord, CandleData, MarketCandle};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};

pub struct PostgresManager {
    pool: PgPool,
}

impl PostgresManager {
    pub async fn new(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        dbname: &str,
        max_connections: usize,
    ) -> Result<Self> {
        let connection_string = format!(
            "postgres://{}:{}@{}:{}/{}",
            user, password, host, port, dbname
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections as u32)
            .connect(&connection_string)
            .await
            .context("Failed to create database connection pool")?;

        Ok(Self { pool })
    }

    // Create tables if they don't exist
    pub async fn init_tables(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS bollinger_bands (
                id SERIAL PRIMARY KEY,
                symbol VARCHAR NOT NULL,
                timeframe VARCHAR NOT NULL,
                open_time TIMESTAMPTZ NOT NULL,
                open_price DOUBLE PRECISION NOT NULL,
                high_price DOUBLE PRECISION NOT NULL,
                low_price DOUBLE PRECISION NOT NULL,
                close_price DOUBLE PRECISION NOT NULL,
                volume DOUBLE PRECISION NOT NULL,
                bb_upper DOUBLE PRECISION NOT NULL,
                bb_lower DOUBLE PRECISION NOT NULL,
                bb_middle DOUBLE PRECISION NOT NULL,
                bb_width DOUBLE PRECISION NOT NULL,
                bb_percent DOUBLE PRECISION NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                UNIQUE(symbol, timeframe, open_time)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_bollinger_bands_symbol_timeframe ON bollinger_bands(symbol, timeframe)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_bollinger_bands_open_time ON bollinger_bands(open_time DESC)",
        )
        .execute(&self.pool)
        .await?;

        info!("Database tables initialized successfully");
        Ok(())
    }

    // Get candle data for a specific symbol and timeframe
    pub async fn get_candle_data(&self, symbol: &str, timeframe: &str) -> Result<CandleData> {
        let candles = sqlx::query_as::<_, MarketCandle>(
            "SELECT id, symbol, timeframe, open_time, open_price, high_price, low_price, close_price, volume
            FROM market_candles
            WHERE symbol = $1 AND timeframe = $2
            ORDER BY open_time ASC",
        )
        .bind(symbol)
        .bind(timeframe)
        .fetch_all(&self.pool)
        .await?;

        if candles.is_empty() {
            return Ok(CandleData::new(symbol.to_string(), timeframe.to_string()));
        }

        Ok(CandleData::from_candles(candles))
    }

    // Upsert calculated band rows; duplicate keys replace prior values
    pub async fn upsert_band_records(&self, records: &[BandRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut written = 0;

        for record in records {
            let result = sqlx::query(
                "INSERT INTO bollinger_bands
                (symbol, timeframe, open_time, open_price, high_price, low_price, close_price, volume,
                 bb_upper, bb_lower, bb_middle, bb_width, bb_percent)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (symbol, timeframe, open_time)
                DO UPDATE SET
                    open_price = EXCLUDED.open_price,
                    high_price = EXCLUDED.high_price,
                    low_price = EXCLUDED.low_price,
                    close_price = EXCLUDED.close_price,
                    volume = EXCLUDED.volume,
                    bb_upper = EXCLUDED.bb_upper,
                    bb_lower = EXCLUDED.bb_lower,
                    bb_middle = EXCLUDED.bb_middle,
                    bb_width = EXCLUDED.bb_width,
                    bb_percent = EXCLUDED.bb_percent",
            )
            .bind(&record.symbol)
            .bind(&record.timeframe)
            .bind(record.open_time)
            .bind(record.open)
            .bind(record.high)
            .bind(record.low)
            .bind(record.close)
            .bind(record.volume)
            .bind(record.bb_upper)
            .bind(record.bb_lower)
            .bind(record.bb_middle)
            .bind(record.bb_width)
            .bind(record.bb_percent)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => written += 1,
                Err(e) => {
                    error!(
                        "Error upserting band row for {} at {}: {}",
                        record.symbol, record.open_time, e
                    );
                    // Continue with the rest of the batch
                }
            }
        }

        Ok(written)
    }
}
