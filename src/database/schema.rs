// Reference SQL for the tables this tool touches. The live DDL is issued by
// PostgresManager::init_tables; these constants document the expected shape.

pub const CREATE_MARKET_CANDLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS market_candles (
    id SERIAL PRIMARY KEY,
    symbol VARCHAR NOT NULL,
    timeframe VARCHAR NOT NULL,
    open_time TIMESTAMPTZ NOT NULL,
    open_price DOUBLE PRECISION NOT NULL,
    high_price DOUBLE PRECISION NOT NULL,
    low_price DOUBLE PRECISION NOT NULL,
    close_price DOUBLE PRECISION NOT NULL,
    volume DOUBLE PRECISION NOT NULL,
    UNIQUE(symbol, timeframe, open_time)
);
"#;

pub const CREATE_BOLLINGER_BANDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS bollinger_bands (
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
);
"#;

pub const CREATE_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_bollinger_bands_symbol_timeframe ON bollinger_bands(symbol, timeframe);
CREATE INDEX IF NOT EXISTS idx_bollinger_bands_open_time ON bollinger_bands(open_time DESC);
"#;
