use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::transform::{EncoderState, FittedTransformerState, ScalerState};

pub const ENCODER_BLOB: &str = "encoder";
pub const SCALER_BLOB: &str = "scaler";

/// Persisted transformer state: the encoder and the scaler live in separate
/// rows so either can be reloaded on its own.
pub struct StateStore {
    conn: Connection,
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub name: String,
    pub kind: String,
    pub fitted_at: DateTime<Utc>,
}

impl StateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_db()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS transformer_state (
                name TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                payload_json TEXT NOT NULL,
                fitted_at TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Store both blobs of a fit in one transaction.
    pub fn save_state(&mut self, state: &FittedTransformerState) -> Result<()> {
        let fitted_at = Utc::now();
        let tx = self.conn.transaction()?;
        put_blob(&tx, ENCODER_BLOB, "one_hot", &state.encoder, fitted_at)?;
        put_blob(&tx, SCALER_BLOB, "min_max", &state.scaler, fitted_at)?;
        tx.commit()?;

        tracing::info!("Transformer state saved ({} indicator columns)", state.encoder.width());
        Ok(())
    }

    pub fn save_encoder(&self, encoder: &EncoderState) -> Result<()> {
        put_blob(&self.conn, ENCODER_BLOB, "one_hot", encoder, Utc::now())
    }

    pub fn save_scaler(&self, scaler: &ScalerState) -> Result<()> {
        put_blob(&self.conn, SCALER_BLOB, "min_max", scaler, Utc::now())
    }

    pub fn load_encoder(&self) -> Result<EncoderState> {
        self.get_blob(ENCODER_BLOB)
    }

    pub fn load_scaler(&self) -> Result<ScalerState> {
        self.get_blob(SCALER_BLOB)
    }

    pub fn load_state(&self) -> Result<FittedTransformerState> {
        Ok(FittedTransformerState {
            encoder: self.load_encoder()?,
            scaler: self.load_scaler()?,
        })
    }

    pub fn list_blobs(&self) -> Result<Vec<StoredBlob>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, kind, fitted_at FROM transformer_state ORDER BY name")?;

        let blobs = stmt.query_map([], |row| {
            let fitted_at: String = row.get(2)?;
            Ok(StoredBlob {
                name: row.get(0)?,
                kind: row.get(1)?,
                fitted_at: DateTime::parse_from_rfc3339(&fitted_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        blobs.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn get_blob<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload_json FROM transformer_state WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        let payload = payload.ok_or_else(|| Error::StateNotFound(name.to_string()))?;
        Ok(serde_json::from_str(&payload)?)
    }
}

fn put_blob<T: Serialize>(
    conn: &Connection,
    name: &str,
    kind: &str,
    value: &T,
    fitted_at: DateTime<Utc>,
) -> Result<()> {
    let payload = serde_json::to_string(value)?;
    conn.execute(
        r#"
        INSERT INTO transformer_state (name, kind, payload_json, fitted_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(name) DO UPDATE SET
            kind = excluded.kind,
            payload_json = excluded.payload_json,
            fitted_at = excluded.fitted_at
        "#,
        params![name, kind, payload, fitted_at.to_rfc3339()],
    )?;
    Ok(())
}
