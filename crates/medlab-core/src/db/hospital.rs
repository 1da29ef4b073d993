//! Hospital profile persistence (single row).

use rusqlite::{params, Connection, OptionalExtension};

use super::DbResult;
use crate::models::{HospitalDetails, HospitalDetailsPatch};

/// Singleton store for the laboratory profile.
pub struct HospitalStore<'c> {
    conn: &'c Connection,
}

impl<'c> HospitalStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Current profile, or the built-in default if none was saved.
    pub fn get(&self) -> DbResult<HospitalDetails> {
        let stored: Option<String> = self
            .conn
            .query_row("SELECT details FROM hospital_details WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match stored {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(HospitalDetails::default()),
        }
    }

    /// Replace the whole profile.
    pub fn save(&self, details: &HospitalDetails) -> DbResult<()> {
        let json = serde_json::to_string(details)?;
        self.conn.execute(
            r#"
            INSERT INTO hospital_details (id, details, updated_at)
            VALUES (1, ?1, datetime('now'))
            ON CONFLICT(id) DO UPDATE SET
                details = excluded.details,
                updated_at = datetime('now')
            "#,
            params![json],
        )?;
        tracing::debug!(name = %details.name, "hospital profile saved");
        Ok(())
    }

    /// Overlay a partial update onto the current profile.
    pub fn merge(&self, patch: HospitalDetailsPatch) -> DbResult<HospitalDetails> {
        let mut details = self.get()?;
        details.apply(patch);
        self.save(&details)?;
        Ok(details)
    }

    /// Drop the saved profile, falling back to the default.
    pub fn reset(&self) -> DbResult<HospitalDetails> {
        self.conn.execute("DELETE FROM hospital_details", [])?;
        tracing::debug!("hospital profile reset");
        Ok(HospitalDetails::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_default_when_unsaved() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.hospital().get().unwrap(), HospitalDetails::default());
    }

    #[test]
    fn test_merge_then_reset() {
        let db = Database::open_in_memory().unwrap();
        let store = db.hospital();

        let merged = store
            .merge(HospitalDetailsPatch {
                phone: Some("080-2222-3333".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(merged.phone, "080-2222-3333");
        assert_eq!(store.get().unwrap(), merged);

        store.reset().unwrap();
        assert_eq!(store.get().unwrap(), HospitalDetails::default());
    }

    #[test]
    fn test_save_replaces() {
        let db = Database::open_in_memory().unwrap();
        let store = db.hospital();

        let details = HospitalDetails {
            name: "Small Lab".into(),
            address: "1 Road".into(),
            phone: "1".into(),
            email: None,
            website: None,
            registration_number: None,
            tax_id: None,
            logo: None,
            footer: None,
            bank_details: None,
        };
        store.save(&details).unwrap();
        assert_eq!(store.get().unwrap(), details);
    }
}
