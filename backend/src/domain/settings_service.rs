//! Settings resolver and settings administration.
//!
//! The attendance policy is read from storage on every call; nothing is
//! cached in-process, so an update is visible to the very next scan.
use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use shared::StaffRole;
use tracing::{info, warn};

use crate::domain::errors::PointError;
use crate::domain::lateness::ClockTime;
use crate::domain::models::settings::{
    SchoolSettings, SettingEntry, LATE_PENALTY_MINUTES_KEY, LATE_PENALTY_POINTS_KEY,
    SCHOOL_START_TIME_KEY,
};
use crate::domain::models::staff::Staff;
use crate::domain::timestamp_now;
use crate::storage::{Connection, SettingsStorage};

#[derive(Clone)]
pub struct SettingsService<C: Connection> {
    settings_repository: C::SettingsRepository,
}

impl<C: Connection> SettingsService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            settings_repository: connection.create_settings_repository(),
        }
    }

    /// Current attendance policy, with defaults for absent keys.
    ///
    /// An unreachable store fails with `Persistence`; a stored value that
    /// cannot be parsed fails with `InvalidInput`.
    pub async fn resolve(&self) -> Result<SchoolSettings> {
        let entries = self
            .settings_repository
            .list_settings()
            .await
            .map_err(PointError::persistence)?;

        let mut settings = SchoolSettings::default();
        for entry in &entries {
            match entry.key.as_str() {
                SCHOOL_START_TIME_KEY => {
                    settings.school_start_time = parse_start_time(&entry.value)?;
                }
                // Positivity is checked on write and by the calculator when
                // an arrival is actually late.
                LATE_PENALTY_MINUTES_KEY => {
                    settings.late_penalty_minutes = parse_integer(&entry.key, &entry.value)?;
                }
                LATE_PENALTY_POINTS_KEY => {
                    settings.late_penalty_points = parse_integer(&entry.key, &entry.value)?;
                }
                _ => {}
            }
        }

        Ok(settings)
    }

    /// Every stored row, ordered by key
    pub async fn list_settings(&self) -> Result<Vec<SettingEntry>> {
        self.settings_repository.list_settings().await
    }

    /// Validate and upsert one key. Admin only.
    pub async fn update_setting(
        &self,
        actor: &Staff,
        key: &str,
        value: &str,
    ) -> Result<SettingEntry> {
        actor.ensure_role(&[StaffRole::Admin], "change settings")?;
        info!("Updating setting {} by {}", key, actor.id);

        let entry = validated_entry(key, value, timestamp_now())?;
        self.settings_repository.upsert_setting(&entry).await?;

        info!("Setting {} is now '{}'", entry.key, entry.value);
        Ok(entry)
    }

    /// Validate every entry, then upsert them all in one transaction.
    /// Admin only.
    pub async fn update_settings(
        &self,
        actor: &Staff,
        values: &BTreeMap<String, String>,
    ) -> Result<Vec<SettingEntry>> {
        actor.ensure_role(&[StaffRole::Admin], "change settings")?;
        info!("Updating {} settings by {}", values.len(), actor.id);

        if values.is_empty() {
            return Err(PointError::invalid("No settings given").into());
        }

        let updated_at = timestamp_now();
        let entries = values
            .iter()
            .map(|(key, value)| validated_entry(key, value, updated_at.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        self.settings_repository.upsert_settings(&entries).await?;

        info!("Updated settings: {:?}", values.keys().collect::<Vec<_>>());
        Ok(entries)
    }
}

fn validated_entry(key: &str, value: &str, updated_at: String) -> Result<SettingEntry, PointError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(PointError::invalid("Setting key cannot be empty"));
    }

    let value = match key {
        SCHOOL_START_TIME_KEY => parse_start_time(value)?.to_string(),
        LATE_PENALTY_MINUTES_KEY => parse_interval(value)?.to_string(),
        LATE_PENALTY_POINTS_KEY => parse_integer(key, value)?.to_string(),
        _ => {
            warn!("Storing unrecognized setting {}", key);
            value.to_string()
        }
    };

    Ok(SettingEntry {
        key: key.to_string(),
        value,
        updated_at,
    })
}

fn parse_start_time(value: &str) -> Result<ClockTime, PointError> {
    value.parse::<ClockTime>().map_err(|_| {
        PointError::invalid(format!(
            "{} must be a time in HH:MM format, got '{}'",
            SCHOOL_START_TIME_KEY, value
        ))
    })
}

fn parse_integer(key: &str, value: &str) -> Result<i64, PointError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| PointError::invalid(format!("{} must be an integer, got '{}'", key, value)))
}

fn parse_interval(value: &str) -> Result<i64, PointError> {
    let minutes = parse_integer(LATE_PENALTY_MINUTES_KEY, value)?;
    if minutes <= 0 {
        return Err(PointError::invalid(format!(
            "{} must be a positive number of minutes, got {}",
            LATE_PENALTY_MINUTES_KEY, minutes
        )));
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{connection, staff};
    use crate::storage::DbConnection;

    async fn service() -> (SettingsService<DbConnection>, Arc<DbConnection>) {
        let conn = connection().await;
        (SettingsService::new(conn.clone()), conn)
    }

    fn admin() -> Staff {
        staff("admin", StaffRole::Admin, None)
    }

    #[tokio::test]
    async fn test_resolve_uses_defaults_when_empty() {
        let (service, _) = service().await;
        let settings = service.resolve().await.unwrap();
        assert_eq!(settings, SchoolSettings::default());
        assert_eq!(settings.school_start_time.to_string(), "07:30");
        assert_eq!(settings.late_penalty_minutes, 5);
        assert_eq!(settings.late_penalty_points, -1);
    }

    #[tokio::test]
    async fn test_resolve_mixes_stored_values_and_defaults() {
        let (service, _) = service().await;
        service
            .update_setting(&admin(), SCHOOL_START_TIME_KEY, "7:00")
            .await
            .unwrap();

        let settings = service.resolve().await.unwrap();
        assert_eq!(settings.school_start_time, ClockTime::new(7, 0));
        assert_eq!(settings.late_penalty_minutes, 5);
    }

    #[tokio::test]
    async fn test_update_is_visible_to_next_resolve() {
        let (service, _) = service().await;
        service
            .update_setting(&admin(), LATE_PENALTY_POINTS_KEY, "-2")
            .await
            .unwrap();
        assert_eq!(service.resolve().await.unwrap().late_penalty_points, -2);
        service
            .update_setting(&admin(), LATE_PENALTY_POINTS_KEY, "-3")
            .await
            .unwrap();
        assert_eq!(service.resolve().await.unwrap().late_penalty_points, -3);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_update() {
        let (service, _) = service().await;
        let walas = staff("walas", StaffRole::Walas, None);
        let err = service
            .update_setting(&walas, LATE_PENALTY_MINUTES_KEY, "10")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PointError>(),
            Some(PointError::Unauthorized(_))
        ));
        assert!(service.list_settings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_interval_must_be_positive() {
        let (service, _) = service().await;
        for bad in ["0", "-5", "five"] {
            let err = service
                .update_setting(&admin(), LATE_PENALTY_MINUTES_KEY, bad)
                .await
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<PointError>(),
                Some(PointError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_batch_update_rejects_everything_on_one_bad_value() {
        let (service, _) = service().await;
        let mut values = BTreeMap::new();
        values.insert(SCHOOL_START_TIME_KEY.to_string(), "06:45".to_string());
        values.insert(LATE_PENALTY_MINUTES_KEY.to_string(), "0".to_string());

        assert!(service.update_settings(&admin(), &values).await.is_err());
        assert!(service.list_settings().await.unwrap().is_empty());

        values.insert(LATE_PENALTY_MINUTES_KEY.to_string(), "10".to_string());
        let stored = service.update_settings(&admin(), &values).await.unwrap();
        assert_eq!(stored.len(), 2);
        let settings = service.resolve().await.unwrap();
        assert_eq!(settings.school_start_time, ClockTime::new(6, 45));
        assert_eq!(settings.late_penalty_minutes, 10);
    }

    #[tokio::test]
    async fn test_corrupt_stored_value_fails_resolution() {
        let (service, conn) = service().await;
        conn.create_settings_repository()
            .upsert_setting(&SettingEntry {
                key: LATE_PENALTY_MINUTES_KEY.to_string(),
                value: "five".to_string(),
                updated_at: timestamp_now(),
            })
            .await
            .unwrap();

        let err = service.resolve().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PointError>(),
            Some(PointError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_persistence_failure() {
        let (service, conn) = service().await;
        conn.close().await;

        let err = service.resolve().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PointError>(),
            Some(PointError::Persistence(_))
        ));
    }
}
