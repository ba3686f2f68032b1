use crate::domain::models::settings::{SchoolSettings, SettingEntry};
use shared::{ResolvedSettingsResponse, Setting, SettingListResponse};

pub struct SettingsMapper;

impl SettingsMapper {
    pub fn to_dto(entry: SettingEntry) -> Setting {
        Setting {
            key: entry.key,
            value: entry.value,
            updated_at: entry.updated_at,
        }
    }

    pub fn to_setting_list_dto(entries: Vec<SettingEntry>) -> SettingListResponse {
        SettingListResponse {
            settings: entries.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_resolved_dto(settings: SchoolSettings) -> ResolvedSettingsResponse {
        ResolvedSettingsResponse {
            school_start_time: settings.school_start_time.to_string(),
            late_penalty_minutes: settings.late_penalty_minutes,
            late_penalty_points: settings.late_penalty_points,
        }
    }
}
