//! Mapping for the recording and report endpoints.

use crate::domain::commands::recording::{
    CreateRecordsCommand, CreateRecordsResult, ScanCommand, ScanResult,
};
use crate::domain::commands::reports::{DeleteKind, DeleteRecordsCommand};
use crate::domain::errors::PointError;
use crate::domain::lateness::ClockTime;
use crate::domain::models::record::{RecordFilter, RecordView};
use crate::io::rest::mappers::{non_blank, parse_optional_date};
use shared::{
    CreateRecordsRequest, CreateRecordsResponse, DeleteRecordsKind, DeleteRecordsRequest,
    PointRecord as SharedRecord, RecordListResponse, RecordsQuery, ScanRequest, ScanResponse,
};

pub struct RecordMapper;

impl RecordMapper {
    pub fn to_dto(view: RecordView) -> SharedRecord {
        SharedRecord {
            id: view.id,
            student_id: view.student_id,
            student_name: view.student_name,
            student_nisn: view.student_nisn,
            class_id: view.class_id,
            class_name: view.class_name,
            aspect_id: view.aspect_id,
            aspect_name: view.aspect_name,
            aspect_polarity: view.aspect_polarity,
            rule_id: view.rule_id,
            rule_name: view.rule_name,
            point: view.point,
            input_date: view.input_date.format("%Y-%m-%d").to_string(),
            note: view.note,
            input_by: view.input_by,
            created_at: view.created_at,
        }
    }

    pub fn to_record_list_dto(records: Vec<RecordView>) -> RecordListResponse {
        RecordListResponse {
            records: records.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_filter(query: RecordsQuery) -> Result<RecordFilter, PointError> {
        Ok(RecordFilter {
            start_date: parse_optional_date("start_date", query.start_date.as_deref())?,
            end_date: parse_optional_date("end_date", query.end_date.as_deref())?,
            class_id: non_blank(query.class_id),
            polarity: query.polarity,
        })
    }

    pub fn to_scan_command(request: ScanRequest) -> Result<ScanCommand, PointError> {
        let arrival_time = match non_blank(request.arrival_time) {
            Some(time) => Some(time.parse::<ClockTime>()?),
            None => None,
        };
        Ok(ScanCommand {
            token: request.token,
            aspect_id: non_blank(request.aspect_id),
            rule_id: non_blank(request.rule_id),
            input_date: parse_optional_date("date", request.date.as_deref())?,
            arrival_time,
        })
    }

    pub fn to_scan_dto(result: ScanResult) -> ScanResponse {
        ScanResponse {
            success: true,
            record_id: result.record_id,
            student_name: result.student_name,
            class_name: result.class_name,
            arrival_time: result.arrival_time.to_string(),
            is_late: result.is_late,
            late_minutes: result.late_minutes,
            point: result.point,
        }
    }

    pub fn to_create_records_command(
        request: CreateRecordsRequest,
    ) -> Result<CreateRecordsCommand, PointError> {
        Ok(CreateRecordsCommand {
            student_ids: request.student_ids,
            aspect_id: non_blank(request.aspect_id),
            rule_id: non_blank(request.rule_id),
            input_date: parse_optional_date("date", request.date.as_deref())?,
        })
    }

    pub fn to_create_records_dto(result: CreateRecordsResult) -> CreateRecordsResponse {
        CreateRecordsResponse {
            success: true,
            count: result.count,
            skipped_student_ids: result.skipped_student_ids,
        }
    }

    pub fn to_delete_command(
        request: DeleteRecordsRequest,
    ) -> Result<DeleteRecordsCommand, PointError> {
        Ok(DeleteRecordsCommand {
            kind: match request.kind {
                DeleteRecordsKind::All => DeleteKind::All,
                DeleteRecordsKind::Attendance => DeleteKind::Attendance,
                DeleteRecordsKind::Violations => DeleteKind::Violations,
            },
            start_date: parse_optional_date("start_date", request.start_date.as_deref())?,
            end_date: parse_optional_date("end_date", request.end_date.as_deref())?,
        })
    }
}
