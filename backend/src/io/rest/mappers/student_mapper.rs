use crate::domain::commands::students::StudentCommand;
use crate::domain::models::student::Student as DomainStudent;
use crate::io::rest::mappers::non_blank;
use shared::{
    CreateStudentRequest, Student as SharedStudent, StudentListResponse, UpdateStudentRequest,
};

/// Mapper between student DTOs and the domain student model.
pub struct StudentMapper;

impl StudentMapper {
    pub fn to_dto(domain: DomainStudent) -> SharedStudent {
        SharedStudent {
            id: domain.id,
            nisn: domain.nisn,
            name: domain.name,
            gender: domain.gender,
            class_id: domain.class_id,
            class_name: domain.class_name,
            created_at: domain.created_at,
        }
    }

    pub fn to_student_list_dto(students: Vec<DomainStudent>) -> StudentListResponse {
        StudentListResponse {
            students: students.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateStudentRequest) -> StudentCommand {
        StudentCommand {
            nisn: request.nisn,
            name: request.name,
            class_id: non_blank(request.class_id),
            gender: request.gender,
        }
    }

    pub fn to_update_command(request: UpdateStudentRequest) -> StudentCommand {
        StudentCommand {
            nisn: request.nisn,
            name: request.name,
            class_id: non_blank(request.class_id),
            gender: request.gender,
        }
    }
}
