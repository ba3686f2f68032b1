use crate::domain::commands::classes::ClassCommand;
use crate::domain::models::school_class::SchoolClass as DomainClass;
use shared::{ClassListResponse, CreateClassRequest, SchoolClass as SharedClass, UpdateClassRequest};

/// Mapper between class DTOs and the domain class model.
pub struct ClassMapper;

impl ClassMapper {
    pub fn to_dto(domain: DomainClass) -> SharedClass {
        SharedClass {
            id: domain.id,
            name: domain.name,
            grade: domain.grade,
            created_at: domain.created_at,
        }
    }

    pub fn to_class_list_dto(classes: Vec<DomainClass>) -> ClassListResponse {
        ClassListResponse {
            classes: classes.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateClassRequest) -> ClassCommand {
        ClassCommand {
            name: request.name,
            grade: request.grade,
        }
    }

    pub fn to_update_command(request: UpdateClassRequest) -> ClassCommand {
        ClassCommand {
            name: request.name,
            grade: request.grade,
        }
    }
}
