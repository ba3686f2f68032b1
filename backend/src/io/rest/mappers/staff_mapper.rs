use crate::domain::commands::staff::CreateStaffCommand;
use crate::domain::models::staff::Staff as DomainStaff;
use crate::io::rest::mappers::non_blank;
use shared::{CreateStaffRequest, Staff as SharedStaff, StaffListResponse};

pub struct StaffMapper;

impl StaffMapper {
    pub fn to_dto(domain: DomainStaff) -> SharedStaff {
        SharedStaff {
            id: domain.id,
            name: domain.name,
            role: domain.role,
            class_id: domain.class_id,
            created_at: domain.created_at,
        }
    }

    pub fn to_staff_list_dto(staff: Vec<DomainStaff>) -> StaffListResponse {
        StaffListResponse {
            staff: staff.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_command(request: CreateStaffRequest) -> CreateStaffCommand {
        CreateStaffCommand {
            name: request.name,
            role: request.role,
            class_id: non_blank(request.class_id),
        }
    }
}
