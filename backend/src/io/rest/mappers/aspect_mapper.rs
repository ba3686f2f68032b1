use crate::domain::commands::aspects::{AspectCommand, RuleCommand};
use crate::domain::errors::PointError;
use crate::domain::models::aspect::{AspectRule as DomainRule, AspectWithRules};
use shared::{
    Aspect as SharedAspect, AspectListResponse, AspectRule as SharedRule, CreateAspectRequest,
    CreateRuleRequest, UpdateAspectRequest, UpdateRuleRequest,
};

/// Mapper between aspect/rule DTOs and the domain models.
pub struct AspectMapper;

impl AspectMapper {
    pub fn to_dto(domain: AspectWithRules) -> SharedAspect {
        SharedAspect {
            id: domain.aspect.id,
            name: domain.aspect.name,
            polarity: domain.aspect.polarity,
            input_method: domain.aspect.input_method,
            active: domain.aspect.active,
            rules: domain.rules.into_iter().map(Self::to_rule_dto).collect(),
        }
    }

    pub fn to_rule_dto(domain: DomainRule) -> SharedRule {
        SharedRule {
            id: domain.id,
            aspect_id: domain.aspect_id,
            name: domain.name,
            point: domain.point,
            created_at: domain.created_at,
        }
    }

    pub fn to_aspect_list_dto(aspects: Vec<AspectWithRules>) -> AspectListResponse {
        AspectListResponse {
            aspects: aspects.into_iter().map(Self::to_dto).collect(),
        }
    }

    /// Split a create request into the aspect and its optional first rule.
    /// A rule name without a point (or the reverse) is rejected.
    pub fn to_create_commands(
        request: CreateAspectRequest,
    ) -> Result<(AspectCommand, Option<RuleCommand>), PointError> {
        let rule_name = request.rule_name.filter(|n| !n.trim().is_empty());
        let initial_rule = match (rule_name, request.rule_point) {
            (Some(name), Some(point)) => Some(RuleCommand { name, point }),
            (None, None) => None,
            _ => {
                return Err(PointError::invalid(
                    "An initial rule needs both a name and a point",
                ))
            }
        };

        Ok((
            AspectCommand {
                name: request.name,
                polarity: request.polarity,
                input_method: request.input_method,
            },
            initial_rule,
        ))
    }

    pub fn to_update_command(request: UpdateAspectRequest) -> AspectCommand {
        AspectCommand {
            name: request.name,
            polarity: request.polarity,
            input_method: request.input_method,
        }
    }

    pub fn to_create_rule_command(request: CreateRuleRequest) -> RuleCommand {
        RuleCommand {
            name: request.name,
            point: request.point,
        }
    }

    pub fn to_update_rule_command(request: UpdateRuleRequest) -> RuleCommand {
        RuleCommand {
            name: request.name,
            point: request.point,
        }
    }
}
