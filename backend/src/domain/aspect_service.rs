//! Aspects (behavior categories) and their fixed-point rules.
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::domain::commands::aspects::{AspectCommand, RuleCommand};
use crate::domain::errors::PointError;
use crate::domain::models::aspect::{Aspect, AspectRule, AspectWithRules};
use crate::domain::{timestamp_now, validate_name};
use crate::storage::{AspectStorage, Connection};

#[derive(Clone)]
pub struct AspectService<C: Connection> {
    aspect_repository: C::AspectRepository,
}

impl<C: Connection> AspectService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            aspect_repository: connection.create_aspect_repository(),
        }
    }

    /// Aspects by name, each with its rules newest first
    pub async fn list_aspects(&self) -> Result<Vec<AspectWithRules>> {
        let aspects = self.aspect_repository.list_aspects().await?;
        let rules = self.aspect_repository.list_rules().await?;

        let listed = aspects
            .into_iter()
            .map(|aspect| {
                let rules = rules
                    .iter()
                    .filter(|r| r.aspect_id == aspect.id)
                    .cloned()
                    .collect();
                AspectWithRules { aspect, rules }
            })
            .collect::<Vec<_>>();

        info!("Found {} aspects and {} rules", listed.len(), rules.len());
        Ok(listed)
    }

    pub async fn get_aspect(&self, aspect_id: &str) -> Result<AspectWithRules> {
        let aspect = self.require_aspect(aspect_id).await?;
        let rules = self
            .aspect_repository
            .list_rules()
            .await?
            .into_iter()
            .filter(|r| r.aspect_id == aspect.id)
            .collect();
        Ok(AspectWithRules { aspect, rules })
    }

    /// Create an aspect, optionally together with its first rule
    pub async fn create_aspect(
        &self,
        command: AspectCommand,
        initial_rule: Option<RuleCommand>,
    ) -> Result<AspectWithRules> {
        info!("Creating aspect: {}", command.name);

        let name = validate_name("Aspect", &command.name)?;
        self.ensure_name_free(&name, None).await?;

        let aspect = Aspect {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            polarity: command.polarity,
            input_method: command.input_method,
            active: true,
            created_at: timestamp_now(),
        };
        let rule = initial_rule
            .map(|rule| build_rule(&aspect.id, rule))
            .transpose()?;

        self.aspect_repository.store_aspect(&aspect).await?;
        if let Some(rule) = &rule {
            self.aspect_repository.store_rule(rule).await?;
        }

        info!("Created aspect {} with ID {}", aspect.name, aspect.id);
        Ok(AspectWithRules {
            aspect,
            rules: rule.into_iter().collect(),
        })
    }

    pub async fn update_aspect(
        &self,
        aspect_id: &str,
        command: AspectCommand,
    ) -> Result<AspectWithRules> {
        info!("Updating aspect: {}", aspect_id);

        let mut aspect = self.require_aspect(aspect_id).await?;
        let name = validate_name("Aspect", &command.name)?;
        self.ensure_name_free(&name, Some(aspect_id)).await?;

        aspect.name = name;
        aspect.polarity = command.polarity;
        aspect.input_method = command.input_method;
        self.aspect_repository.update_aspect(&aspect).await?;

        self.get_aspect(aspect_id).await
    }

    /// Deletes the aspect's rules with it. Existing records keep their
    /// points but lose the aspect reference.
    pub async fn delete_aspect(&self, aspect_id: &str) -> Result<()> {
        info!("Deleting aspect: {}", aspect_id);

        if !self.aspect_repository.delete_aspect(aspect_id).await? {
            return Err(PointError::not_found("Aspect", aspect_id).into());
        }
        Ok(())
    }

    pub async fn create_rule(&self, aspect_id: &str, command: RuleCommand) -> Result<AspectRule> {
        info!("Creating rule '{}' under aspect {}", command.name, aspect_id);

        let aspect = self.require_aspect(aspect_id).await?;
        let rule = build_rule(&aspect.id, command)?;
        self.aspect_repository.store_rule(&rule).await?;

        info!("Created rule {} ({} points)", rule.id, rule.point);
        Ok(rule)
    }

    /// Changing a rule's point does not touch records already written with it
    pub async fn update_rule(&self, rule_id: &str, command: RuleCommand) -> Result<AspectRule> {
        info!("Updating rule: {}", rule_id);

        let mut rule = self
            .aspect_repository
            .get_rule(rule_id)
            .await?
            .ok_or_else(|| PointError::not_found("Rule", rule_id))?;
        rule.name = validate_name("Rule", &command.name)?;
        rule.point = command.point;
        self.aspect_repository.update_rule(&rule).await?;

        Ok(rule)
    }

    pub async fn delete_rule(&self, rule_id: &str) -> Result<()> {
        info!("Deleting rule: {}", rule_id);

        if !self.aspect_repository.delete_rule(rule_id).await? {
            return Err(PointError::not_found("Rule", rule_id).into());
        }
        Ok(())
    }

    async fn require_aspect(&self, aspect_id: &str) -> Result<Aspect> {
        let aspect = self
            .aspect_repository
            .get_aspect(aspect_id)
            .await?
            .ok_or_else(|| PointError::not_found("Aspect", aspect_id))?;
        Ok(aspect)
    }

    async fn ensure_name_free(&self, name: &str, own_id: Option<&str>) -> Result<()> {
        match self.aspect_repository.find_aspect_by_name(name).await? {
            Some(existing) if Some(existing.id.as_str()) != own_id => Err(PointError::invalid(
                format!("An aspect named '{}' already exists", name),
            )
            .into()),
            _ => Ok(()),
        }
    }
}

fn build_rule(aspect_id: &str, command: RuleCommand) -> Result<AspectRule, PointError> {
    Ok(AspectRule {
        id: uuid::Uuid::new_v4().to_string(),
        aspect_id: aspect_id.to_string(),
        name: validate_name("Rule", &command.name)?,
        point: command.point,
        created_at: timestamp_now(),
    })
}
