use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::{
    config::yml_settings::TemplateSettings,
    domain::{Request, RequestTemplate},
};

pub const DEFAULT_CONFIG_FILE: &str = "templates.yml";

/// Published templates keyed by operation name
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Arc<RequestTemplate>>,
}

impl TemplateRegistry {
    /// Builds the registry, validating every pattern up front
    pub fn from_settings(settings: Vec<TemplateSettings>) -> Result<Self> {
        let mut templates = HashMap::new();
        for setting in settings {
            let operation = setting.operation.clone();
            let template = RequestTemplate::from(setting);
            template
                .validate()
                .with_context(|| format!("Invalid template for operation '{}'", operation))?;

            if templates
                .insert(operation.clone(), template.into_shared())
                .is_some()
            {
                bail!("Duplicate operation: {}", operation);
            }
        }
        tracing::debug!(count = templates.len(), "loaded request templates");
        Ok(Self { templates })
    }

    pub fn from_yaml_str(yml: &str) -> Result<Self> {
        let settings: Vec<TemplateSettings> =
            serde_yaml::from_str(yml).context("Invalid yaml configuration")?;
        Self::from_settings(settings)
    }

    pub fn load(maybe_path: Option<&Path>) -> Result<Self> {
        let path = maybe_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let yml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_yaml_str(&yml).with_context(|| format!("Could not load {}", path.display()))
    }

    pub fn get(&self, operation: &str) -> Option<&Arc<RequestTemplate>> {
        self.templates.get(operation)
    }

    /// Operation names, sorted
    pub fn operations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn resolve(
        &self,
        operation: &str,
        arguments: &HashMap<String, String>,
        context_id: Option<&str>,
    ) -> Result<Request> {
        let template = self
            .get(operation)
            .with_context(|| format!("Unknown operation: {}", operation))?;
        template
            .resolve_with_context(arguments, context_id)
            .with_context(|| format!("Could not resolve operation '{}'", operation))
    }
}
