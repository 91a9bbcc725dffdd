//! Mapping followed by copybook rendering

use crate::config::MapperConfig;
use crate::copybook::{Copybook, FieldMapping};
use crate::error::Result;
use crate::expression::ExprFactory;
use crate::mapper::{Mapper, MapperFactory};
use crate::model::{Record, Scope};
use crate::registry::FunctionRegistry;
use crate::resolve::CompositeResolver;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// Configuration document for a [`Pipeline`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Mapping specification, output field to mapping value
    #[serde(default)]
    pub mappings: Map<String, JsonValue>,
    /// Record layout
    pub copybook: Copybook,
    /// Schema field name to dotted path into the mapped record
    #[serde(default)]
    pub field_mapping: FieldMapping,
    /// Overrides the environment when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_mapping_errors: Option<bool>,
    /// Values available to expressions as `$property.<name>`
    #[serde(default)]
    pub properties: Record,
}

impl PipelineConfig {
    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Explicit flag if present, otherwise the environment
    pub fn mapper_config(&self) -> MapperConfig {
        self.ignore_mapping_errors
            .map(MapperConfig::new)
            .unwrap_or_else(MapperConfig::from_env)
    }
}

/// Compiled mapper plus copybook, immutable after construction
#[derive(Debug, Clone)]
pub struct Pipeline {
    mapper: Option<Mapper>,
    copybook: Copybook,
    field_mapping: FieldMapping,
}

impl Pipeline {
    /// Compile a configuration with the built-in functions
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_functions(config, Arc::new(FunctionRegistry::with_builtins()))
    }

    /// Compile a configuration against an explicit function registry
    pub fn with_functions(
        config: PipelineConfig,
        functions: Arc<FunctionRegistry>,
    ) -> Result<Self> {
        config.copybook.validate()?;

        let mapper_config = config.mapper_config();
        let resolver = Arc::new(CompositeResolver::with_properties(config.properties));
        let factory = MapperFactory::new(ExprFactory::new(resolver, functions), mapper_config);
        let mapper = factory.new_mapper(&config.mappings)?;

        if mapper.is_none() {
            log::debug!("Mapping specification is empty; records will have no fields");
        }

        Ok(Self {
            mapper,
            copybook: config.copybook,
            field_mapping: config.field_mapping,
        })
    }

    /// Parse and compile a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(PipelineConfig::from_json(json)?)
    }

    /// The record layout
    pub fn copybook(&self) -> &Copybook {
        &self.copybook
    }

    /// Rendered length of every record
    pub fn record_length(&self) -> usize {
        self.copybook.record_length()
    }

    /// Apply the mapper; an empty mapping yields an empty record
    pub fn map(&self, scope: &dyn Scope) -> Result<Record> {
        match &self.mapper {
            Some(mapper) => Ok(mapper.apply(scope)?),
            None => Ok(Record::new()),
        }
    }

    /// Render an already mapped record
    pub fn render(&self, record: &Record) -> Result<String> {
        Ok(self.copybook.render(&self.field_mapping, record)?)
    }

    /// Map the scope and render the result
    pub fn run(&self, scope: &dyn Scope) -> Result<String> {
        let record = self.map(scope)?;
        self.render(&record)
    }
}
