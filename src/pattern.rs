//! Pattern host interface.
//!
//! A pattern declares its arguments as a `Schema`, receives them fully bound,
//! and does its own work in `apply`. `PatternRegistry` is the process-scoped
//! parser cache: each schema is compiled once on registration and the registry
//! is read-only afterwards, so it can be shared across threads.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::descriptor::Descriptor;
use crate::error::{BindError, ConfigError, ParseFailure};
use crate::factory::ParserFactory;
use crate::introspect::{introspect, SchemaField};
use crate::lookup::Lookup;
use crate::parser::SchemaParser;
use crate::value::{Schema, StructValue};

// ————————————————————————————————————————————————————————————————————————————
// PATTERN
// ————————————————————————————————————————————————————————————————————————————

pub trait Pattern {
    type Arguments: Schema;

    const NAME: &'static str;

    /// Free-form description for tooling; absence is fine.
    fn documentation() -> Option<&'static str> {
        None
    }

    fn apply(&mut self, arguments: Self::Arguments) -> anyhow::Result<()>;

    /// Bind arguments from the top level and hand them to `apply`.
    ///
    /// Compiles the argument schema on every call. Hosts that run a pattern
    /// more than once should go through `PatternRegistry::run`.
    fn run(&mut self, lookup: &dyn Lookup) -> Result<(), PatternError> {
        let parser = ParserFactory::new()
            .from_schema(&<Self::Arguments as Schema>::descriptor())
            .map_err(|source| PatternError::Arguments {
                pattern: Self::NAME.to_string(),
                source: source.into(),
            })?;
        self.run_with(&parser, lookup)
    }

    /// `run` with an already compiled argument parser.
    fn run_with(&mut self, parser: &SchemaParser, lookup: &dyn Lookup) -> Result<(), PatternError> {
        tracing::info!(pattern = Self::NAME, "running pattern with schema");
        let arguments_error = |source: BindError| PatternError::Arguments { pattern: Self::NAME.to_string(), source };
        let fields = parser.parse("", lookup).map_err(|e| arguments_error(e.into()))?;
        let arguments = <Self::Arguments as Schema>::from_fields(fields).map_err(|e| arguments_error(e.into()))?;
        self.apply(arguments)
            .map_err(|reason| PatternError::Apply { pattern: Self::NAME.to_string(), reason })
    }
}

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("[{pattern}] error during arguments parse: {source}")]
    Arguments {
        pattern: String,
        #[source]
        source: BindError,
    },

    #[error("[{pattern}] {reason:#}")]
    Apply { pattern: String, reason: anyhow::Error },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("pattern by name '{0}' not found")]
    UnknownPattern(String),

    #[error("pattern '{0}' is registered twice")]
    DuplicatePattern(String),

    #[error("pattern '{name}' has an invalid schema: {source}")]
    Config {
        name: String,
        #[source]
        source: ConfigError,
    },

    #[error("[{name}] error raised during parse: {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseFailure,
    },
}

/// One registered schema with its compiled parser and field metadata.
#[derive(Debug, Clone)]
pub struct RegisteredPattern {
    pub name: String,
    pub documentation: Option<String>,
    pub parser: SchemaParser,
    pub fields: Vec<SchemaField>,
}

/// Introspection document for one pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    pub plugin_name: String,
    pub docs: String,
    pub params: Vec<SchemaField>,
}

#[derive(Debug, Default, Clone)]
pub struct PatternRegistry {
    patterns: IndexMap<String, RegisteredPattern>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: Pattern>(self) -> Result<Self, RegistryError> {
        self.register_schema(P::NAME, <P::Arguments as Schema>::descriptor(), P::documentation())
    }

    pub fn register_schema(
        mut self,
        name: &str,
        descriptor: Descriptor,
        documentation: Option<&str>,
    ) -> Result<Self, RegistryError> {
        if self.patterns.contains_key(name) {
            return Err(RegistryError::DuplicatePattern(name.to_string()));
        }
        let config = |source| RegistryError::Config { name: name.to_string(), source };
        let parser = ParserFactory::new().from_schema(&descriptor).map_err(config)?;
        let fields = introspect(&descriptor).map_err(config)?;
        tracing::debug!(pattern = name, schema = %descriptor, "registered pattern");
        self.patterns.insert(name.to_string(), RegisteredPattern {
            name: name.to_string(),
            documentation: documentation.map(str::to_string),
            parser,
            fields,
        });
        Ok(self)
    }

    pub fn is_pattern(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Result<&RegisteredPattern, RegistryError> {
        self.patterns
            .get(name)
            .ok_or_else(|| RegistryError::UnknownPattern(name.to_string()))
    }

    pub fn info(&self, name: &str) -> Result<PatternInfo, RegistryError> {
        let pattern = self.get(name)?;
        Ok(PatternInfo {
            plugin_name: pattern.name.clone(),
            docs: pattern.documentation.clone().unwrap_or_default(),
            params: pattern.fields.clone(),
        })
    }

    /// Bind `name`'s arguments from the top level using its cached parser.
    pub fn bind(&self, name: &str, lookup: &dyn Lookup) -> Result<StructValue, RegistryError> {
        let pattern = self.get(name)?;
        pattern.parser.parse("", lookup).map_err(|source| RegistryError::Parse {
            name: name.to_string(),
            source,
        })
    }

    /// Run `pattern` with the parser compiled when `P` was registered.
    pub fn run<P: Pattern>(&self, pattern: &mut P, lookup: &dyn Lookup) -> Result<(), PatternError> {
        let registered = self.get(P::NAME)?;
        pattern.run_with(&registered.parser, lookup)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
