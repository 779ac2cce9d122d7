//! Field Validation Engine
//!
//! Runs ordered rule chains per field and collects the outcome into a
//! [`ValidationErrorMap`]. Within one field the first failing rule wins;
//! across fields nothing short-circuits, so every defect in a record is
//! reported in a single pass. [`ValidationPipeline`] applies a record
//! validator to a whole batch, optionally on the rayon pool.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;

use itertools::Itertools;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::functional::validation_rules::{Required, ValidationError, ValidationRule};

/// Field name → error for one record.
///
/// An absent key means the field passed. The map is built fresh for every
/// validation call and serialises as a flat `{ "field": "message" }` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrorMap {
    errors: BTreeMap<String, ValidationError>,
}

impl ValidationErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no field has an error, i.e. the record may be submitted.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|error| error.message.as_str())
    }

    /// Stable error code for `field`, if it failed.
    pub fn code(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|error| error.code.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.values()
    }

    /// Records `error` unless its field already has one.
    pub fn insert(&mut self, error: ValidationError) {
        self.errors.entry(error.field.clone()).or_insert(error);
    }

    /// Adds every field of `other` that this map does not already report.
    pub fn merge(&mut self, other: ValidationErrorMap) {
        for (_, error) in other.errors {
            self.insert(error);
        }
    }

    /// Plain `field → message` view for callers that render messages inline.
    pub fn to_messages(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.clone(), error.message.clone()))
            .collect()
    }
}

impl Serialize for ValidationErrorMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, error) in &self.errors {
            map.serialize_entry(field, &error.message)?;
        }
        map.end()
    }
}

impl FromIterator<ValidationError> for ValidationErrorMap {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        let mut map = ValidationErrorMap::new();
        for error in iter {
            map.insert(error);
        }
        map
    }
}

/// Collects per-field rule outcomes for a single record.
///
/// # Examples
///
/// ```
/// # use billing::functional::validation_engine::ValidationEngine;
/// # use billing::functional::validation_rules::{Length, Required};
/// let mut engine = ValidationEngine::new();
/// engine
///     .field("firstName", "", &[&Required, &Length::max(50)])
///     .field("address", "Av. Amazonas", &[&Required, &Length::max(100)]);
/// let errors = engine.finish();
/// assert_eq!(errors.code("firstName"), Some("REQUIRED"));
/// assert!(!errors.contains("address"));
/// ```
#[derive(Debug, Default)]
pub struct ValidationEngine {
    errors: ValidationErrorMap,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `rules` in order to `value` and records the first failure.
    ///
    /// A field that already carries an error is left untouched, so a later
    /// chain for the same field (for instance a uniqueness check) only runs
    /// once the structural rules have passed.
    pub fn field<T: ?Sized>(
        &mut self,
        field_name: &str,
        value: &T,
        rules: &[&dyn ValidationRule<T>],
    ) -> &mut Self {
        if self.errors.contains(field_name) {
            return self;
        }

        if let Some(error) = rules
            .iter()
            .find_map(|rule| rule.validate(value, field_name).err())
        {
            self.errors.insert(error);
        }
        self
    }

    /// Like [`field`](Self::field) for values that may be absent: `None`
    /// yields a `REQUIRED` error, `Some` runs the rules on the inner value.
    pub fn required<T>(
        &mut self,
        field_name: &str,
        value: &Option<T>,
        rules: &[&dyn ValidationRule<T>],
    ) -> &mut Self {
        match value {
            Some(inner) => self.field(field_name, inner, rules),
            None => self.field(field_name, value, &[&Required]),
        }
    }

    pub fn finish(self) -> ValidationErrorMap {
        self.errors
    }
}

/// Batch validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Stop at the first invalid record
    pub fail_fast: bool,
    /// Maximum number of invalid records to collect before stopping
    pub max_errors: Option<usize>,
    /// Validate records on the rayon pool (requires the `functional` feature)
    pub parallel_validation: bool,
}

impl Default for ValidationConfig {
    /// Defaults: validate every record, no cap, sequential.
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_errors: None,
            parallel_validation: false,
        }
    }
}

impl ValidationConfig {
    fn invalid_limit(&self) -> Option<usize> {
        if self.fail_fast {
            Some(1)
        } else {
            self.max_errors
        }
    }
}

/// Applies one record validator to a batch of records
pub struct ValidationPipeline<T> {
    items: Vec<T>,
    config: ValidationConfig,
}

impl<T> ValidationPipeline<T>
where
    T: Send + Sync,
{
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the records and splits the batch into valid and invalid items.
    ///
    /// Once the invalid-record limit is reached the remaining records are not
    /// reported. Parallel and sequential runs return identical results.
    ///
    /// # Examples
    ///
    /// ```
    /// # use billing::functional::validation_engine::{ValidationEngine, ValidationPipeline};
    /// # use billing::functional::validation_rules::Email;
    /// let result = ValidationPipeline::new(vec!["a@b.ec".to_string(), "nope".to_string()])
    ///     .validate(|email: &String| {
    ///         let mut engine = ValidationEngine::new();
    ///         engine.field("email", email.as_str(), &[&Email]);
    ///         engine.finish()
    ///     });
    /// assert_eq!(result.valid_items.len(), 1);
    /// assert_eq!(result.total_errors, 1);
    /// ```
    pub fn validate<F>(self, validator: F) -> ValidationPipelineResult<T>
    where
        F: Fn(&T) -> ValidationErrorMap + Send + Sync,
    {
        match self.try_validate(|item| Ok::<_, Infallible>(validator(item))) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Like [`validate`](Self::validate) for validators that can reject the
    /// call itself. The first error, in item order, aborts the batch.
    ///
    /// On the rayon path every record is validated up front and the cutoff is
    /// applied afterwards; the sequential path stops at the cutoff.
    pub fn try_validate<F, E>(self, validator: F) -> Result<ValidationPipelineResult<T>, E>
    where
        F: Fn(&T) -> Result<ValidationErrorMap, E> + Send + Sync,
        E: Send,
    {
        let limit = self.config.invalid_limit();
        let mut precomputed = Self::precompute(&self.items, &validator, &self.config)
            .map(Vec::into_iter);

        let mut valid_items = Vec::new();
        let mut invalid_items = Vec::new();
        let mut total_errors = 0;

        for item in self.items {
            if limit.is_some_and(|max| invalid_items.len() >= max) {
                break;
            }

            let outcome = match precomputed.as_mut().and_then(Iterator::next) {
                Some(outcome) => outcome,
                None => validator(&item),
            };
            let errors = outcome?;

            if errors.is_valid() {
                valid_items.push(item);
            } else {
                total_errors += errors.len();
                invalid_items.push((item, errors));
            }
        }

        let total_processed = valid_items.len() + invalid_items.len();
        log::debug!(
            "validated {} records: {} valid, {} invalid, {} field errors",
            total_processed,
            valid_items.len(),
            invalid_items.len(),
            total_errors
        );

        Ok(ValidationPipelineResult {
            valid_items,
            invalid_items,
            total_processed,
            total_errors,
        })
    }

    #[cfg(feature = "functional")]
    fn precompute<F, E>(
        items: &[T],
        validator: &F,
        config: &ValidationConfig,
    ) -> Option<Vec<Result<ValidationErrorMap, E>>>
    where
        F: Fn(&T) -> Result<ValidationErrorMap, E> + Send + Sync,
        E: Send,
    {
        use rayon::prelude::*;

        if config.parallel_validation {
            Some(items.par_iter().map(validator).collect())
        } else {
            None
        }
    }

    #[cfg(not(feature = "functional"))]
    fn precompute<F, E>(
        _items: &[T],
        _validator: &F,
        _config: &ValidationConfig,
    ) -> Option<Vec<Result<ValidationErrorMap, E>>>
    where
        F: Fn(&T) -> Result<ValidationErrorMap, E> + Send + Sync,
        E: Send,
    {
        None
    }
}

/// Result of running a validation pipeline
#[derive(Debug, Clone)]
pub struct ValidationPipelineResult<T> {
    /// Items that passed all validations
    pub valid_items: Vec<T>,
    /// Items that failed validation with their error maps
    pub invalid_items: Vec<(T, ValidationErrorMap)>,
    /// Total number of items processed
    pub total_processed: usize,
    /// Total number of field errors across invalid items
    pub total_errors: usize,
}

impl<T> ValidationPipelineResult<T> {
    pub fn is_all_valid(&self) -> bool {
        self.invalid_items.is_empty()
    }

    /// Percentage of processed items that passed, `0.0` for an empty batch.
    pub fn success_rate(&self) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            (self.valid_items.len() as f64 / self.total_processed as f64) * 100.0
        }
    }

    pub fn all_errors(&self) -> Vec<&ValidationError> {
        self.invalid_items
            .iter()
            .flat_map(|(_, errors)| errors.errors())
            .collect()
    }

    /// Group collected validation errors by their error code.
    pub fn errors_by_code(&self) -> HashMap<String, Vec<&ValidationError>> {
        self.all_errors()
            .into_iter()
            .into_group_map_by(|error| error.code.clone())
    }
}
