//! Validation Service
//!
//! Entry point for callers: dispatches a partial record to the validators of
//! its kind, either as typed values or as a JSON request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::ValidationSettings,
    error::{ServiceError, ServiceResult},
    functional::validation_engine::{
        ValidationConfig, ValidationErrorMap, ValidationPipeline, ValidationPipelineResult,
    },
    models::{
        client::validators::validate_client, product::validators::validate_product,
        user::validators::validate_user, ExistingRecords, PartialRecord, RecordKind,
        ValidationMode,
    },
};

pub use crate::identification::is_valid_national_id;

/// A validation call as it arrives over JSON.
///
/// ```json
/// { "kind": "client", "mode": "create", "record": { "firstName": "Ana" }, "existing": [] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub kind: RecordKind,
    pub mode: ValidationMode,
    #[serde(default)]
    pub record: Value,
    #[serde(default)]
    pub existing: Vec<Value>,
}

/// Validate one record against the stored records of the same kind.
///
/// Field problems come back in the map; an `Err` means the call itself was
/// wrong (kinds disagree, or an update without an `id`).
pub fn validate_record(
    kind: RecordKind,
    mode: ValidationMode,
    record: &PartialRecord,
    existing: &ExistingRecords,
    settings: &ValidationSettings,
) -> ServiceResult<ValidationErrorMap> {
    check_kinds(kind, record, existing)?;

    let errors = match (record, existing) {
        (PartialRecord::Client(dto), ExistingRecords::Client(clients)) => {
            validate_client(dto, clients, mode, settings)
        }
        (PartialRecord::User(dto), ExistingRecords::User(users)) => {
            validate_user(dto, users, mode, settings)
        }
        (PartialRecord::Product(dto), ExistingRecords::Product(products)) => {
            validate_product(dto, products, mode)
        }
        _ => Err(kind_mismatch(kind, record, existing)),
    }?;

    log::debug!(
        "validated {} ({}): {} field errors",
        kind,
        mode,
        errors.len()
    );
    Ok(errors)
}

/// Decode a JSON request into typed records and validate it.
pub fn validate_request(
    request: &ValidationRequest,
    settings: &ValidationSettings,
) -> ServiceResult<ValidationErrorMap> {
    let (record, existing) = decode(request)?;
    validate_record(request.kind, request.mode, &record, &existing, settings)
}

/// JSON in, JSON out: the response is the flat `field → message` object.
pub fn validate_json(input: &str, settings: &ValidationSettings) -> ServiceResult<String> {
    let request: ValidationRequest = serde_json::from_str(input)?;
    let errors = validate_request(&request, settings)?;

    serde_json::to_string(&errors).map_err(|e| {
        ServiceError::internal_server_error(format!("Failed to encode validation errors: {}", e))
            .with_tag("json")
    })
}

/// Validate many records of one kind against the same snapshot.
///
/// Every record is checked for contract problems before any field rules run,
/// so a bad call fails as a whole. `settings.batch_max_errors` caps how many
/// invalid records are reported.
pub fn validate_batch(
    kind: RecordKind,
    mode: ValidationMode,
    records: Vec<PartialRecord>,
    existing: &ExistingRecords,
    settings: &ValidationSettings,
) -> ServiceResult<ValidationPipelineResult<PartialRecord>> {
    for record in &records {
        check_kinds(kind, record, existing)?;
        if mode == ValidationMode::Update && record_id(record).is_none() {
            return Err(
                ServiceError::invalid_argument("batch update requires every record id")
                    .with_tag(&kind.to_string()),
            );
        }
    }

    let config = ValidationConfig {
        fail_fast: false,
        max_errors: settings.batch_max_errors,
        parallel_validation: cfg!(feature = "functional"),
    };

    ValidationPipeline::new(records)
        .with_config(config)
        .try_validate(|record| validate_record(kind, mode, record, existing, settings))
}

fn check_kinds(
    kind: RecordKind,
    record: &PartialRecord,
    existing: &ExistingRecords,
) -> ServiceResult<()> {
    if record.kind() != kind || existing.kind() != kind {
        return Err(kind_mismatch(kind, record, existing));
    }
    Ok(())
}

fn kind_mismatch(
    kind: RecordKind,
    record: &PartialRecord,
    existing: &ExistingRecords,
) -> ServiceError {
    ServiceError::invalid_argument(format!(
        "expected {} records, got a {} record and {} existing records",
        kind,
        record.kind(),
        existing.kind()
    ))
    .with_tag(&kind.to_string())
}

fn record_id(record: &PartialRecord) -> Option<i64> {
    match record {
        PartialRecord::Client(dto) => dto.id,
        PartialRecord::User(dto) => dto.id,
        PartialRecord::Product(dto) => dto.id,
    }
}

fn decode(request: &ValidationRequest) -> ServiceResult<(PartialRecord, ExistingRecords)> {
    let record = match &request.record {
        Value::Object(_) => request.record.clone(),
        Value::Null => Value::Object(Default::default()),
        _ => {
            return Err(ServiceError::bad_request("record must be a JSON object")
                .with_tag(&request.kind.to_string()))
        }
    };
    let existing = Value::Array(request.existing.clone());

    Ok(match request.kind {
        RecordKind::Client => (
            PartialRecord::Client(serde_json::from_value(record)?),
            ExistingRecords::Client(serde_json::from_value(existing)?),
        ),
        RecordKind::User => (
            PartialRecord::User(serde_json::from_value(record)?),
            ExistingRecords::User(serde_json::from_value(existing)?),
        ),
        RecordKind::Product => (
            PartialRecord::Product(serde_json::from_value(record)?),
            ExistingRecords::Product(serde_json::from_value(existing)?),
        ),
    })
}
