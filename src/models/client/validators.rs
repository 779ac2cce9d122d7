use crate::{
    config::ValidationSettings,
    error::{ServiceError, ServiceResult},
    functional::{
        validation_engine::{ValidationEngine, ValidationErrorMap},
        validation_rules::{
            DigitsOnly, Email, ExactLength, Length, NationalId, PersonName, Required, Unique,
        },
    },
    identification::NATIONAL_ID_LENGTH,
    models::{
        client::{Client, ClientDTO},
        others, ValidationMode,
    },
};

pub const NAME_MAX_LENGTH: usize = 50;
pub const PHONE_MIN_LENGTH: usize = 7;
pub const PHONE_MAX_LENGTH: usize = 10;
pub const ADDRESS_MAX_LENGTH: usize = 100;

/// Validate a client about to be created against every stored client.
pub fn validate_new_client(dto: &ClientDTO, existing: &[Client]) -> ValidationErrorMap {
    client_errors(dto, existing, None, true)
}

/// Validate an edited client.
///
/// The record must carry its `id`; the stored copy with that id is left out
/// of the duplicate check. With `revalidate_id_on_update` off the
/// identification number is not checked at all.
pub fn validate_client_update(
    dto: &ClientDTO,
    existing: &[Client],
    settings: &ValidationSettings,
) -> ServiceResult<ValidationErrorMap> {
    let own_id = dto.id.ok_or_else(|| {
        ServiceError::invalid_argument("client update requires the record id").with_tag("client")
    })?;

    Ok(client_errors(
        dto,
        existing,
        Some(own_id),
        settings.revalidate_id_on_update,
    ))
}

pub fn validate_client(
    dto: &ClientDTO,
    existing: &[Client],
    mode: ValidationMode,
    settings: &ValidationSettings,
) -> ServiceResult<ValidationErrorMap> {
    match mode {
        ValidationMode::Create => Ok(validate_new_client(dto, existing)),
        ValidationMode::Update => validate_client_update(dto, existing, settings),
    }
}

fn client_errors(
    dto: &ClientDTO,
    existing: &[Client],
    own_id: Option<i64>,
    check_identification: bool,
) -> ValidationErrorMap {
    let mut engine = ValidationEngine::new();

    if check_identification {
        let taken = Unique::exact(
            others(existing, own_id).map(|client| client.identification_number.as_str()),
        );
        engine.field(
            "identificationNumber",
            dto.identification_number.as_str(),
            &[
                &Required,
                &ExactLength(NATIONAL_ID_LENGTH),
                &DigitsOnly,
                &NationalId,
                &taken,
            ],
        );
    }

    engine
        .field(
            "firstName",
            dto.first_name.as_str(),
            &[&Required, &Length::max(NAME_MAX_LENGTH), &PersonName],
        )
        .field(
            "lastName",
            dto.last_name.as_str(),
            &[&Required, &Length::max(NAME_MAX_LENGTH), &PersonName],
        )
        .field(
            "phone",
            dto.phone.as_str(),
            &[
                &Required,
                &Length::between(PHONE_MIN_LENGTH, PHONE_MAX_LENGTH),
                &DigitsOnly,
            ],
        )
        .field("email", dto.email.as_str(), &[&Required, &Email])
        .field(
            "address",
            dto.address.as_str(),
            &[&Required, &Length::max(ADDRESS_MAX_LENGTH)],
        );

    engine.finish()
}
