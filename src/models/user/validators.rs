use crate::{
    config::ValidationSettings,
    error::{ServiceError, ServiceResult},
    functional::{
        validation_engine::{ValidationEngine, ValidationErrorMap},
        validation_rules::{
            when, DigitsOnly, Email, ExactLength, Length, Matches, NationalId, NotEmpty,
            PasswordPolicy, Required, Unique,
        },
    },
    identification::NATIONAL_ID_LENGTH,
    models::{
        others,
        user::{User, UserDTO},
        ValidationMode,
    },
};

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 50;
pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 100;
pub const EMAIL_MAX_LENGTH: usize = 255;

pub fn validate_new_user(dto: &UserDTO, existing: &[User]) -> ValidationErrorMap {
    user_errors(dto, existing, None, true)
}

/// Validate an edited user.
///
/// A blank password keeps the stored one, so the policy only applies when a
/// new password was typed.
pub fn validate_user_update(
    dto: &UserDTO,
    existing: &[User],
    settings: &ValidationSettings,
) -> ServiceResult<ValidationErrorMap> {
    let own_id = dto.id.ok_or_else(|| {
        ServiceError::invalid_argument("user update requires the record id").with_tag("user")
    })?;

    Ok(user_errors(
        dto,
        existing,
        Some(own_id),
        settings.revalidate_id_on_update,
    ))
}

pub fn validate_user(
    dto: &UserDTO,
    existing: &[User],
    mode: ValidationMode,
    settings: &ValidationSettings,
) -> ServiceResult<ValidationErrorMap> {
    match mode {
        ValidationMode::Create => Ok(validate_new_user(dto, existing)),
        ValidationMode::Update => validate_user_update(dto, existing, settings),
    }
}

fn user_errors(
    dto: &UserDTO,
    existing: &[User],
    own_id: Option<i64>,
    check_identification: bool,
) -> ValidationErrorMap {
    let mut engine = ValidationEngine::new();
    let peers = others(existing, own_id);

    if check_identification {
        let taken = Unique::exact(peers.clone().map(|user| user.identification_number.as_str()));
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

    let user_names = Unique::case_insensitive(peers.clone().map(|user| user.user_name.as_str()));
    let emails = Unique::case_insensitive(peers.map(|user| user.email.as_str()));

    engine
        .field(
            "userName",
            dto.user_name.as_str(),
            &[
                &Required,
                &Length::between(USER_NAME_MIN_LENGTH, USER_NAME_MAX_LENGTH),
                &user_names,
            ],
        )
        .field(
            "name",
            dto.name.as_str(),
            &[
                &Required,
                &Length::between(NAME_MIN_LENGTH, NAME_MAX_LENGTH),
            ],
        )
        .field(
            "email",
            dto.email.as_str(),
            &[
                &Required,
                &Length::max(EMAIL_MAX_LENGTH),
                &Email,
                &emails,
            ],
        );

    if own_id.is_none() {
        engine.field("password", dto.password.as_str(), &[&Required, &PasswordPolicy]);
    } else {
        engine.field(
            "password",
            dto.password.as_str(),
            &[&when(|password: &str| !password.is_empty(), PasswordPolicy)],
        );
    }

    if !dto.password.is_empty() && !dto.confirm_password.is_empty() {
        engine.field(
            "confirmPassword",
            dto.confirm_password.as_str(),
            &[&Matches {
                other: &dto.password,
                other_field: "password",
            }],
        );
    }

    engine.field("roles", dto.roles.as_slice(), &[&NotEmpty]);

    engine.finish()
}
