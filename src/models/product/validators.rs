use rust_decimal::Decimal;

use crate::{
    error::{ServiceError, ServiceResult},
    functional::{
        validation_engine::{ValidationEngine, ValidationErrorMap},
        validation_rules::{Length, MaxScale, NonNegative, PositiveDecimal, Required, Unique},
    },
    models::{
        others,
        product::{Product, ProductDTO},
        ValidationMode,
    },
};

pub const NAME_MAX_LENGTH: usize = 100;
pub const PRICE_MAX_SCALE: u32 = 2;

pub fn validate_new_product(dto: &ProductDTO, existing: &[Product]) -> ValidationErrorMap {
    product_errors(dto, existing, None)
}

pub fn validate_product_update(
    dto: &ProductDTO,
    existing: &[Product],
) -> ServiceResult<ValidationErrorMap> {
    let own_id = dto.id.ok_or_else(|| {
        ServiceError::invalid_argument("product update requires the record id")
            .with_tag("product")
    })?;

    Ok(product_errors(dto, existing, Some(own_id)))
}

pub fn validate_product(
    dto: &ProductDTO,
    existing: &[Product],
    mode: ValidationMode,
) -> ServiceResult<ValidationErrorMap> {
    match mode {
        ValidationMode::Create => Ok(validate_new_product(dto, existing)),
        ValidationMode::Update => validate_product_update(dto, existing),
    }
}

fn product_errors(
    dto: &ProductDTO,
    existing: &[Product],
    own_id: Option<i64>,
) -> ValidationErrorMap {
    let codes = Unique::exact(others(existing, own_id).map(|product| product.code.as_str()));
    let mut engine = ValidationEngine::new();

    engine
        .field("code", dto.code.as_str(), &[&Required, &codes])
        .field(
            "name",
            dto.name.as_str(),
            &[&Required, &Length::max(NAME_MAX_LENGTH)],
        )
        .required::<Decimal>("price", &dto.price, &[&PositiveDecimal, &MaxScale(PRICE_MAX_SCALE)])
        .required::<i32>("stock", &dto.stock, &[&NonNegative]);

    engine.finish()
}
