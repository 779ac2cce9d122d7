use std::io::{self, Read};
use std::process::ExitCode;

use billing::{
    config::ValidationSettings, error::ServiceError, services::validation_service::validate_json,
    utils::logger::init_logging,
};

fn main() -> ExitCode {
    let (settings, warnings) = ValidationSettings::from_env();
    if let Err(e) = init_logging(settings.log_format, &settings.log_filter) {
        eprintln!("failed to initialise logging: {}", e);
    }
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        log::error!("failed to read request from stdin: {}", e);
        return ExitCode::from(74);
    }

    match validate_json(&input, &settings) {
        Ok(errors) => {
            println!("{}", errors);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn exit_code(error: &ServiceError) -> u8 {
    match error {
        ServiceError::BadRequest { .. } => 65,
        ServiceError::InvalidArgument { .. } => 64,
        ServiceError::InternalServerError { .. } => 70,
    }
}
