//! # Validation Benchmarks
//!
//! Measures the hot paths of form validation:
//! - cédula checksum on valid and invalid input
//! - single-record validation against snapshots of growing size
//! - batch validation, sequential vs rayon

use billing::{
    config::ValidationSettings,
    functional::validation_engine::{ValidationConfig, ValidationPipeline},
    is_valid_national_id,
    models::{
        client::{validators::validate_new_client, Client, ClientDTO},
        ExistingRecords, PartialRecord, RecordKind, ValidationMode,
    },
    services::validation_service::validate_record,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn client_dto(i: usize) -> ClientDTO {
    ClientDTO {
        id: None,
        identification_number: if i % 2 == 0 {
            "1710034065".to_string()
        } else {
            "1710034064".to_string()
        },
        first_name: "Carmen".to_string(),
        last_name: "Ortiz".to_string(),
        phone: "0991234567".to_string(),
        email: format!("carmen{}@example.ec", i),
        address: "Loja".to_string(),
    }
}

fn stored_clients(size: usize) -> Vec<Client> {
    (0..size)
        .map(|i| Client {
            id: i as i64,
            identification_number: format!("{:010}", i),
            first_name: "Stored".to_string(),
            last_name: "Client".to_string(),
            phone: "022222222".to_string(),
            email: format!("stored{}@example.ec", i),
            address: "Quito".to_string(),
        })
        .collect()
}

pub fn benchmark_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("national_id_checksum");

    for id in ["1710034065", "1710034064", "2500000001", "17100340a5"] {
        group.bench_with_input(BenchmarkId::from_parameter(id), id, |b, id| {
            b.iter(|| black_box(is_valid_national_id(black_box(id))))
        });
    }

    group.finish();
}

pub fn benchmark_single_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("client_validation");
    let dto = client_dto(0);

    for size in [0, 100, 10_000] {
        let existing = stored_clients(size);
        group.bench_with_input(BenchmarkId::new("create", size), &existing, |b, existing| {
            b.iter(|| black_box(validate_new_client(&dto, existing)))
        });
    }

    group.finish();
}

pub fn benchmark_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_validation");
    let settings = ValidationSettings::default();
    let existing = ExistingRecords::Client(stored_clients(1_000));

    for size in [100, 1_000] {
        let records: Vec<PartialRecord> = (0..size)
            .map(|i| PartialRecord::Client(client_dto(i)))
            .collect();

        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, size), &records, |b, records| {
                b.iter(|| {
                    let result = ValidationPipeline::new(records.clone())
                        .with_config(ValidationConfig {
                            parallel_validation: parallel,
                            ..ValidationConfig::default()
                        })
                        .try_validate(|record| {
                            validate_record(
                                RecordKind::Client,
                                ValidationMode::Create,
                                record,
                                &existing,
                                &settings,
                            )
                        })
                        .map(|result| result.total_errors);
                    black_box(result)
                })
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_checksum,
    benchmark_single_record,
    benchmark_batch
);
criterion_main!(benches);
