//! Integration test.

use std::collections::HashSet;
use std::fs;

use failure::Error;

use weather_gen::{CityList, GenError, GeneratorConfig};


fn abc() -> CityList {
    CityList::from_names(vec!["A", "B", "C"]).unwrap()
}

fn generate(config: GeneratorConfig, cities: CityList) -> Vec<u8> {
    let (out, _) = weather_gen::generate(Vec::new(), config, cities).unwrap();
    out
}

#[test]
fn test_small_scenario_is_reproducible() {
    let config = GeneratorConfig::default()
        .with_seed(1)
        .with_lines(10)
        .with_workers(4);

    let out0 = generate(config.clone(), abc());
    let out1 = generate(config, abc());

    assert_eq!(out0, out1);

    let records = output_checker::parse_records(&out0);
    assert_eq!(records.len(), 10);
    assert!(records
        .iter()
        .all(|(city, _)| ["A", "B", "C"].contains(&city.as_str())));
}

#[test]
fn test_format_holds_for_any_worker_count() {
    for workers in 1..=10 {
        let config = GeneratorConfig::default()
            .with_seed(1)
            .with_lines(10)
            .with_workers(workers);

        let records = output_checker::parse_records(&generate(config, abc()));
        assert_eq!(records.len(), 10, "with {} workers", workers);
    }
}

#[test]
fn test_single_line() {
    let config = GeneratorConfig::default().with_lines(1).with_workers(4);

    let out = generate(config, abc());

    assert!(!out.contains(&b'\n'));
    assert_eq!(output_checker::parse_records(&out).len(), 1);
}

#[test]
fn test_large_run_with_embedded_cities() {
    let cities = CityList::embedded().unwrap();
    let names: HashSet<String> = cities.names().iter().cloned().collect();
    let config = GeneratorConfig::default()
        .with_lines(250_000)
        .with_chunk_size(4_096)
        .with_workers(6);

    let (out, summary) = weather_gen::generate(Vec::new(), config, cities).unwrap();
    let records = output_checker::parse_records(&out);

    assert_eq!(records.len(), 250_000);
    assert_eq!(summary.lines, 250_000);
    assert_eq!(summary.bytes, out.len() as u64);
    assert!(records.iter().all(|(city, _)| names.contains(city)));
}

#[test]
fn test_seed_changes_output() {
    let config = GeneratorConfig::default().with_lines(1_000).with_workers(2);

    let out0 = generate(config.clone().with_seed(1), abc());
    let out1 = generate(config.with_seed(2), abc());

    assert_ne!(out0, out1);
}

#[test]
fn test_generate_file() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("measurements.txt");
    let config = GeneratorConfig::default()
        .with_lines(20_000)
        .with_chunk_size(1_000)
        .with_workers(3);

    let summary = weather_gen::generate_file(&path, config.clone(), abc())?;
    let written = fs::read(&path)?;

    assert_eq!(summary.lines, 20_000);
    assert_eq!(written, generate(config, abc()));
    assert_eq!(output_checker::parse_records(&written).len(), 20_000);

    Ok(())
}

#[test]
fn test_missing_destination_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.txt");

    let err = weather_gen::generate_file(&path, GeneratorConfig::default().with_lines(10), abc())
        .unwrap_err();

    match err.downcast::<GenError>() {
        Ok(GenError::Destination { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("Unexpected error {:?}", other),
    }
}

#[test]
fn test_city_list_from_file() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cities.txt");
    fs::write(&path, "Oslo\nLima\n")?;

    let cities = CityList::from_file(&path)?;
    let out = generate(GeneratorConfig::default().with_lines(100), cities);

    assert!(output_checker::parse_records(&out)
        .iter()
        .all(|(city, _)| city == "Oslo" || city == "Lima"));

    Ok(())
}
