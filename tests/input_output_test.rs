use moviegraph::graph::{JsonLinesSink, Mutation, MutationSink, Table};
use moviegraph::{read_records, ImportConfig, ImportPipeline, RecordType, SkipReason};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};

#[test]
fn test_tagged_file_to_json_lines() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    writeln!(input, "movie\t{{\"id\":100,\"title\":\"X\",\"credits\":{{\"cast\":[{{\"id\":7,\"name\":\"A\"}}]}}}}").unwrap();
    writeln!(input).unwrap();
    writeln!(input, "company\t{{\"id\":9,\"name\":\"Co\"}}").unwrap();
    writeln!(input, "untagged line").unwrap();
    writeln!(input, "person\t{{\"id\":7}}").unwrap();
    input.flush().unwrap();

    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(config_file, "table_prefix: tmdb").unwrap();
    writeln!(config_file, "provenance_key: nightly").unwrap();
    writeln!(config_file, "workers: 2").unwrap();
    config_file.flush().unwrap();
    let config = ImportConfig::from_file(config_file.path()).unwrap();

    let batch = read_records(BufReader::new(File::open(input.path()).unwrap()), None).unwrap();
    assert_eq!(batch.records.len(), 3);
    assert_eq!(batch.rejected.len(), 1);
    assert_eq!(batch.records[1].record_type, RecordType::ProductionCompany);

    let pipeline = ImportPipeline::new(&config);
    let output = tempfile::NamedTempFile::new().unwrap();
    let mut sink = JsonLinesSink::new(output.reopen().unwrap());
    let report = pipeline.run(batch.records, &mut sink).unwrap();
    let written = sink.written();

    assert_eq!(report.movies_processed, 1);
    assert_eq!(report.production_companies_processed, 1);
    // person without a name
    assert_eq!(report.skipped(SkipReason::MissingRequiredField), 1);
    assert_eq!(report.mutations, written);

    let mutations: Vec<Mutation> = BufReader::new(File::open(output.path()).unwrap())
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();
    assert_eq!(mutations.len() as u64, written);
    assert!(mutations.iter().all(|m| m.table.starts_with("tmdb_")));
    assert!(mutations
        .iter()
        .any(|m| m.kind() == Table::Edges && m.row == "MOVIEDB_STARRED_IN_7_100" && m.table == "tmdb_e"));
    assert!(mutations
        .iter()
        .any(|m| m.kind() == Table::Data && m.row == "MOVIEDB_MOVIE_100" && m.table == "tmdb_d"));
}

#[test]
fn test_untyped_input_with_explicit_type() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    writeln!(input, "{{\"id\":1,\"name\":\"A\"}}").unwrap();
    writeln!(input, "{{\"id\":2,\"name\":\"B\",\"birthday\":\"sometime\"}}").unwrap();
    input.flush().unwrap();

    let batch = read_records(
        BufReader::new(File::open(input.path()).unwrap()),
        Some(RecordType::Person),
    )
    .unwrap();
    let pipeline = ImportPipeline::new(&ImportConfig::default());
    let (report, mutations) = pipeline.run_parallel(&batch.records).unwrap();

    assert_eq!(report.persons_processed, 1);
    assert_eq!(report.skipped(SkipReason::UnparsableDate), 1);
    assert!(mutations.iter().all(|m| m.row == "MOVIEDB_PERSON_1"));

    let mut replay: Vec<Mutation> = Vec::new();
    replay.write_all(mutations.clone()).unwrap();
    assert_eq!(replay, mutations);
}
