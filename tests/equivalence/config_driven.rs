use std::fs;

use valparity::{CaseTable, CreateCase, GateMatrix, HarnessConfig, StructuredError};

use super::csr_harness::{CsrStrategy, path, protocol_for, tweak, valid_csr};

#[test]
fn config_file_selects_versions_matrix_and_evidence_dir() {
    let dir = tempfile::tempdir().unwrap();
    let evidence = dir.path().join("evidence");
    let config_path = dir.path().join("valparity.toml");
    fs::write(
        &config_path,
        format!(
            r#"
api_versions = ["v1", "v1beta1"]
matrix = "three-point"

[report]
dir = "{}"
slug = "csr"
"#,
            evidence.display()
        ),
    )
    .unwrap();

    let config = HarnessConfig::load_or_default(Some(&config_path)).unwrap();
    assert_eq!(config.matrix, GateMatrix::ThreePoint);

    let mut cases = CaseTable::new();
    cases.insert("valid".to_string(), CreateCase::new(valid_csr()));
    cases.insert(
        "missing signer".to_string(),
        CreateCase::new(tweak(|csr| csr.spec.signer_name.clear()))
            .expecting(vec![StructuredError::required(path("spec.signerName"), "")]),
    );

    let suite = protocol_for(CsrStrategy::new(), config.protocol_options()).run_create_suite(
        "csr-config",
        &cases,
        &config.api_group,
        &config.api_versions,
    );
    assert_eq!(suite.case_count, 4);
    assert!(suite.all_passed(), "{}", suite.render_text());

    let written = config.record_suite(&suite).unwrap();
    assert_eq!(written, vec![evidence.join("csr.txt"), evidence.join("csr.json")]);
    assert!(fs::read_to_string(&written[0]).unwrap().starts_with("suite=csr-config cases=4"));
}

#[test]
fn no_evidence_dir_means_nothing_is_written() {
    let config = HarnessConfig::default();
    let suite = valparity::SuiteReport::from_cases("empty", Vec::new());
    assert!(config.record_suite(&suite).unwrap().is_empty());
}
