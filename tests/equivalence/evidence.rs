use std::fs;

use valparity::{CaseTable, CreateCase, StructuredError};

use super::csr_harness::{
    API_GROUP, CsrStrategy, DeclarativeValidator, Rule, api_versions, csr_protocol, path,
    protocol_for, tweak, valid_csr,
};

#[test]
fn suite_evidence_lists_every_case_and_failure() {
    let mut cases = CaseTable::new();
    cases.insert("valid".to_string(), CreateCase::new(valid_csr()));
    cases.insert(
        "repeated usage".to_string(),
        CreateCase::new(tweak(|csr| csr.spec.usages.push("digital signature".into())))
            .expecting(vec![StructuredError::duplicate(path("spec.usages[2]"), "digital signature")]),
    );

    let strategy = CsrStrategy::with_declarative(DeclarativeValidator::without(Rule::UsagesUnique));
    let mut suite = protocol_for(strategy, valparity::ProtocolOptions::default()).run_create_suite(
        "csr-gap",
        &cases,
        API_GROUP,
        &api_versions(),
    );
    assert_eq!(suite.case_count, 6);
    assert_eq!(suite.pass_count, 3);
    assert_eq!(suite.failed_cases().count(), 3);

    suite.absorb(csr_protocol().run_create_suite("csr", &cases, API_GROUP, &["v1".to_string()]));
    assert_eq!(suite.case_count, 8);
    assert_eq!(suite.pass_count, 5);

    let dir = tempfile::tempdir().unwrap();
    let written = suite.write_evidence(&dir.path().join("evidence"), "csr-gap").unwrap();
    assert_eq!(written.len(), 2);

    let text = fs::read_to_string(&written[0]).unwrap();
    assert!(text.starts_with("suite=csr-gap cases=8 passed=5 failed=3\n"), "{text}");
    assert!(text.contains("FAIL create repeated usage @ v1beta1"), "{text}");
    assert!(text.contains("PASS create valid @ v1alpha1"), "{text}");

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
    assert_eq!(json["case_count"], 8);
    let failed: Vec<&serde_json::Value> = json["cases"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["passed"] == false)
        .collect();
    assert_eq!(failed.len(), 3);
    assert!(failed[0]["failures"][0].as_str().unwrap().contains("spec.usages[2]"));
}
