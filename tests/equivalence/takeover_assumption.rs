use valparity::{CreateCase, Failure, GateMatrix, ProtocolOptions, RequestInfo, StructuredError};

use super::csr_harness::{
    API_GROUP, CsrStrategy, api_versions, collapsing_options, path, protocol_for, tweak, valid_csr,
};

// The fixtures below list the doubly reported request error once.
fn three_point() -> ProtocolOptions {
    ProtocolOptions {
        matrix: GateMatrix::ThreePoint,
        ..collapsing_options()
    }
}

fn missing_request() -> CreateCase<super::csr_harness::CertificateSigningRequest> {
    CreateCase::new(tweak(|csr| csr.spec.request.clear()))
        .expecting(vec![StructuredError::required(path("spec.request"), "")])
}

fn leaky() -> CsrStrategy {
    CsrStrategy {
        leak_shadow_errors: true,
        ..CsrStrategy::new()
    }
}

#[test]
fn well_behaved_strategy_passes_the_three_point_matrix() {
    let mut cases = valparity::CaseTable::new();
    cases.insert("valid".to_string(), CreateCase::new(valid_csr()));
    cases.insert("missing request".to_string(), missing_request());

    let suite = protocol_for(CsrStrategy::new(), three_point()).run_create_suite(
        "csr-three-point",
        &cases,
        API_GROUP,
        &api_versions(),
    );
    assert!(suite.all_passed(), "{}", suite.render_text());
}

#[test]
fn shadow_errors_leaking_into_legacy_output_break_the_assumption() {
    let request = RequestInfo::new(API_GROUP, "v1");
    let report = protocol_for(leaky(), three_point()).run_create("missing request", &missing_request(), &request);

    let takeover = report
        .failures
        .iter()
        .find_map(|f| match f {
            Failure::TakeoverAssumption { report } => Some(report),
            _ => None,
        })
        .unwrap_or_else(|| panic!("takeover assumption violation expected:\n{report}"));
    assert!(takeover.missing.is_empty());
    assert_eq!(takeover.unexpected.len(), 1);
    assert_eq!(report.failures.len(), 1, "{report}");
}

#[test]
fn two_point_matrix_cannot_see_leaked_shadow_errors() {
    let request = RequestInfo::new(API_GROUP, "v1");
    protocol_for(leaky(), collapsing_options())
        .run_create("missing request", &missing_request(), &request)
        .assert_passed();
}
