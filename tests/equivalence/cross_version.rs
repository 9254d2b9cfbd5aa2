use valparity::{
    CreateCase, Failure, ProtocolOptions, RequestInfo, StructuredError, VersionEquivalenceChecker,
    versions::VersionDivergence,
};

use super::csr_harness::{API_GROUP, CsrStrategy, api_versions, csr_protocol, path, protocol_for, tweak};

fn version_skewed() -> CsrStrategy {
    CsrStrategy {
        beta_only_rule: true,
        ..CsrStrategy::new()
    }
}

fn legacy_signer() -> super::csr_harness::CertificateSigningRequest {
    tweak(|csr| csr.spec.signer_name = "kubernetes.io/legacy-unknown".into())
}

#[test]
fn version_specific_rule_is_caught_from_any_version() {
    let request = RequestInfo::new(API_GROUP, "v1");
    let report = protocol_for(version_skewed(), ProtocolOptions::default()).run_create(
        "legacy signer",
        &CreateCase::new(legacy_signer()),
        &request,
    );

    // Legacy and authoritative agree at v1; only the cross-version check fails.
    assert_eq!(report.failures.len(), 1, "{report}");
    match &report.failures[0] {
        Failure::Version(VersionDivergence::Mismatch {
            baseline,
            version,
            report,
        }) => {
            assert_eq!(baseline, "v1");
            assert_eq!(version, "v1beta1");
            assert_eq!(report.unexpected.len(), 1);
            assert_eq!(report.unexpected.as_slice()[0].field, path("spec.signerName"));
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn checker_verifies_updates_with_stamped_versions() {
    let checker = valparity::ContextVersionChecker::new(CsrStrategy::new(), API_GROUP, api_versions());
    let old = tweak(|csr| csr.metadata.resource_version = "10".into());
    let update = tweak(|csr| csr.metadata.resource_version = "11".into());

    assert_eq!(checker.verify(&update, Some(&old)), Ok(()));
}

#[test]
fn consistent_strategy_passes_across_versions() {
    let request = RequestInfo::new(API_GROUP, "v1beta1");
    let case = CreateCase::new(legacy_signer());
    csr_protocol().run_create("legacy signer", &case, &request).assert_passed();

    let bad_signer = CreateCase::new(tweak(|csr| csr.spec.signer_name = "nodomain/x".into())).expecting(vec![
        StructuredError::invalid(path("spec.signerName"), "nodomain/x", "")
            .with_origin("format=k8s-long-name"),
    ]);
    csr_protocol().run_create("bad signer", &bad_signer, &request).assert_passed();
}
