use valparity::{
    CaseTable, ErrorKind, GateState, RequestInfo, StructuredError, UpdateCase, ValidationContext,
    ValidationStrategy,
};

use super::csr_harness::{
    API_GROUP, CertificateSigningRequest, CsrStrategy, api_versions, csr_protocol, path, tweak,
    valid_csr,
};

fn stored(resource_version: &str) -> CertificateSigningRequest {
    tweak(|csr| csr.metadata.resource_version = resource_version.into())
}

fn edited(
    resource_version: &str,
    mutate: impl FnOnce(&mut CertificateSigningRequest),
) -> CertificateSigningRequest {
    let mut csr = stored(resource_version);
    mutate(&mut csr);
    csr
}

fn update_cases() -> CaseTable<UpdateCase<CertificateSigningRequest>> {
    let mut cases = CaseTable::new();
    cases.insert(
        "no-op with stale resource version".into(),
        UpdateCase::new(stored("41"), stored("40")),
    );
    cases.insert(
        "usage added".into(),
        UpdateCase::new(stored("7"), edited("7", |csr| csr.spec.usages.push("server auth".into()))),
    );
    cases.insert(
        "request replaced".into(),
        UpdateCase::new(
            stored("7"),
            edited("7", |csr| csr.spec.request = "-----BEGIN NEW REQUEST-----".into()),
        )
        .expecting(vec![
            StructuredError::invalid(path("spec.request"), "<bytes>", "").with_origin("immutable"),
        ]),
    );
    cases.insert(
        "signer replaced".into(),
        UpdateCase::new(
            stored("7"),
            edited("8", |csr| csr.spec.signer_name = "example.com/other".into()),
        )
        .expecting(vec![
            StructuredError::invalid(path("spec.signerName"), "example.com/other", "")
                .with_origin("immutable"),
        ]),
    );
    cases.insert(
        "expiration shortened".into(),
        UpdateCase::new(stored("7"), edited("7", |csr| csr.spec.expiration_seconds = Some(300)))
            .expecting(vec![
                StructuredError::invalid(path("spec.expirationSeconds"), 300, "")
                    .with_origin("minimum"),
            ]),
    );
    cases
}

#[test]
fn every_update_case_is_equivalent_at_every_version() {
    let suite = csr_protocol().run_update_suite("csr-update", &update_cases(), API_GROUP, &api_versions());

    assert_eq!(suite.case_count, update_cases().len() * api_versions().len());
    assert!(suite.all_passed(), "{}", suite.render_text());
}

#[test]
fn validators_do_report_resource_version_conflicts_on_their_own() {
    let request = RequestInfo::new(API_GROUP, "v1");
    let strategy = CsrStrategy::new();
    let (old, update) = (stored("3"), stored("4"));

    for gates in [GateState::ALL_OFF, GateState::ALL_ON] {
        let ctx = ValidationContext::new(&request, gates);
        let errors = strategy.validate_update(&ctx, &update, &old);
        assert_eq!(errors.len(), 1, "{errors}");
        let conflict = &errors.as_slice()[0];
        assert_eq!(conflict.kind, ErrorKind::Invalid);
        assert_eq!(conflict.field, path("metadata.resourceVersion"));
    }
}

#[test]
fn differing_resource_versions_are_neutralized_by_the_protocol() {
    let request = RequestInfo::new(API_GROUP, "v1alpha1");
    let case = UpdateCase::new(stored("3"), stored("4"));

    csr_protocol()
        .run_update("no-op", &case, &request)
        .assert_passed();
    assert_eq!(case.update.metadata.resource_version, "4");
    assert_eq!(case.old, stored("3"));
    assert_ne!(case.old, valid_csr());
}
