use valparity::{ErrorList, ErrorMatcher, StructuredError, ValidationSource, dedupe};

use super::csr_harness::{CsrStrategy, DeclarativeValidator, ImperativeValidator, path, tweak};

fn required(field: &str) -> StructuredError {
    StructuredError::required(path(field), "")
}

#[test]
fn imperative_and_declarative_errors_match_despite_source_and_detail() {
    let csr = tweak(|csr| {
        csr.spec.signer_name = "bare".into();
        csr.spec.expiration_seconds = Some(30);
    });
    let imperative = ImperativeValidator.validate(&csr);
    let declarative = DeclarativeValidator::default().validate(&csr);

    assert!(imperative.iter().all(|e| e.source == ValidationSource::Imperative));
    assert!(declarative.iter().all(|e| e.source == ValidationSource::Declarative));
    assert_ne!(imperative, declarative);
    assert!(ErrorMatcher::structural().test(&imperative, &declarative).is_ok());
    assert!(
        ErrorMatcher::structural()
            .by_detail_exact()
            .test(&imperative, &declarative)
            .is_err()
    );
}

#[test]
fn equivalence_is_a_multiset_bijection() {
    let matcher = ErrorMatcher::structural();
    let one: ErrorList = vec![required("spec.request")].into();
    let two: ErrorList = vec![required("spec.request"), required("spec.request")].into();

    let report = matcher.compare(&one, &two);
    assert!(report.missing.is_empty());
    assert_eq!(report.unexpected.len(), 1);

    let report = matcher.compare(&two, &one);
    assert_eq!(report.missing.len(), 1);
    assert!(report.unexpected.is_empty());

    assert!(matcher.test(&two, &two).is_ok());
}

#[test]
fn order_does_not_matter() {
    let matcher = ErrorMatcher::structural();
    let forward: ErrorList = vec![required("spec.request"), required("spec.signerName")].into();
    let backward: ErrorList = forward.iter().rev().cloned().collect();
    assert!(matcher.test(&forward, &backward).is_ok());
}

#[test]
fn dedupe_is_idempotent_on_real_legacy_output() {
    let csr = tweak(|csr| {
        csr.spec.request.clear();
        csr.spec.usages = vec!["signing".into(), "signing".into(), "signing".into()];
    });
    let legacy = ImperativeValidator.validate(&csr);
    let matcher = ErrorMatcher::structural();

    let once = dedupe(&legacy, &matcher);
    let twice = dedupe(&once, &matcher);
    assert_eq!(once, twice);
    // Both usage duplicates sit at distinct indices and survive.
    assert_eq!(once.len(), 3);
    assert_eq!(legacy.len(), 4);
}

#[test]
fn collapsed_legacy_output_matches_authoritative_output() {
    let csr = tweak(|csr| csr.spec.request.clear());
    let matcher = ErrorMatcher::structural();
    let strategy = CsrStrategy::new();

    let legacy = strategy.imperative.validate(&csr);
    let authoritative = strategy.declarative.validate(&csr);
    assert!(matcher.test(&legacy, &authoritative).is_err());
    assert!(matcher.test(&dedupe(&legacy, &matcher), &authoritative).is_ok());
}
