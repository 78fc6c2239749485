use super::common::*;
use crate::workflows::rating::auth::{AuthGate, EvaluatorGate, SecretariatGate};

#[test]
fn resolve_grants_evaluator_access_outside_the_password_set() {
    let gate = AuthGate::new();
    let provider = StaticUserInfo {
        email: "b@x.com".to_string(),
    };

    let session = gate
        .resolve(&provider, "token-1", &runtime_config())
        .expect("token resolves");

    assert!(session.signed_in);
    assert!(session.evaluator_verified);
    assert!(!session.secretariat_verified);
}

#[test]
fn resolve_requires_a_password_for_configured_evaluators() {
    let gate = AuthGate::new();
    let provider = StaticUserInfo {
        email: "a@x.com".to_string(),
    };

    let session = gate
        .resolve(&provider, "token-1", &runtime_config())
        .expect("token resolves");

    assert!(session.signed_in);
    assert!(!session.evaluator_verified);
}

#[test]
fn resolve_rejects_an_empty_token() {
    let gate = AuthGate::new();
    let provider = StaticUserInfo {
        email: "a@x.com".to_string(),
    };

    gate.resolve(&provider, "", &runtime_config())
        .expect_err("empty token rejected");
}

#[test]
fn correct_evaluator_password_grants_access() {
    let mut gate = AuthGate::new();
    let config = runtime_config();
    let mut session = crate::workflows::rating::SessionIdentity::signed_in("a@x.com");

    let outcome = gate.verify_evaluator(&mut session, &config, "hunter2");

    assert_eq!(outcome, EvaluatorGate::Granted);
    assert!(session.evaluator_verified);
}

#[test]
fn three_wrong_evaluator_passwords_force_sign_out() {
    let mut gate = AuthGate::new();
    let config = runtime_config();
    let mut session = crate::workflows::rating::SessionIdentity::signed_in("a@x.com");

    assert_eq!(
        gate.verify_evaluator(&mut session, &config, "nope"),
        EvaluatorGate::Retry { remaining: 2 }
    );
    assert_eq!(
        gate.verify_evaluator(&mut session, &config, "nope"),
        EvaluatorGate::Retry { remaining: 1 }
    );
    assert_eq!(
        gate.verify_evaluator(&mut session, &config, "nope"),
        EvaluatorGate::SignedOut
    );
    assert!(!session.signed_in);
}

#[test]
fn a_fourth_correct_attempt_after_exhaustion_is_refused() {
    let mut gate = AuthGate::new();
    let config = runtime_config();
    let mut session = crate::workflows::rating::SessionIdentity::signed_in("a@x.com");

    for _ in 0..3 {
        gate.verify_evaluator(&mut session, &config, "nope");
    }
    // Even re-signing in does not clear the exhausted counter for the email.
    let mut retry_session = crate::workflows::rating::SessionIdentity::signed_in("a@x.com");

    assert_eq!(
        gate.verify_evaluator(&mut retry_session, &config, "hunter2"),
        EvaluatorGate::SignedOut
    );
    assert!(!retry_session.signed_in);
}

#[test]
fn secretariat_exhaustion_falls_back_without_signing_out() {
    let mut gate = AuthGate::new();
    let config = runtime_config();
    let mut session = crate::workflows::rating::SessionIdentity::signed_in("b@x.com");
    session.evaluator_verified = true;

    assert_eq!(
        gate.verify_secretariat(&mut session, &config, "wrong"),
        SecretariatGate::Retry { remaining: 2 }
    );
    assert_eq!(
        gate.verify_secretariat(&mut session, &config, "wrong"),
        SecretariatGate::Retry { remaining: 1 }
    );
    assert_eq!(
        gate.verify_secretariat(&mut session, &config, "wrong"),
        SecretariatGate::Fallback
    );
    assert!(session.signed_in);
    assert!(!session.secretariat_verified);

    // Sticky: the shared password no longer opens the gate for this user.
    assert_eq!(
        gate.verify_secretariat(&mut session, &config, "open-sesame"),
        SecretariatGate::Fallback
    );
}

#[test]
fn correct_shared_password_grants_secretariat_access() {
    let mut gate = AuthGate::new();
    let config = runtime_config();
    let mut session = crate::workflows::rating::SessionIdentity::signed_in("b@x.com");

    assert_eq!(
        gate.verify_secretariat(&mut session, &config, "open-sesame"),
        SecretariatGate::Granted
    );
    assert!(session.secretariat_verified);
}

#[test]
fn an_empty_configured_secretariat_password_never_grants() {
    let mut gate = AuthGate::new();
    let mut config = runtime_config();
    config.secretariat_password.clear();
    let mut session = crate::workflows::rating::SessionIdentity::signed_in("b@x.com");

    assert_eq!(
        gate.verify_secretariat(&mut session, &config, ""),
        SecretariatGate::Retry { remaining: 2 }
    );
    assert!(!session.secretariat_verified);
}
