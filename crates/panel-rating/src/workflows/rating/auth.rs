use std::collections::HashMap;

use serde::Serialize;

use crate::config::RuntimeConfig;

use super::domain::SessionIdentity;

/// Roles whose password gates are tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Evaluator,
    Secretariat,
}

/// Lookup of the signed-in user's identity from an externally-issued access
/// token. The OAuth redirect itself happens outside this crate.
pub trait UserInfoProvider: Send + Sync {
    fn email_for_token(&self, access_token: &str) -> Result<String, AuthError>;
}

/// One-shot token refresh used by the data gateway's retry policy.
pub trait TokenRefresher: Send + Sync {
    fn refresh(&self) -> Result<String, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("access token rejected by identity provider")]
    InvalidToken,
    #[error("identity provider unavailable: {0}")]
    Provider(String),
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
}

pub const MAX_PASSWORD_ATTEMPTS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Remaining(u8),
    Exhausted,
}

/// Password attempt counters keyed by role and identity, with an explicit
/// exhausted state. Exhaustion is sticky: a later correct password for the
/// same key is still refused.
#[derive(Debug, Default)]
pub struct AttemptTracker {
    failures: HashMap<(Role, String), u8>,
}

impl AttemptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, role: Role, identity: &str) -> AttemptStatus {
        let used = self
            .failures
            .get(&(role, identity.to_string()))
            .copied()
            .unwrap_or(0);
        if used >= MAX_PASSWORD_ATTEMPTS {
            AttemptStatus::Exhausted
        } else {
            AttemptStatus::Remaining(MAX_PASSWORD_ATTEMPTS - used)
        }
    }

    pub fn record_failure(&mut self, role: Role, identity: &str) -> AttemptStatus {
        let used = self
            .failures
            .entry((role, identity.to_string()))
            .or_insert(0);
        *used = used.saturating_add(1);
        if *used >= MAX_PASSWORD_ATTEMPTS {
            AttemptStatus::Exhausted
        } else {
            AttemptStatus::Remaining(MAX_PASSWORD_ATTEMPTS - *used)
        }
    }

    pub fn reset(&mut self, role: Role, identity: &str) {
        self.failures.remove(&(role, identity.to_string()));
    }
}

/// Outcome of one evaluator password attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorGate {
    Granted,
    Retry { remaining: u8 },
    SignedOut,
}

/// Outcome of one secretariat password attempt. Exhaustion falls back to
/// the evaluator view instead of signing the user out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretariatGate {
    Granted,
    Retry { remaining: u8 },
    Fallback,
}

/// Gate combining identity resolution with the two password checks.
#[derive(Debug, Default)]
pub struct AuthGate {
    attempts: AttemptTracker,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the token to a signed-in identity. Users outside the
    /// configured evaluator set need no password and are verified at once.
    pub fn resolve(
        &self,
        provider: &dyn UserInfoProvider,
        access_token: &str,
        config: &RuntimeConfig,
    ) -> Result<SessionIdentity, AuthError> {
        let email = provider.email_for_token(access_token)?;
        let mut session = SessionIdentity::signed_in(email);
        if !config.requires_evaluator_password(&session.email) {
            session.evaluator_verified = true;
        }
        Ok(session)
    }

    pub fn verify_evaluator(
        &mut self,
        session: &mut SessionIdentity,
        config: &RuntimeConfig,
        attempt: &str,
    ) -> EvaluatorGate {
        if !session.signed_in {
            return EvaluatorGate::SignedOut;
        }
        if matches!(
            self.attempts.status(Role::Evaluator, &session.email),
            AttemptStatus::Exhausted
        ) {
            session.sign_out();
            return EvaluatorGate::SignedOut;
        }

        let expected = config.evaluator_passwords.get(&session.email);
        match expected {
            Some(password) if password == attempt => {
                session.evaluator_verified = true;
                self.attempts.reset(Role::Evaluator, &session.email);
                EvaluatorGate::Granted
            }
            None => {
                session.evaluator_verified = true;
                EvaluatorGate::Granted
            }
            Some(_) => match self.attempts.record_failure(Role::Evaluator, &session.email) {
                AttemptStatus::Remaining(remaining) => EvaluatorGate::Retry { remaining },
                AttemptStatus::Exhausted => {
                    session.sign_out();
                    EvaluatorGate::SignedOut
                }
            },
        }
    }

    pub fn verify_secretariat(
        &mut self,
        session: &mut SessionIdentity,
        config: &RuntimeConfig,
        attempt: &str,
    ) -> SecretariatGate {
        if !session.signed_in {
            return SecretariatGate::Fallback;
        }
        if matches!(
            self.attempts.status(Role::Secretariat, &session.email),
            AttemptStatus::Exhausted
        ) {
            return SecretariatGate::Fallback;
        }

        if !config.secretariat_password.is_empty() && config.secretariat_password == attempt {
            session.secretariat_verified = true;
            self.attempts.reset(Role::Secretariat, &session.email);
            return SecretariatGate::Granted;
        }

        match self.attempts.record_failure(Role::Secretariat, &session.email) {
            AttemptStatus::Remaining(remaining) => SecretariatGate::Retry { remaining },
            AttemptStatus::Exhausted => SecretariatGate::Fallback,
        }
    }
}
