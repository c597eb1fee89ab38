//! End-to-end tests of the login guard over the in-memory backend.

use std::sync::Arc;

use chrono::Duration;
use lockgate::{
    Error, GuardConfig, LoginAttemptGuard, LoginOutcome, PasswordService,
    error::AuthError,
    repositories::AttemptCounterRepository,
    storage::memory::{
        MemoryAttemptCounterRepository, MemoryPasswordRepository, MemoryUserRepository,
    },
};

type MemoryGuard = LoginAttemptGuard<
    MemoryUserRepository,
    MemoryPasswordRepository,
    MemoryAttemptCounterRepository,
>;

struct TestApp {
    guard: MemoryGuard,
    signup: PasswordService<MemoryUserRepository, MemoryPasswordRepository>,
    attempts: Arc<MemoryAttemptCounterRepository>,
}

fn test_app(config: GuardConfig) -> TestApp {
    let users = Arc::new(MemoryUserRepository::new());
    let passwords = Arc::new(MemoryPasswordRepository::new());
    let attempts = Arc::new(MemoryAttemptCounterRepository::new());

    TestApp {
        guard: LoginAttemptGuard::new(
            users.clone(),
            passwords.clone(),
            attempts.clone(),
            config,
        ),
        signup: PasswordService::new(users, passwords),
        attempts,
    }
}

#[tokio::test]
async fn test_lockout_sequence_matches_contract() {
    let app = test_app(GuardConfig::default());
    app.signup
        .register_user("a@b.com", "original1pass", None)
        .await
        .unwrap();

    // 1st and 2nd failures count down
    let first = app.guard.attempt_login("a@b.com", "wrong1").await.unwrap();
    assert!(matches!(
        first,
        LoginOutcome::Denied {
            attempts_remaining: 2
        }
    ));

    let second = app.guard.attempt_login("a@b.com", "wrong2").await.unwrap();
    assert!(matches!(
        second,
        LoginOutcome::Denied {
            attempts_remaining: 1
        }
    ));

    // 3rd failure rotates the credential
    let third = app.guard.attempt_login("a@b.com", "wrong3").await.unwrap();
    let new_password = match third {
        LoginOutcome::PasswordReset { new_password } => new_password,
        other => panic!("expected PasswordReset, got {other:?}"),
    };

    // 4th attempt with the old password is a generic denial
    let old = app
        .guard
        .attempt_login("a@b.com", "original1pass")
        .await
        .unwrap();
    assert!(matches!(old, LoginOutcome::Denied { .. }));

    // The generated password works
    let fresh = app.guard.attempt_login("a@b.com", &new_password).await.unwrap();
    assert!(fresh.is_success());
}

#[tokio::test]
async fn test_success_restarts_counting_from_one() {
    let app = test_app(GuardConfig::default());
    app.signup
        .register_user("a@b.com", "original1pass", None)
        .await
        .unwrap();

    app.guard.attempt_login("a@b.com", "wrong1").await.unwrap();
    app.guard.attempt_login("a@b.com", "wrong2").await.unwrap();

    let success = app
        .guard
        .attempt_login("a@b.com", "original1pass")
        .await
        .unwrap();
    assert!(success.is_success());
    assert_eq!(app.attempts.get("a@b.com").await.unwrap(), None);

    let next = app.guard.attempt_login("a@b.com", "wrong3").await.unwrap();
    assert!(matches!(
        next,
        LoginOutcome::Denied {
            attempts_remaining: 2
        }
    ));
}

#[tokio::test]
async fn test_window_expiry_forgets_failures() {
    let app = test_app(GuardConfig {
        max_failed_attempts: 3,
        attempt_window: Duration::milliseconds(30),
    });
    app.signup
        .register_user("a@b.com", "original1pass", None)
        .await
        .unwrap();

    app.guard.attempt_login("a@b.com", "wrong1").await.unwrap();
    app.guard.attempt_login("a@b.com", "wrong2").await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(60)).await;

    // The lapsed counter reads as absent and the next failure counts from 1
    assert_eq!(app.attempts.get("a@b.com").await.unwrap(), None);
    let outcome = app.guard.attempt_login("a@b.com", "wrong3").await.unwrap();
    assert!(matches!(
        outcome,
        LoginOutcome::Denied {
            attempts_remaining: 2
        }
    ));
}

#[tokio::test]
async fn test_identities_are_counted_separately() {
    let app = test_app(GuardConfig::default());
    app.signup
        .register_user("one@b.com", "password1one", None)
        .await
        .unwrap();
    app.signup
        .register_user("two@b.com", "password1two", None)
        .await
        .unwrap();

    app.guard.attempt_login("one@b.com", "wrong1").await.unwrap();
    app.guard.attempt_login("one@b.com", "wrong2").await.unwrap();

    // The other identity is unaffected
    let outcome = app.guard.attempt_login("two@b.com", "wrong1").await.unwrap();
    assert!(matches!(
        outcome,
        LoginOutcome::Denied {
            attempts_remaining: 2
        }
    ));
    assert_eq!(app.attempts.get("one@b.com").await.unwrap(), Some(2));
    assert_eq!(app.attempts.get("two@b.com").await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_unknown_identifier_is_not_counted() {
    let app = test_app(GuardConfig::default());

    for _ in 0..5 {
        let outcome = app
            .guard
            .attempt_login("ghost@b.com", "whatever1")
            .await
            .unwrap();
        assert!(matches!(outcome, LoginOutcome::UnknownIdentifier));
    }
    assert_eq!(app.attempts.get("ghost@b.com").await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_are_all_counted() {
    let app = test_app(GuardConfig {
        // High threshold so no racer triggers a reset mid-test
        max_failed_attempts: 100,
        attempt_window: Duration::seconds(3600),
    });
    app.signup
        .register_user("a@b.com", "original1pass", None)
        .await
        .unwrap();

    let guard = Arc::new(app.guard);
    let mut handles = Vec::new();
    for i in 0..8 {
        let guard = guard.clone();
        handles.push(tokio::spawn(async move {
            guard
                .attempt_login("a@b.com", &format!("wrong{i}"))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Denied { .. }));
    }

    // Exactly 8 counted failures, no lost updates
    assert_eq!(app.attempts.get("a@b.com").await.unwrap(), Some(8));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_threshold_race_settles_on_one_credential() {
    let app = test_app(GuardConfig::default());
    app.signup
        .register_user("a@b.com", "original1pass", None)
        .await
        .unwrap();

    // Two counted failures, then race the third
    app.guard.attempt_login("a@b.com", "wrong1").await.unwrap();
    app.guard.attempt_login("a@b.com", "wrong2").await.unwrap();

    let guard = Arc::new(app.guard);
    let mut handles = Vec::new();
    for i in 0..4 {
        let guard = guard.clone();
        handles.push(tokio::spawn(async move {
            guard
                .attempt_login("a@b.com", &format!("race{i}"))
                .await
                .unwrap()
        }));
    }

    let mut reset_passwords = Vec::new();
    for handle in handles {
        if let LoginOutcome::PasswordReset { new_password } = handle.await.unwrap() {
            reset_passwords.push(new_password);
        }
    }
    assert!(!reset_passwords.is_empty());

    // The counter was deleted by at least one racer
    assert_eq!(app.attempts.get("a@b.com").await.unwrap(), None);

    // Exactly one of the generated credentials is observably final. Losing
    // candidates are counted failures, so clear between probes to keep the
    // probing itself from triggering another reset.
    let mut winners = 0;
    for candidate in &reset_passwords {
        if guard
            .attempt_login("a@b.com", candidate)
            .await
            .unwrap()
            .is_success()
        {
            winners += 1;
        }
        app.attempts.clear("a@b.com").await.unwrap();
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_signup_duplicate_email_is_distinguishable() {
    let app = test_app(GuardConfig::default());
    app.signup
        .register_user("a@b.com", "original1pass", None)
        .await
        .unwrap();

    let result = app
        .signup
        .register_user("a@b.com", "different2pass", None)
        .await;
    assert!(matches!(
        result.unwrap_err(),
        Error::Auth(AuthError::UserAlreadyExists)
    ));

    // The original credential still works
    let outcome = app
        .guard
        .attempt_login("a@b.com", "original1pass")
        .await
        .unwrap();
    assert!(outcome.is_success());
}
