use astro_auth::domain::lockout::MAX_OTP_REQUESTS;
use astro_auth::domain::types::OTP_LEN;
use astro_auth::error::AuthServiceError;
use astro_auth::usecase::otp::{RequestOtpInput, RequestOtpUseCase};

use crate::helpers::{MockIdentityRepo, MockNotifier, MockOtpRepo, test_identity};

#[tokio::test]
async fn should_create_identity_and_code_on_first_sign_in() {
    let identities = MockIdentityRepo::empty();
    let codes = MockOtpRepo::empty();
    let notifier = MockNotifier::new();

    let identities_handle = identities.handle();
    let codes_handle = codes.handle();
    let sent_handle = notifier.handle();

    let uc = RequestOtpUseCase {
        identities,
        codes,
        notifier,
    };

    uc.execute(RequestOtpInput {
        email: Some("a@x.com".to_owned()),
        phone: None,
    })
    .await
    .unwrap();

    let identities = identities_handle.lock().unwrap();
    assert_eq!(identities.len(), 1, "first sign-in should register the identity");
    let created = &identities[0];
    assert_eq!(created.email.as_deref(), Some("a@x.com"));
    assert_eq!(created.otp_attempts, 1, "issuance should count one attempt");
    assert_eq!(created.failed_login_attempts, 0);
    assert!(!created.is_blocked);

    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes.len(), 1, "expected exactly one code row");
    let code = &codes[0];
    assert_eq!(code.identity_id, created.id);
    assert_eq!(code.code.len(), OTP_LEN);
    assert!(code.code.bytes().all(|b| b.is_ascii_digit()));
    assert!(code.expires_at > chrono::Utc::now());

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1, "code should be dispatched out of band");
    assert_eq!(sent[0].code, code.code);
    assert_eq!(sent[0].email.as_deref(), Some("a@x.com"));
}

#[tokio::test]
async fn should_increment_otp_attempts_for_existing_identity() {
    let mut existing = test_identity();
    existing.otp_attempts = 2;

    let identities = MockIdentityRepo::new(vec![existing.clone()]);
    let identities_handle = identities.handle();

    let uc = RequestOtpUseCase {
        identities,
        codes: MockOtpRepo::empty(),
        notifier: MockNotifier::new(),
    };

    uc.execute(RequestOtpInput {
        email: existing.email.clone(),
        phone: None,
    })
    .await
    .unwrap();

    let identities = identities_handle.lock().unwrap();
    assert_eq!(identities.len(), 1, "no duplicate identity should appear");
    assert_eq!(identities[0].otp_attempts, 3);
}

#[tokio::test]
async fn should_resolve_identity_by_phone() {
    let existing = test_identity();

    let identities = MockIdentityRepo::new(vec![existing.clone()]);
    let identities_handle = identities.handle();
    let notifier = MockNotifier::new();
    let sent_handle = notifier.handle();

    let uc = RequestOtpUseCase {
        identities,
        codes: MockOtpRepo::empty(),
        notifier,
    };

    uc.execute(RequestOtpInput {
        email: None,
        phone: existing.phone.clone(),
    })
    .await
    .unwrap();

    assert_eq!(identities_handle.lock().unwrap().len(), 1);
    // Delivery goes to the identity's stored channels.
    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent[0].email, existing.email);
    assert_eq!(sent[0].phone, existing.phone);
}

#[tokio::test]
async fn should_require_email_or_phone() {
    let uc = RequestOtpUseCase {
        identities: MockIdentityRepo::empty(),
        codes: MockOtpRepo::empty(),
        notifier: MockNotifier::new(),
    };

    let result = uc
        .execute(RequestOtpInput {
            email: None,
            phone: None,
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::MissingContact)),
        "expected MissingContact, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_blocked_identity() {
    let mut blocked = test_identity();
    blocked.is_blocked = true;

    let codes = MockOtpRepo::empty();
    let codes_handle = codes.handle();

    let uc = RequestOtpUseCase {
        identities: MockIdentityRepo::new(vec![blocked.clone()]),
        codes,
        notifier: MockNotifier::new(),
    };

    let result = uc
        .execute(RequestOtpInput {
            email: blocked.email.clone(),
            phone: None,
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::Blocked)),
        "expected Blocked, got {result:?}"
    );
    assert!(codes_handle.lock().unwrap().is_empty(), "no code should be issued");
}

#[tokio::test]
async fn should_rate_limit_and_block_at_issuance_threshold() {
    let mut exhausted = test_identity();
    exhausted.otp_attempts = MAX_OTP_REQUESTS;

    let identities = MockIdentityRepo::new(vec![exhausted.clone()]);
    let identities_handle = identities.handle();
    let codes = MockOtpRepo::empty();
    let codes_handle = codes.handle();
    let notifier = MockNotifier::new();
    let sent_handle = notifier.handle();

    let uc = RequestOtpUseCase {
        identities,
        codes,
        notifier,
    };

    let result = uc
        .execute(RequestOtpInput {
            email: exhausted.email.clone(),
            phone: None,
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::RateLimited)),
        "expected RateLimited, got {result:?}"
    );
    assert!(
        identities_handle.lock().unwrap()[0].is_blocked,
        "crossing the issuance threshold should block the identity"
    );
    assert!(codes_handle.lock().unwrap().is_empty());
    assert!(sent_handle.lock().unwrap().is_empty());

    // Once blocked, further sign-ins fail with Blocked rather than RateLimited.
    let again = uc
        .execute(RequestOtpInput {
            email: exhausted.email.clone(),
            phone: None,
        })
        .await;
    assert!(
        matches!(again, Err(AuthServiceError::Blocked)),
        "expected Blocked, got {again:?}"
    );
}

#[tokio::test]
async fn should_keep_code_row_when_dispatch_fails() {
    let existing = test_identity();

    let identities = MockIdentityRepo::new(vec![existing.clone()]);
    let identities_handle = identities.handle();
    let codes = MockOtpRepo::empty();
    let codes_handle = codes.handle();

    let uc = RequestOtpUseCase {
        identities,
        codes,
        notifier: MockNotifier::failing(),
    };

    let result = uc
        .execute(RequestOtpInput {
            email: existing.email.clone(),
            phone: None,
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::NotificationFailed(_))),
        "expected NotificationFailed, got {result:?}"
    );
    // The row and the counter bump both survive the dispatch failure.
    assert_eq!(codes_handle.lock().unwrap().len(), 1);
    assert_eq!(identities_handle.lock().unwrap()[0].otp_attempts, 1);
}

#[tokio::test]
async fn should_leave_prior_codes_valid_on_reissue() {
    let existing = test_identity();

    let identities = MockIdentityRepo::new(vec![existing.clone()]);
    let codes = MockOtpRepo::empty();
    let codes_handle = codes.handle();

    let uc = RequestOtpUseCase {
        identities,
        codes,
        notifier: MockNotifier::new(),
    };

    for _ in 0..3 {
        uc.execute(RequestOtpInput {
            email: existing.email.clone(),
            phone: None,
        })
        .await
        .unwrap();
    }

    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes.len(), 3, "re-issuance must not invalidate earlier codes");
    assert!(codes.iter().all(|c| c.is_valid()));
}
