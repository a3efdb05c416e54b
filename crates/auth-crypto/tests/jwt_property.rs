//! Property coverage for JWT issuance/decode across arbitrary subject
//! values and both signing modes, plus Argon2 hash/verify round trips.

use auth_crypto::{JwtConfig, JwtService, KeyManager, PasswordHasher, TokenType};
use proptest::prelude::*;

fn hmac_service() -> JwtService {
    JwtService::new(
        JwtConfig::default(),
        KeyManager::from_hmac_secret("property-test-secret-at-least-32-bytes-long"),
    )
}

proptest! {
    #[test]
    fn decoded_subject_matches_issued_subject(subject in "[0-9]{1,9}") {
        let service = hmac_service();
        let (token, _) = service
            .issue("customer_id", &subject, TokenType::Access)
            .expect("issuance with a well-formed subject never fails");

        let claims = service
            .decode_and_validate(&token, "customer_id")
            .expect("a token just issued by this service always decodes");

        prop_assert_eq!(claims.subject_value, subject);
        prop_assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn decode_rejects_the_wrong_family_claim(subject in "[0-9]{1,9}") {
        let service = hmac_service();
        let (token, _) = service
            .issue("customer_id", &subject, TokenType::Access)
            .unwrap();

        prop_assert!(service.decode_and_validate(&token, "admin_id").is_err());
    }

    #[test]
    fn rsa_mode_round_trips_like_hmac_mode(subject in "[0-9]{1,9}") {
        let service = JwtService::new(JwtConfig::default(), KeyManager::new_for_testing());
        let (token, _) = service
            .issue("bot_id", &subject, TokenType::Refresh)
            .unwrap();

        let claims = service.decode_and_validate(&token, "bot_id").unwrap();
        prop_assert_eq!(claims.subject_value, subject);
        prop_assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn argon2_verifies_only_the_original_password(password in "[ -~]{8,40}", other in "[ -~]{8,40}") {
        prop_assume!(password != other);
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password(&password).unwrap();

        prop_assert!(hasher.verify_password(&password, &hash).unwrap());
        prop_assert!(!hasher.verify_password(&other, &hash).unwrap());
    }
}
