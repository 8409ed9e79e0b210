//! Shortcut API driven end to end.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use ska_auth::shortcuts::{
        SignOptions, ValidationOptions, extract_signed_request_data, sign_url, signature_to_dict,
        validate_signed_request_data,
    };
    use ska_core::{ErrorCode, SkaConfig, SkaError, WireParams};

    use crate::{extra, init_tracing, query_data};

    const SECRET_KEY: &str = "your-secret-key";

    fn sign_options(params: WireParams) -> SignOptions {
        SignOptions::builder()
            .auth_user("john.doe")
            .secret_key(SECRET_KEY)
            .url("http://e.com/api/")
            .params(params)
            .extra(extra(&[
                ("email", json!("john.doe@mail.example.com")),
                ("first_name", json!("John")),
                ("last_name", json!("Doe")),
            ]))
            .build()
    }

    #[test]
    fn test_should_authenticate_signed_login_link() {
        init_tracing();
        let url = sign_url(&sign_options(WireParams::default())).unwrap();
        let data = query_data(&url);

        let validation = ValidationOptions::builder().validate(true).build();
        let profile = extract_signed_request_data(&data, Some(SECRET_KEY), &validation).unwrap();
        tracing::info!(?profile, "signed profile");
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.get("first_name").map(String::as_str), Some("John"));

        let again = extract_signed_request_data(&data, Some(SECRET_KEY), &validation).unwrap();
        assert_eq!(profile, again);
    }

    #[test]
    fn test_should_validate_post_body() {
        init_tracing();
        let body = signature_to_dict(&sign_options(WireParams::default())).unwrap();
        let result = validate_signed_request_data(&body, SECRET_KEY, &ValidationOptions::default());
        assert!(result.is_valid());
        assert_eq!(result.to_string(), "True");
    }

    #[test]
    fn test_should_share_wire_params_from_config() {
        init_tracing();
        let config = SkaConfig::from_lookup(|key| match key {
            "SKA_SIGNATURE_PARAM" => Some("sig".to_owned()),
            "SKA_EXTRA_PARAM" => Some("signed".to_owned()),
            _ => None,
        })
        .unwrap();

        let data = query_data(&sign_url(&sign_options(config.params.clone())).unwrap());
        assert!(data.contains_key("sig"));
        assert!(data.contains_key("signed"));

        let matching = ValidationOptions::builder().params(config.params).build();
        assert!(validate_signed_request_data(&data, SECRET_KEY, &matching).is_valid());

        let mismatched = validate_signed_request_data(&data, SECRET_KEY, &ValidationOptions::default());
        assert!(mismatched.errors.contains(&ErrorCode::InvalidSignature));
    }

    #[test]
    fn test_should_report_both_failures_for_stale_forgery() {
        init_tracing();
        let options = SignOptions::builder()
            .auth_user("john.doe")
            .secret_key("attacker-secret")
            .valid_until("1628717009.0")
            .build();
        let data = signature_to_dict(&options).unwrap();

        let result = validate_signed_request_data(&data, SECRET_KEY, &ValidationOptions::default());
        assert_eq!(
            result.message(),
            "Invalid signature! Signature timestamp expired!"
        );

        let validation = ValidationOptions::builder().validate(true).build();
        match extract_signed_request_data(&data, Some(SECRET_KEY), &validation) {
            Err(SkaError::InvalidData(message)) => {
                assert_eq!(message, result.message());
            }
            other => panic!("expected invalid data, got {other:?}"),
        }
    }
}
