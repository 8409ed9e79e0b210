//! Tampering with signed URLs in transit.

#[cfg(test)]
mod tests {
    use http::Uri;
    use serde_json::json;
    use ska_auth::canonical::{Encoding, RequestData};
    use ska_auth::credentials::StaticSecretKeyProvider;
    use ska_auth::request::{RequestHelper, request_data_from_uri};
    use ska_auth::signature::generate_signature;
    use ska_core::{ErrorCode, SignatureAlgorithm};

    use crate::{AUTH_USER, SECRET_KEY, extra, init_tracing, query_data};

    fn signed_url(helper: &RequestHelper) -> String {
        let signature = generate_signature(
            helper.algorithm(),
            AUTH_USER,
            SECRET_KEY,
            None,
            600,
            &extra(&[("a", json!("1")), ("b", json!("2"))]),
            helper.encoding(),
        )
        .unwrap();
        let url = helper
            .signature_to_url(&signature, "http://e.com/api/", "?")
            .unwrap();
        tracing::info!(%url, algorithm = %helper.algorithm(), "signed url");
        url
    }

    fn errors(helper: &RequestHelper, data: &RequestData) -> Vec<ErrorCode> {
        helper.validate_request_data(data, SECRET_KEY).errors
    }

    #[test]
    fn test_should_validate_untouched_uri() {
        init_tracing();
        let helper = RequestHelper::default();
        let uri: Uri = signed_url(&helper).parse().unwrap();
        let data = request_data_from_uri(&uri);
        assert!(errors(&helper, &data).is_empty());
    }

    #[test]
    fn test_should_reject_dropped_extra_declaration() {
        init_tracing();
        let helper = RequestHelper::default();
        let url = signed_url(&helper).replace("extra=a%2Cb", "extra=a");
        let data = query_data(&url);
        assert_eq!(data.get("b").map(String::as_str), Some("2"));
        assert_eq!(errors(&helper, &data), vec![ErrorCode::InvalidSignature]);
    }

    #[test]
    fn test_should_tolerate_appended_fields() {
        init_tracing();
        let helper = RequestHelper::default();
        let url = format!("{}&foo=bar", signed_url(&helper));
        let data = query_data(&url);
        assert!(errors(&helper, &data).is_empty());

        let extracted = helper
            .extract_signed_data(&data, Some(SECRET_KEY), true, false)
            .unwrap();
        assert!(!extracted.contains_key("foo"));
        assert_eq!(extracted.len(), 2);
    }

    #[test]
    fn test_should_reject_changed_fields() {
        init_tracing();
        let helper = RequestHelper::default();
        let data = query_data(&signed_url(&helper));

        for (field, value) in [("a", "9"), ("auth_user", "admin@example.com")] {
            let mut tampered = data.clone();
            tampered.insert(field.to_owned(), value.to_owned());
            assert_eq!(
                errors(&helper, &tampered),
                vec![ErrorCode::InvalidSignature],
                "{field}"
            );
        }
    }

    #[test]
    fn test_should_reject_extended_validity() {
        init_tracing();
        let helper = RequestHelper::default();
        let mut data = query_data(&signed_url(&helper));
        data.insert("valid_until".to_owned(), "4102444800.0".to_owned());
        assert_eq!(errors(&helper, &data), vec![ErrorCode::InvalidSignature]);
    }

    #[test]
    fn test_should_reject_wrong_algorithm() {
        init_tracing();
        let signer = RequestHelper::builder()
            .algorithm(SignatureAlgorithm::HmacSha256)
            .encoding(Encoding::javascript())
            .build();
        let data = query_data(&signed_url(&signer));
        assert!(errors(&signer, &data).is_empty());

        let other_algorithm = RequestHelper::builder()
            .encoding(Encoding::javascript())
            .build();
        assert_eq!(
            errors(&other_algorithm, &data),
            vec![ErrorCode::InvalidSignature]
        );
    }

    #[test]
    fn test_should_pick_secret_per_provider() {
        init_tracing();
        let provider = StaticSecretKeyProvider::new(
            None,
            vec![
                ("tenant-a".to_owned(), SECRET_KEY.to_owned()),
                ("tenant-b".to_owned(), "another-secret".to_owned()),
            ],
        );
        let helper = RequestHelper::default();

        let url = format!("{}&provider=tenant-a", signed_url(&helper));
        let extracted = helper
            .extract_signed_data_with_provider(&query_data(&url), &provider, false)
            .unwrap();
        assert_eq!(extracted.get("a").map(String::as_str), Some("1"));

        let spoofed = url.replace("provider=tenant-a", "provider=tenant-b");
        assert!(
            helper
                .extract_signed_data_with_provider(&query_data(&spoofed), &provider, false)
                .is_err()
        );
    }
}
