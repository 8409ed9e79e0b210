//! Vectors shared with the Python, JavaScript and PHP signers.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use ska_auth::canonical::{Encoding, ExtraData};
    use ska_auth::signature::{generate_signature, get_base, validate_signature};
    use ska_core::{ErrorCode, SignatureAlgorithm};

    use crate::{AUTH_USER, SECRET_KEY, VALID_UNTIL, extra, init_tracing};

    struct Vector {
        extra: ExtraData,
        encoding: Encoding,
        base: &'static str,
        /// Signatures in `SignatureAlgorithm::ALL` order.
        signatures: [&'static str; 6],
    }

    fn vectors() -> Vec<Vector> {
        vec![
            Vector {
                extra: ExtraData::new(),
                encoding: Encoding::default(),
                base: "1628717009.0_me@example.com",
                signatures: [
                    "3k8hjz4QBvvR7uT+HPVA3w==",
                    "WTjN2wPENDW1gCHEVPKz3IXlE0g=",
                    "maIVrZoMV90F1yjOnDvADBYq4FDEj7mt+EZ4aw==",
                    "EZ7uXeeopIxK3wL62J/9tKPXoGmNk9V3KHGgwge9/ek=",
                    "c0TMETzdfqhYINb+PrxifDs/3tx4yMUR2ntfVTLHhdDf6tKfkqcAQbk2Z/JobFp8",
                    "7QcInLFxLrv1TeZZY4EXbAc1YguBlcjmYfFe5J+FH4TAOquSBZvKwYLSQCS4VVmdhDDU1h1zVlPDc4MAW6SHGQ==",
                ],
            },
            Vector {
                extra: extra(&[("one", json!("1")), ("two", json!("2"))]),
                encoding: Encoding::default(),
                base: "1628717009.0_me@example.com_one%3D1%26two%3D2",
                signatures: [
                    "sSVc+F+j561pVQk6TlWlng==",
                    "dFqd/VbWOaY3ROlL89K6JZZsfhE=",
                    "d3s7Y6N0Cki828GNXmD7q8xFPF9wKyEQUXetqg==",
                    "Cl90LfQ2L3DW2MAhZriqCfEisPdL+1aHA/M0GPc1Yr4=",
                    "v1C4CtYL1dbjmFGBudZOBUOVit3Mz/OupF4LoZoOzYLx8qFCgA9LS0FcttAkvQb0",
                    "+Bm5xtd3Cl+7VV0RM6H14z68M8vWuMP168m3UsXLP1jHTTQCg3mXxTncZ9a57AoQefh/qNmDdnD5AmFYGzJ+PQ==",
                ],
            },
            Vector {
                extra: extra(&[("one", json!("â"))]),
                encoding: Encoding::javascript(),
                base: "1628717009.0_me@example.com_one%3D%C3%A2",
                signatures: [
                    "ALPIXjpsny5K3WksxehW2w==",
                    "dlT2WO/jYq7+xcvDEUkCnNW5TxA=",
                    "ETjh6Clj4hTfk5B7xnmJlQq27mGAazYjHeYWEA==",
                    "9UpLTlFgEbCJ2C4/gC4eDogn0JiuMzo7osbMEOejwkQ=",
                    "/DlJjd7aTyPfNUIXyTd5mNoVgfqpqrbNnKZnth4SjZpu9pbmPu6v4usZ8gdlniNj",
                    "yockrWxDncGJ2/HMEi/ma/auEmv8xlIMm5U50CuTFYSKbzrgNPh4OXgax/s2d96+paaLagwmnZK1+xUGHeArXw==",
                ],
            },
            Vector {
                extra: extra(&[("one", json!({"value": "â"}))]),
                encoding: Encoding::javascript(),
                base: "1628717009.0_me@example.com_one%3D%7B%22value%22%3A%22%5Cu00e2%22%7D",
                signatures: [
                    "crGmS5KOm1W6L2vMvcqzRA==",
                    "+pA63D4EMF2pcfIlE/dYXyNkhx4=",
                    "AOgkzfptY0ORvU0ghv5oNO5T+2FVKqJv42Z9JA==",
                    "9Tg3PdJYm/2tKZtVU0F/5T6TtL39Rwy4Uniq36ZClMY=",
                    "MyYWySaWRTZQ3Zv7uiAn+9CYkPaKwoyqZOykOwSnD7g9G8pTwFpueKHtJ27dNSV8",
                    "OlFZzu/SlBQYWny3CVvP7ghiL6X8G4r/yS9yNl8N+9b1arae3AkMLCp+0MuLs2sp8qdM3j+a7MYdCQCBSOnAoQ==",
                ],
            },
        ]
    }

    #[test]
    fn test_should_build_shared_base_strings() {
        init_tracing();
        for vector in vectors() {
            let base = get_base(AUTH_USER, VALID_UNTIL, &vector.extra, vector.encoding);
            assert_eq!(String::from_utf8(base).unwrap(), vector.base);
        }
    }

    #[test]
    fn test_should_produce_shared_signatures() {
        init_tracing();
        for vector in vectors() {
            for (algorithm, expected) in SignatureAlgorithm::ALL.into_iter().zip(vector.signatures) {
                let signature = generate_signature(
                    algorithm,
                    AUTH_USER,
                    SECRET_KEY,
                    Some(VALID_UNTIL),
                    600,
                    &vector.extra,
                    vector.encoding,
                )
                .unwrap();
                assert_eq!(signature.signature, expected, "{algorithm} over {}", vector.base);
            }
        }
    }

    #[test]
    fn test_should_accept_shared_signatures_apart_from_expiry() {
        init_tracing();
        for vector in vectors() {
            for (algorithm, presented) in SignatureAlgorithm::ALL.into_iter().zip(vector.signatures) {
                let result = validate_signature(
                    algorithm,
                    presented,
                    AUTH_USER,
                    SECRET_KEY,
                    VALID_UNTIL,
                    &vector.extra,
                    vector.encoding,
                );
                assert_eq!(
                    result.errors,
                    vec![ErrorCode::SignatureTimestampExpired],
                    "{algorithm} over {}",
                    vector.base
                );
            }
        }
    }

    #[test]
    fn test_should_reject_shared_signatures_with_swapped_encoding() {
        init_tracing();
        let vectors = vectors();
        let nested = &vectors[3];
        let result = validate_signature(
            SignatureAlgorithm::HmacSha1,
            nested.signatures[1],
            AUTH_USER,
            SECRET_KEY,
            VALID_UNTIL,
            &nested.extra,
            Encoding::default(),
        );
        assert!(result.errors.contains(&ErrorCode::InvalidSignature));
    }
}
