/// Integration-level tests for the `shared` crate: wire types as clients see
/// them, and config parsing/validation.
// ---------------------------------------------------------------------------
// Analysis wire types
// ---------------------------------------------------------------------------
#[cfg(test)]
mod analysis_tests {
    use serde_json::json;
    use shared::types::*;

    #[test]
    fn request_metadata_is_optional() {
        let req: AnalysisRequest =
            serde_json::from_value(json!({"url": "https://a.test", "dom_content": "<p>"})).unwrap();
        assert!(req.metadata.is_none());

        let req: AnalysisRequest = serde_json::from_value(json!({
            "url": "https://a.test",
            "dom_content": "<p>",
            "metadata": {"title": "A", "frames": 2}
        }))
        .unwrap();
        let meta = req.metadata.unwrap();
        assert_eq!(meta["title"], "A");
        assert_eq!(meta["frames"], 2);
    }

    #[test]
    fn request_requires_url_and_dom_content() {
        assert!(serde_json::from_value::<AnalysisRequest>(json!({"url": "https://a.test"})).is_err());
        assert!(serde_json::from_value::<AnalysisRequest>(json!({"dom_content": "<p>"})).is_err());
    }

    #[test]
    fn response_always_carries_anomalies_array() {
        let resp = AnalysisResponse {
            is_spoof: false,
            confidence_score: 0.1,
            threat_level: "Legitimate".to_string(),
            anomalies: vec![],
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["anomalies"], json!([]));
        for key in ["is_spoof", "confidence_score", "threat_level", "anomalies"] {
            assert!(v.get(key).is_some(), "missing key: {}", key);
        }
    }

    #[test]
    fn scan_record_field_names() {
        let rec = ScanRecord {
            id: 1,
            user_id: 2,
            url: "https://a.test".to_string(),
            is_spoof: true,
            confidence_score: 0.9,
            threat_level: "Phishing".to_string(),
            timestamp: 1_700_000_000,
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["user_id"], 2);
        assert_eq!(v["is_spoof"], true);
        assert_eq!(v["timestamp"], 1_700_000_000i64);
    }

    #[test]
    fn trust_stats_shape() {
        let v = serde_json::to_value(TrustStats {
            scanned: 10,
            blocked: 3,
            trust_score: 70.0,
        })
        .unwrap();
        assert_eq!(v, json!({"scanned": 10, "blocked": 3, "trust_score": 70.0}));
    }
}

// ---------------------------------------------------------------------------
// Auth wire types
// ---------------------------------------------------------------------------
#[cfg(test)]
mod auth_tests {
    use serde_json::json;
    use shared::types::*;

    #[test]
    fn error_response_shape() {
        let err = ErrorResponse::new("EMAIL_TAKEN", "Email is already registered");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "code": "EMAIL_TAKEN", "message": "Email is already registered"})
        );
        assert_eq!(err.to_string(), "EMAIL_TAKEN: Email is already registered");
    }

    #[test]
    fn claims_subject_is_a_string() {
        let claims = SessionClaims {
            sub: "42".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        };
        let v = serde_json::to_value(&claims).unwrap();
        assert!(v["sub"].is_string());
        assert_eq!(v["exp"], 1_700_086_400u64);
    }

    #[test]
    fn login_and_register_bodies() {
        let login: LoginData =
            serde_json::from_value(json!({"email": "a@b.test", "password": "pw"})).unwrap();
        assert_eq!(login.email, "a@b.test");

        let reg: RegistrationData =
            serde_json::from_value(json!({"email": "a@b.test", "password": "pw"})).unwrap();
        assert_eq!(reg.password, "pw");

        let out = serde_json::to_value(LoginResponse {
            token: "t".to_string(),
            expires_in: 86_400,
        })
        .unwrap();
        assert_eq!(out, json!({"token": "t", "expires_in": 86_400}));

        let out = serde_json::to_value(RegistrationResponse {
            message: "User registered successfully".to_string(),
            user_id: 7,
        })
        .unwrap();
        assert_eq!(out["user_id"], 7);
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------
#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use shared::config::{MAX_TOKEN_EXPIRY_HOURS, load_config, parse_config};
    use shared::types::server_config::ConfigError;

    const SECRET_LINE: &str = r#"jwt_secret = "a-config-secret-that-is-at-least-32-chars""#;

    fn minimal() -> String {
        format!("[server]\n\n[auth]\n{}\n", SECRET_LINE)
    }

    #[test]
    fn minimal_config_takes_defaults() {
        let cfg = parse_config(&minimal()).unwrap();
        assert_eq!(cfg.server.addr(), "127.0.0.1:8080");
        assert_eq!(cfg.server.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(cfg.auth.token_expiry_secs(), 24 * 60 * 60);
        assert!(cfg.scoring.timeout_ms > 0);
        assert_eq!(cfg.database.path, "sentinel.db");
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(parse_config("  \n"), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn zero_scoring_timeout_is_rejected() {
        let toml = format!("{}\n[scoring]\ntimeout_ms = 0\n", minimal());
        assert!(matches!(parse_config(&toml), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let toml = format!("{}\n[scoring]\nendpoint = \"ftp://scorer/analyze\"\n", minimal());
        assert!(matches!(parse_config(&toml), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn zero_token_expiry_is_rejected() {
        let toml = format!("[server]\n\n[auth]\ntoken_expiry_hours = 0\n{}\n", SECRET_LINE);
        assert!(matches!(parse_config(&toml), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_token_expiry_is_rejected() {
        let toml = format!(
            "[server]\n\n[auth]\ntoken_expiry_hours = 9223372036854775807\n{}\n",
            SECRET_LINE
        );
        assert!(matches!(parse_config(&toml), Err(ConfigError::InvalidConfig(_))));

        let over = format!(
            "[server]\n\n[auth]\ntoken_expiry_hours = {}\n{}\n",
            MAX_TOKEN_EXPIRY_HOURS + 1,
            SECRET_LINE
        );
        assert!(matches!(parse_config(&over), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn one_year_token_expiry_is_accepted() {
        if std::env::var("JWT_SECRET").is_ok_and(|s| s.len() < 32) {
            return;
        }
        let toml = format!(
            "[server]\n\n[auth]\ntoken_expiry_hours = {}\n{}\n",
            MAX_TOKEN_EXPIRY_HOURS, SECRET_LINE
        );
        let cfg = parse_config(&toml).unwrap();
        assert_eq!(cfg.auth.token_expiry_secs(), 365 * 24 * 60 * 60);
    }

    #[test]
    fn short_secret_is_rejected() {
        if std::env::var("JWT_SECRET").is_ok() {
            return;
        }
        let toml = "[server]\n\n[auth]\njwt_secret = \"too-short\"\n";
        assert!(matches!(parse_config(toml), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn missing_secret_is_rejected() {
        if std::env::var("JWT_SECRET").is_ok() {
            return;
        }
        assert!(matches!(
            parse_config("[server]\n\n[auth]\n"),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(parse_config("[server\nport ="), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[server]\nport = 9090\n\n[auth]\n{}\n\n[database]\npath = \":memory:\"\n",
            SECRET_LINE
        )
        .unwrap();

        let cfg = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.database.path, ":memory:");
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        assert!(matches!(
            load_config("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
