use hyper::header::{AUTHORIZATION, HeaderMap};

/// Token from an `Authorization: Bearer <token>` header.  The scheme is
/// matched case-insensitively; an empty token counts as absent.
pub fn get_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(get_bearer_token(&with_auth("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(get_bearer_token(&with_auth("bearer abc")), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_blanks() {
        assert_eq!(get_bearer_token(&with_auth("Basic dXNlcjpwYXNz")), None);
        assert_eq!(get_bearer_token(&with_auth("Bearer ")), None);
        assert_eq!(get_bearer_token(&with_auth("Bearer")), None);
        assert_eq!(get_bearer_token(&HeaderMap::new()), None);
    }
}
