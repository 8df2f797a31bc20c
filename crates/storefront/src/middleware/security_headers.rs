//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. Start locked down and
//! loosen only when specific functionality requires it.

use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Content-Security-Policy` (see [`content_security_policy`])
/// - `Permissions-Policy` denying sensitive features
/// - `Cache-Control: no-store, max-age=0` unless the handler set one
/// - `Cross-Origin-Opener-Policy: same-origin`
/// - `Cross-Origin-Resource-Policy: same-origin`
/// - `Cross-Origin-Embedder-Policy: credentialless` (product images come
///   from the Shopify CDN, which does not send CORP headers)
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request.extensions().get::<CspNonce>().cloned();
    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut(), nonce.as_ref());
    response
}

/// CSP for a response. Inline scripts are allowed only with `nonce`.
///
/// ```text
/// default-src 'none';
/// script-src 'self' 'nonce-…';
/// style-src 'self';
/// img-src 'self' https://cdn.shopify.com;
/// ...
/// ```
#[must_use]
pub fn content_security_policy(nonce: Option<&CspNonce>) -> String {
    let script_src = nonce
        .filter(|nonce| !nonce.value().is_empty())
        .map_or_else(|| "'self'".to_string(), |nonce| format!("'self' {}", nonce.source()));

    format!(
        "default-src 'none'; \
         script-src {script_src}; \
         style-src 'self'; \
         font-src 'self'; \
         img-src 'self' https://cdn.shopify.com; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'; \
         upgrade-insecure-requests"
    )
}

fn apply_security_headers(headers: &mut HeaderMap, nonce: Option<&CspNonce>) {
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    match HeaderValue::from_str(&content_security_policy(nonce)) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => {
            tracing::error!(error = %e, "Invalid CSP header, falling back to nonce-less policy");
            if let Ok(value) = HeaderValue::from_str(&content_security_policy(None)) {
                headers.insert(CONTENT_SECURITY_POLICY, value);
            }
        }
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), \
             display-capture=(), \
             geolocation=(), \
             gyroscope=(), \
             magnetometer=(), \
             microphone=(), \
             payment=(), \
             usb=(), \
             interest-cohort=()",
        ),
    );

    // Handlers (e.g. static files) may choose their own caching
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("credentialless"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_includes_nonce() {
        let nonce = CspNonce("r4nd0m==".to_string());
        let csp = content_security_policy(Some(&nonce));
        assert!(csp.contains("script-src 'self' 'nonce-r4nd0m==';"));
        assert!(csp.starts_with("default-src 'none';"));
    }

    #[test]
    fn test_csp_without_nonce() {
        let csp = content_security_policy(None);
        assert!(csp.contains("script-src 'self';"));
        assert!(!csp.contains("nonce-"));

        let empty = CspNonce(String::new());
        assert!(!content_security_policy(Some(&empty)).contains("nonce-"));
    }

    #[test]
    fn test_existing_cache_control_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=60"));
        apply_security_headers(&mut headers, None);
        assert_eq!(
            headers.get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("public, max-age=60")
        );
    }

    #[test]
    fn test_default_cache_control() {
        let mut headers = HeaderMap::new();
        apply_security_headers(&mut headers, None);
        assert_eq!(
            headers.get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-store, max-age=0")
        );
        assert_eq!(
            headers.get(X_FRAME_OPTIONS).and_then(|v| v.to_str().ok()),
            Some("DENY")
        );
    }
}
