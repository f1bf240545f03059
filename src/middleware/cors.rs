use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::Error;

/// Value sent back to origins outside the allow-list; no browser origin matches it.
pub const DENY_ORIGIN: &str = "none";
pub const ALLOWED_REQUEST_HEADERS: &str = "Content-Type, Authorization";

pub enum GateDecision {
    Continue,
    Handled(Response),
}

/// Origin and method check for a single endpoint.
#[derive(Clone, Debug)]
pub struct CorsGate {
    allowed_origins: Arc<Vec<String>>,
    method: Method,
}

impl CorsGate {
    pub fn new(allowed_origins: Arc<Vec<String>>, method: Method) -> Self {
        Self {
            allowed_origins,
            method,
        }
    }

    pub fn check(&self, method: &Method) -> GateDecision {
        if method == Method::OPTIONS {
            let mut response = StatusCode::OK.into_response();
            let headers = response.headers_mut();
            if let Ok(methods) = HeaderValue::from_str(&format!("{}, OPTIONS", self.method)) {
                headers.insert(ACCESS_CONTROL_ALLOW_METHODS, methods);
            }
            headers.insert(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_REQUEST_HEADERS),
            );
            return GateDecision::Handled(response);
        }

        if *method != self.method {
            return GateDecision::Handled(Error::MethodNotAllowed.into_response());
        }

        GateDecision::Continue
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }

    pub fn apply_origin(&self, headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
        let allowed = origin.filter(|o| o.to_str().is_ok_and(|o| self.is_allowed(o)));
        match allowed {
            Some(origin) => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                headers.append(VARY, HeaderValue::from_static("Origin"));
            }
            None => {
                headers.insert(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static(DENY_ORIGIN),
                );
            }
        }
    }
}

pub async fn cors_gate(State(gate): State<CorsGate>, req: Request<Body>, next: Next) -> Response {
    let origin = req.headers().get(ORIGIN).cloned();

    let mut response = match gate.check(req.method()) {
        GateDecision::Continue => next.run(req).await,
        GateDecision::Handled(response) => {
            tracing::debug!(method = %req.method(), uri = %req.uri(), "Request handled by CORS gate");
            response
        }
    };

    gate.apply_origin(response.headers_mut(), origin.as_ref());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(method: Method) -> CorsGate {
        CorsGate::new(
            Arc::new(vec!["https://tanguyhardion.github.io".to_string()]),
            method,
        )
    }

    #[test]
    fn preflight_is_answered_with_allowed_method_and_headers() {
        let GateDecision::Handled(resp) = gate(Method::POST).check(&Method::OPTIONS) else {
            panic!("preflight should be handled");
        };
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(
            resp.headers()[ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
    }

    #[test]
    fn wrong_method_is_rejected() {
        let GateDecision::Handled(resp) = gate(Method::GET).check(&Method::POST) else {
            panic!("wrong method should be handled");
        };
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn matching_method_continues() {
        assert!(matches!(
            gate(Method::POST).check(&Method::POST),
            GateDecision::Continue
        ));
    }

    #[test]
    fn listed_origin_is_echoed_with_vary() {
        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("https://tanguyhardion.github.io");
        gate(Method::GET).apply_origin(&mut headers, Some(&origin));

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], origin);
        assert_eq!(headers[VARY], "Origin");
    }

    #[test]
    fn unknown_or_missing_origin_gets_sentinel() {
        for origin in [Some(HeaderValue::from_static("https://evil.example")), None] {
            let mut headers = HeaderMap::new();
            gate(Method::GET).apply_origin(&mut headers, origin.as_ref());
            assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], DENY_ORIGIN);
            assert!(headers.get(VARY).is_none());
        }
    }

    #[test]
    fn origin_match_is_exact() {
        let g = gate(Method::GET);
        assert!(!g.is_allowed("https://tanguyhardion.github.io.evil.example"));
        assert!(!g.is_allowed("http://tanguyhardion.github.io"));
    }
}
