use crate::render;
use crate::server::api::{self, ApiError};
use crate::server::state::AppState;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn ok(content_type: &'static str, body: String) -> Self {
        HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type,
            body,
        }
    }

    fn json(result: Result<String, ApiError>) -> Self {
        match result {
            Ok(payload) => Self::ok("application/json", payload),
            Err(err) => api_error_response(&err),
        }
    }
}

pub fn route_request(method: &str, path: &str, body: &str, state: &AppState) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/") => HttpResponse::ok("text/html; charset=utf-8", page_html(state, "/")),
        ("GET", "/search") => HttpResponse::ok("text/html; charset=utf-8", page_html(state, path)),
        ("GET", "/api/health") => HttpResponse::json(api::health_payload(state)),
        ("GET", "/api/effects") => HttpResponse::json(api::effects_payload(state)),
        ("POST", "/api/results") => HttpResponse::json(api::results_payload(state, body)),
        ("GET", "/api/index") => HttpResponse::json(api::index_payload(state)),
        ("GET", "/api/results.csv") => match api::results_csv_payload(state, path) {
            Ok(payload) => HttpResponse::ok("text/csv; charset=utf-8", payload),
            Err(err) => api_error_response(&err),
        },
        (_, "/" | "/search" | "/api/health" | "/api/effects" | "/api/results" | "/api/index" | "/api/results.csv") => {
            error_response(405, "Method Not Allowed", "Method not allowed")
        }
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn api_error_response(err: &ApiError) -> HttpResponse {
    match err {
        ApiError::Parse(_) => error_response(400, "Bad Request", &err.to_string()),
        ApiError::Loading => error_response(503, "Service Unavailable", &err.to_string()),
        ApiError::Export(_) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn page_html(state: &AppState, path: &str) -> String {
    let version = state
        .catalog()
        .data_version
        .as_deref()
        .map(|v| format!("<p class=\"meta\">Catalog {}</p>", render::escape(v)))
        .unwrap_or_default();
    let refresh = if state.is_loading() {
        "<meta http-equiv=\"refresh\" content=\"2\" />"
    } else {
        ""
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  {refresh}
  <title>Seedfinder</title>
  <style>
    body {{ font-family: Arial, sans-serif; max-width: 720px; margin: 24px auto; padding: 0 12px; }}
    form {{ display: flex; flex-direction: column; gap: 8px; margin-bottom: 32px; }}
    label {{ font-weight: 600; }}
    select {{ overflow-y: auto; }}
    .results p {{ margin: 4px 0; }}
    .results .thin {{ font-weight: 100; color: #555; }}
    .meta {{ color: #666; font-size: 0.9rem; }}
  </style>
</head>
<body>
  <h1>Seedfinder</h1>
  {version}
{widget}
</body>
</html>
"#,
        widget = api::search_fragment(state, path),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::effect::{Effect, EffectCatalog};
    use crate::parallel::WorkerPool;
    use crate::roll::SeededRoller;

    fn loading_state() -> AppState {
        AppState::new(
            EffectCatalog::new(vec![Effect::new("a", "Alpha"), Effect::new("none", "None")]),
            SeededRoller::new(0),
            WorkerPool::default(),
        )
    }

    #[test]
    fn loading_state_returns_503_for_results() {
        let state = loading_state();
        let response = route_request("POST", "/api/results", r#"{"selected":["a"]}"#, &state);
        assert_eq!(response.status_code, 503);
        assert_eq!(route_request("GET", "/api/index", "", &state).status_code, 503);
    }

    #[test]
    fn loading_page_refreshes_and_disables_selector() {
        let state = loading_state();
        let response = route_request("GET", "/", "", &state);
        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("http-equiv=\"refresh\""));
        assert!(response.body.contains(" disabled"));
    }

    #[test]
    fn wrong_method_is_405() {
        let state = loading_state();
        assert_eq!(route_request("DELETE", "/api/effects", "", &state).status_code, 405);
        assert_eq!(route_request("GET", "/nope", "", &state).status_code, 404);
    }
}
