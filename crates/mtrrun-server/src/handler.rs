//! HTTP handlers: path parameters in, service calls out.

use axum::{
    extract::{Path, State},
    response::Html,
};

use mtrrun_core::error::MtrrunError;
use mtrrun_core::protocol::value;
use mtrrun_core::MetricKind;

use crate::app_state::AppState;
use crate::error::ApiError;

fn require_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() {
        return Err(MtrrunError::Validation(
            "unable to parse name. Expected: string with length > 0".into(),
        )
        .into());
    }
    Ok(())
}

/// `POST /update/:kind/:name/:value`
pub async fn update_metric(
    State(state): State<AppState>,
    Path((kind, name, raw)): Path<(String, String, String)>,
) -> Result<&'static str, ApiError> {
    require_name(&name)?;

    match kind.parse::<MetricKind>()? {
        MetricKind::Gauge => {
            let v = value::parse_gauge(&raw)?;
            state.service().put_gauge(&name, v).await?;
        }
        MetricKind::Counter => {
            let delta = value::parse_counter(&raw)?;
            state.service().put_counter(&name, delta).await?;
        }
    }

    Ok("OK")
}

/// `GET /value/:kind/:name`
pub async fn get_metric(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
) -> Result<String, ApiError> {
    require_name(&name)?;

    let body = match kind.parse::<MetricKind>()? {
        MetricKind::Gauge => value::format_gauge(state.service().get_gauge(&name).await?.value),
        MetricKind::Counter => {
            value::format_counter(state.service().get_counter(&name).await?.value)
        }
    };
    Ok(body)
}

/// `GET /`
pub async fn list_metrics(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let mut all = state.service().get_all().await?;
    all.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n</head>\n<body>\n",
    );
    for m in all.iter().filter(|m| !m.name.is_empty()) {
        out.push_str(&format!(
            "<ol>{}: {}</ol>\n",
            escape_html(&m.name),
            escape_html(&m.value)
        ));
    }
    out.push_str("</body>\n</html>\n");

    Ok(Html(out))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
