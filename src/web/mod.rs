//! HTTP front end
//!
//! `launch-dash` → serves the dashboard page and JSON chart endpoints.
//! Requests are handled one at a time; each carries its own control values
//! so the server keeps no per-client state.

mod page;

use page::ControlInputs;

use std::io;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::chart::{empty_pie, empty_scatter, update_pie, update_scatter, ChartSpec};
use crate::color::ColorMap;
use crate::data::filter::FilterState;
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelection};
use crate::layout::build_layout;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("malformed query string: {0}")]
    Malformed(#[from] serde_urlencoded::de::Error),

    #[error("'{field}' is not a number: '{value}'")]
    NotANumber { field: &'static str, value: String },
}

/// Raw control values from a query string. Bounds stay as text so a bad
/// value can be reported instead of failing the whole request.
#[derive(Debug, Deserialize)]
struct ControlQuery {
    site: Option<String>,
    payload_min: Option<String>,
    payload_max: Option<String>,
}

impl ControlQuery {
    fn parse(query: &str) -> Result<Self, QueryError> {
        Ok(serde_urlencoded::from_str(query)?)
    }

    /// First value of each field, ignoring repeats. Only used to title and
    /// fill the placeholders for a query that [`ControlQuery::parse`] rejected.
    fn lenient(query: &str) -> Self {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        Self {
            site: first("site"),
            payload_min: first("payload_min"),
            payload_max: first("payload_max"),
        }
    }

    fn site(&self) -> SiteSelection {
        self.site
            .as_deref()
            .map(SiteSelection::parse)
            .unwrap_or_default()
    }

    /// Missing or blank bounds fall back to the dataset extent.
    fn payload(&self, bounds: PayloadRange) -> Result<PayloadRange, QueryError> {
        let bound = |field: &'static str, raw: &Option<String>, default: f64| {
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(default),
                Some(value) => value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| !v.is_nan())
                    .ok_or_else(|| QueryError::NotANumber {
                        field,
                        value: value.to_string(),
                    }),
            }
        };
        Ok(PayloadRange::new(
            bound("payload_min", &self.payload_min, bounds.min)?,
            bound("payload_max", &self.payload_max, bounds.max)?,
        ))
    }
}

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    /// Still carries a (degraded) payload so the page can keep rendering.
    fn degraded(data: T, error: &QueryError) -> Self {
        Self { ok: false, data: Some(data), error: Some(error.to_string()) }
    }
}

/// A fully built HTTP reply, independent of the server type.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status: 200, content_type: "application/json", body },
            Err(e) => {
                log::error!("serializing response: {e}");
                Self::text(500, "Internal server error")
            }
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self { status, content_type: "text/plain; charset=utf-8", body: body.to_string() }
    }
}

/// Start the server and block serving requests.
pub fn start(addr: &str, dataset: Arc<LaunchDataset>) -> anyhow::Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("binding {addr}"))?;

    log::info!("Dashboard running on http://{addr}/");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &dataset) {
            log::error!("responding to request: {e}");
        }
    }

    Ok(())
}

fn handle_request(request: Request, dataset: &LaunchDataset) -> io::Result<()> {
    let reply = route(request.method(), request.url(), dataset);
    log::debug!("{} {} -> {}", request.method(), request.url(), reply.status);

    let header = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
        .map_err(|()| io::Error::new(io::ErrorKind::InvalidInput, "invalid content type"))?;
    let response = Response::from_string(reply.body)
        .with_status_code(reply.status)
        .with_header(header);
    request.respond(response)
}

/// Map a request line onto a reply. Never fails: bad control values give
/// empty charts, unknown paths give 404.
pub fn route(method: &Method, url: &str, dataset: &LaunchDataset) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    if *method != Method::Get {
        return Reply::text(405, "Method not allowed");
    }

    match path {
        "/" => dashboard(query, dataset),
        "/api/layout" => Reply::json(&ApiResponse::success(build_layout(dataset))),
        "/api/pie" => match ControlQuery::parse(query) {
            Ok(controls) => {
                let pie = update_pie(dataset, &controls.site());
                Reply::json(&ApiResponse::success(ChartSpec::from(pie)))
            }
            Err(e) => {
                log::warn!("pie request degraded to empty chart: {e}");
                let site = ControlQuery::lenient(query).site();
                Reply::json(&ApiResponse::degraded(ChartSpec::from(empty_pie(&site)), &e))
            }
        },
        "/api/scatter" => {
            let controls = ControlQuery::parse(query)
                .and_then(|c| Ok((c.site(), c.payload(dataset.payload_bounds())?)));
            match controls {
                Ok((site, range)) => {
                    let chart = update_scatter(dataset, &site, &range);
                    Reply::json(&ApiResponse::success(ChartSpec::from(chart)))
                }
                Err(e) => {
                    log::warn!("scatter request degraded to empty chart: {e}");
                    let site = ControlQuery::lenient(query).site();
                    let chart = empty_scatter(&site);
                    Reply::json(&ApiResponse::degraded(ChartSpec::from(chart), &e))
                }
            }
        }
        _ => Reply::text(404, "Not found"),
    }
}

fn dashboard(query: &str, dataset: &LaunchDataset) -> Reply {
    let layout = build_layout(dataset);
    let colors = ColorMap::new(dataset.sites());
    let bounds = dataset.payload_bounds();

    let (filters, inputs, pie, scatter) = match ControlQuery::parse(query) {
        Ok(controls) => {
            let site = controls.site();
            let pie = update_pie(dataset, &site);
            match controls.payload(bounds) {
                Ok(payload) => {
                    let scatter = update_scatter(dataset, &site, &payload);
                    let inputs = ControlInputs::applied(payload, &layout.slider);
                    (FilterState { site, payload }, inputs, pie, scatter)
                }
                Err(e) => {
                    log::warn!("scatter degraded to empty chart: {e}");
                    let scatter = empty_scatter(&site);
                    let inputs = ControlInputs::rejected(&controls, &e);
                    (FilterState { site, payload: bounds }, inputs, pie, scatter)
                }
            }
        }
        Err(e) => {
            log::warn!("dashboard degraded to empty charts: {e}");
            let controls = ControlQuery::lenient(query);
            let site = controls.site();
            let (pie, scatter) = (empty_pie(&site), empty_scatter(&site));
            let inputs = ControlInputs::rejected(&controls, &e);
            (FilterState { site, payload: bounds }, inputs, pie, scatter)
        }
    };

    Reply::html(page::render_page(&layout, &filters, &inputs, &pie, &scatter, &colors))
}
