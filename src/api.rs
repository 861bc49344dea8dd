//! REST API for the loading service.
//!
//! Exposes packing, live packing progress and load estimates over HTTP.
//! Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::ops::ControlFlow;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, OptimizerConfig};
use crate::model::{Commodity, Container, Item, Placement, ValidationError, expand_commodities};
use crate::optimizer::{
    ContainerLoad, PackEvent, PackingError, PackingRun, PackingSummary, pack_until_stopped,
    pack_with_config,
};
use crate::requirements::{LoadRequirements, VehicleCapacity, calculate_load_requirements};

#[derive(Clone)]
struct ApiState {
    optimizer_config: OptimizerConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>stowage API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
</html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Request body shared by `/pack` and `/pack_stream`.
#[derive(Deserialize, Clone, ToSchema)]
#[schema(
    example = json!({
        "commodities": [
            { "name": "pallet", "length_mm": 1200.0, "width_mm": 800.0, "height_mm": 1000.0, "weight_kg": 250.0 },
            { "name": "glassware", "length_mm": 400.0, "width_mm": 300.0, "height_mm": 300.0, "weight_kg": 8.5, "quantity": 2, "fragile": true }
        ],
        "containers": [
            { "id": "van", "length_mm": 3000.0, "width_mm": 1800.0, "height_mm": 1800.0, "max_weight_kg": 1200.0 }
        ]
    })
)]
pub struct PackRequest {
    pub commodities: Vec<Commodity>,
    pub containers: Vec<Container>,
}

#[derive(Debug)]
struct ValidatedPackRequest {
    items: Vec<Item>,
    containers: Vec<Container>,
}

#[derive(Debug)]
enum PackRequestValidationError {
    MissingContainers,
    InvalidContainer(ValidationError),
    InvalidCommodity(ValidationError),
}

impl PackRequest {
    fn into_validated(self) -> Result<ValidatedPackRequest, PackRequestValidationError> {
        if self.containers.is_empty() {
            return Err(PackRequestValidationError::MissingContainers);
        }
        for container in &self.containers {
            container
                .validate()
                .map_err(PackRequestValidationError::InvalidContainer)?;
        }
        let items = expand_commodities(&self.commodities)
            .map_err(PackRequestValidationError::InvalidCommodity)?;

        Ok(ValidatedPackRequest {
            items,
            containers: self.containers,
        })
    }
}

#[derive(Deserialize, ToSchema)]
pub struct RequirementsRequest {
    pub commodities: Vec<Commodity>,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// One loaded container in the response.
#[derive(Serialize, ToSchema)]
pub struct PackedContainer {
    pub id: String,
    pub dimensions_mm: Dimensions,
    pub max_weight_kg: f64,
    pub total_weight_kg: f64,
    pub utilization_percent: f64,
    pub placements: Vec<Placement>,
    pub warnings: Vec<String>,
}

impl From<ContainerLoad> for PackedContainer {
    fn from(load: ContainerLoad) -> Self {
        let ContainerLoad {
            container,
            placements,
            total_weight_kg,
            utilization_percent,
            warnings,
        } = load;
        Self {
            dimensions_mm: Dimensions {
                length: container.length_mm,
                width: container.width_mm,
                height: container.height_mm,
            },
            id: container.id,
            max_weight_kg: container.max_weight_kg,
            total_weight_kg,
            utilization_percent,
            placements,
            warnings,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PackResponse {
    pub containers: Vec<PackedContainer>,
    pub unplaced_items: Vec<Item>,
    pub validation_warnings: Vec<String>,
    pub is_complete: bool,
    pub summary: PackingSummary,
}

impl From<PackingRun> for PackResponse {
    fn from(run: PackingRun) -> Self {
        let is_complete = run.is_complete();
        let PackingRun {
            containers,
            unplaced,
            validation_warnings,
            summary,
        } = run;
        Self {
            containers: containers.into_iter().map(PackedContainer::from).collect(),
            unplaced_items: unplaced,
            validation_warnings,
            is_complete,
            summary,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid input data",
        details,
    )
}

fn container_config_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid container configuration",
        details,
    )
}

fn packing_error(err: PackingError) -> Response {
    match err {
        PackingError::EmptyCatalog | PackingError::InvalidContainer(_) => {
            container_config_error(err.to_string())
        }
        PackingError::InvalidItem(_)
        | PackingError::DuplicateItemId(_)
        | PackingError::DuplicateItemName(_) => {
            validation_error(err.to_string())
        }
    }
}

fn internal_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Packing failed",
        details,
    )
}

fn parse_pack_request(
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> Result<ValidatedPackRequest, Response> {
    let Json(payload) = payload.map_err(json_deserialize_error)?;

    match payload.into_validated() {
        Ok(validated) => Ok(validated),
        Err(PackRequestValidationError::MissingContainers) => Err(container_config_error(
            "At least one container must be specified",
        )),
        Err(PackRequestValidationError::InvalidContainer(err)) => {
            Err(container_config_error(err.to_string()))
        }
        Err(PackRequestValidationError::InvalidCommodity(err)) => {
            Err(validation_error(err.to_string()))
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_pack, handle_pack_stream, handle_requirements, handle_health),
    components(
        schemas(
            PackRequest,
            Commodity,
            Container,
            PackResponse,
            PackedContainer,
            Dimensions,
            Placement,
            Item,
            PackingSummary,
            RequirementsRequest,
            LoadRequirements,
            VehicleCapacity,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "packing", description = "Container loading"),
        (name = "service", description = "Service status")
    )
)]
struct ApiDoc;

/// Builds the application router with all routes and CORS.
pub fn router(optimizer_config: OptimizerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { optimizer_config };

    Router::new()
        .route("/pack", post(handle_pack))
        .route("/pack_stream", post(handle_pack_stream))
        .route("/requirements", post(handle_requirements))
        .route("/health", get(handle_health))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until the server terminates.
pub async fn start_api_server(config: ApiConfig, optimizer_config: OptimizerConfig) -> std::io::Result<()> {
    let app = router(optimizer_config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        host = config.display_host(),
        port = config.port(),
        "server listening"
    );
    if config.binds_to_all_interfaces() {
        info!("local access: http://localhost:{}", config.port());
    }
    info!("docs at http://{}:{}/docs", config.display_host(), config.port());

    axum::serve(listener, app).await
}

/// Handler for POST /pack.
///
/// Expands the commodities by quantity, packs them across the supplied
/// containers and returns the loaded containers together with anything
/// that did not fit.
#[utoipa::path(
    post,
    path = "/pack",
    request_body = PackRequest,
    responses(
        (status = 200, description = "Packing finished (possibly with unplaced items)", body = PackResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or container configuration",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> Response {
    let ValidatedPackRequest { items, containers } = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(items = items.len(), containers = containers.len(), "pack request received");
    let packing_config = state.optimizer_config.packing_config();
    let outcome =
        tokio::task::spawn_blocking(move || pack_with_config(items, containers, packing_config))
            .await;

    match outcome {
        Ok(Ok(run)) => {
            info!(
                containers = run.container_count(),
                unplaced = run.unplaced_count(),
                "pack request finished"
            );
            (StatusCode::OK, Json(PackResponse::from(run))).into_response()
        }
        Ok(Err(err)) => {
            warn!(%err, "pack request rejected");
            packing_error(err)
        }
        Err(err) => {
            error!(%err, "packing task failed");
            internal_error(err.to_string())
        }
    }
}

/// Handler for POST /pack_stream (SSE).
///
/// Streams packing events as Server-Sent Events while the layout is built.
#[utoipa::path(
    post,
    path = "/pack_stream",
    request_body = PackRequest,
    responses(
        (
            status = 200,
            description = "Streams packing events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or container configuration",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack_stream(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> Response {
    let ValidatedPackRequest { items, containers } = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (tx, rx) = mpsc::channel::<String>(32);
    let packing_config = state.optimizer_config.packing_config();

    tokio::task::spawn_blocking(move || {
        let result = pack_until_stopped(items, containers, packing_config, |evt| {
            forward_event(&tx, evt)
        });
        if let Err(err) = result {
            warn!(%err, "streamed packing rejected");
        } else if tx.is_closed() {
            info!("stream client disconnected, packing stopped");
        }
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Sends one event to the stream client. Breaks once the client has gone away.
fn forward_event(tx: &mpsc::Sender<String>, event: &PackEvent) -> ControlFlow<()> {
    if tx.is_closed() {
        return ControlFlow::Break(());
    }
    match serde_json::to_string(event) {
        Ok(json) => match tx.blocking_send(json) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        },
        Err(err) => {
            warn!(%err, "could not serialise packing event");
            ControlFlow::Continue(())
        }
    }
}

/// Handler for POST /requirements.
#[utoipa::path(
    post,
    path = "/requirements",
    request_body = RequirementsRequest,
    responses(
        (status = 200, description = "Aggregate load requirements", body = LoadRequirements),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid commodity data", body = ErrorResponse)
    ),
    tag = "packing"
)]
async fn handle_requirements(payload: Result<Json<RequirementsRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };
    match calculate_load_requirements(&request.commodities) {
        Ok(requirements) => (StatusCode::OK, Json(requirements)).into_response(),
        Err(err) => validation_error(err.to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "service"
)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
