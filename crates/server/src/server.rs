use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tokio::sync::RwLock;

use std::sync::Arc;

use crate::{expenses, fuel, imports, notifications, reminders, reports, user, vehicles};
use engine::Engine;

/// Shared handler state. The engine sits behind an async `RwLock` because it
/// caches vehicle state in memory: reads (stats, reports, alerts) take the
/// read guard, record creation takes the write guard.
#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<RwLock<Engine>>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Builds the full API router around an engine and its database.
pub fn router(engine: Engine, db: DatabaseConnection) -> Router {
    let state = ServerState {
        engine: Arc::new(RwLock::new(engine)),
        db,
    };

    Router::new()
        .route("/vehicles", get(vehicles::list).post(vehicles::create))
        .route(
            "/vehicles/{id}",
            get(vehicles::get)
                .put(vehicles::update)
                .delete(vehicles::remove),
        )
        .route("/vehicles/{id}/share", post(vehicles::share))
        .route("/vehicles/{id}/users", get(vehicles::shared_users))
        .route(
            "/vehicles/{id}/users/{username}",
            delete(vehicles::unshare),
        )
        .route("/vehicles/{id}/fuel", get(fuel::list).post(fuel::create))
        .route("/vehicles/{id}/fuel/stats", get(fuel::stats))
        .route("/fuel/{id}", put(fuel::update).delete(fuel::remove))
        .route(
            "/vehicles/{id}/expenses",
            get(expenses::list).post(expenses::create),
        )
        .route("/vehicles/{id}/expenses/stats", get(expenses::stats))
        .route(
            "/expenses/{id}",
            put(expenses::update).delete(expenses::remove),
        )
        .route(
            "/vehicles/{id}/reminders",
            get(reminders::list).post(reminders::create),
        )
        .route("/vehicles/{id}/reminders/due", get(reminders::due))
        .route(
            "/reminders/{id}",
            put(reminders::update).delete(reminders::remove),
        )
        .route("/reminders/{id}/complete", post(reminders::complete))
        .route("/reminders/check", get(reminders::check))
        .route("/reminders/overdue", get(reminders::overdue))
        .route("/notifications", get(notifications::list_unread))
        .route("/notifications/summary", get(notifications::summary))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/notifications/{id}/dismiss", post(notifications::dismiss))
        .route("/vehicles/{id}/report", get(reports::vehicle_report))
        .route("/reports/fleet", get(reports::fleet_comparison))
        .route("/export/csv", get(reports::export_csv))
        .route("/import/hammond", post(imports::hammond))
        .route("/user", get(user::get_profile).put(user::update_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, db)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
