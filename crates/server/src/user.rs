//! The users entity and the profile endpoints.
//!
//! Authentication itself happens in the router middleware; handlers receive
//! the resolved user row as a request extension.

use api_types::user::{UserUpdate, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{ServerError, server::ServerState, vehicles::map_unit_to_api};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub name: String,
    /// Display currency code; informational only, never converted.
    pub currency: String,
    /// Preferred distance unit code ("mi" or "km").
    pub units: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn get_profile(Extension(user): Extension<Model>) -> Json<UserView> {
    let units = engine::MileageUnit::try_from(user.units.as_str()).unwrap_or_default();
    Json(UserView {
        username: user.username,
        name: user.name,
        currency: user.currency,
        units: map_unit_to_api(units),
    })
}

pub async fn update_profile(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
    Json(payload): Json<UserUpdate>,
) -> Result<StatusCode, ServerError> {
    let mut active = ActiveModel {
        username: ActiveValue::Set(user.username),
        ..Default::default()
    };
    if let Some(name) = payload.name {
        active.name = ActiveValue::Set(name);
    }
    if let Some(currency) = payload.currency {
        active.currency = ActiveValue::Set(currency);
    }
    if let Some(units) = payload.units {
        active.units = ActiveValue::Set(crate::vehicles::map_unit_from_api(units).code().to_string());
    }

    active
        .update(&state.db)
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
