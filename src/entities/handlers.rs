//! Generic CRUD handlers for catalog records
//!
//! Reads are public and localised through `?lang=`. Mutations run in a fixed
//! order: identity (401), payload validation (400), store ownership (403),
//! record lookup (404), reference checks, then the store call.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

use crate::core::entity::operation_tag;
use crate::core::error::{EntityError, OperationContext, RequestError, ShopResult};
use crate::core::extractors::{Authenticated, parse_uuid};
use crate::core::query::{HasLang, LangQuery};
use crate::core::validation::Validated;
use crate::entities::resource::{Resource, find_in_store};
use crate::server::host::ServerHost;

fn invalid_query(rejection: QueryRejection) -> RequestError {
    RequestError::InvalidQuery {
        message: rejection.body_text(),
    }
}

/// `GET /api/{store_id}/{plural}`
pub async fn list_records<T: Resource>(
    State(host): State<Arc<ServerHost>>,
    Path(store_id): Path<String>,
    query: Result<Query<T::ListQuery>, QueryRejection>,
) -> ShopResult<Json<Vec<Value>>> {
    let tag = operation_tag::<T>("GET");
    let Query(query) = query.map_err(invalid_query)?;
    let store_id = parse_uuid("Store id", &store_id)?;
    let lang = query.lang();

    let records = T::list_records(&host.catalog, store_id, &query).await?;

    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(record.present(&host.catalog, lang).await.operation(&tag)?);
    }

    Ok(Json(out))
}

/// `GET /api/{store_id}/{plural}/{id}`
pub async fn get_record<T: Resource>(
    State(host): State<Arc<ServerHost>>,
    Path((store_id, id)): Path<(String, String)>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> ShopResult<Json<Value>> {
    let tag = operation_tag::<T>("GET");
    let Query(query) = query.map_err(invalid_query)?;
    let store_id = parse_uuid("Store id", &store_id)?;
    let id = parse_uuid(&id_label::<T>(), &id)?;

    let record = find_in_store(T::service(&host.catalog), store_id, id)
        .await
        .operation(&tag)?
        .ok_or_else(|| EntityError::not_found(T::resource_name_singular(), id))?;

    let body = record
        .present(&host.catalog, query.lang)
        .await
        .operation(&tag)?;
    Ok(Json(body))
}

/// `POST /api/{store_id}/{plural}`
pub async fn create_record<T: Resource>(
    State(host): State<Arc<ServerHost>>,
    Path(store_id): Path<String>,
    user: Authenticated,
    Validated(payload): Validated<T::Payload>,
) -> ShopResult<(StatusCode, Json<T>)> {
    let tag = operation_tag::<T>("POST");
    let store_id = parse_uuid("Store id", &store_id)?;
    host.require_store_owner(&store_id, &user).await?;

    T::check_references(&host.catalog, store_id, &payload).await?;

    let record = T::create_from(store_id, payload);
    let created = T::service(&host.catalog)
        .create(record)
        .await
        .operation(&tag)?;

    tracing::info!(
        resource = T::resource_name_singular(),
        id = %created.id(),
        store_id = %store_id,
        "record created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PATCH /api/{store_id}/{plural}/{id}`
pub async fn update_record<T: Resource>(
    State(host): State<Arc<ServerHost>>,
    Path((store_id, id)): Path<(String, String)>,
    user: Authenticated,
    Validated(payload): Validated<T::Payload>,
) -> ShopResult<Json<T>> {
    let tag = operation_tag::<T>("PATCH");
    let store_id = parse_uuid("Store id", &store_id)?;
    let id = parse_uuid(&id_label::<T>(), &id)?;
    host.require_store_owner(&store_id, &user).await?;

    let service = T::service(&host.catalog);
    let mut record = find_in_store(service, store_id, id)
        .await
        .operation(&tag)?
        .ok_or_else(|| EntityError::not_found(T::resource_name_singular(), id))?;

    T::check_references(&host.catalog, store_id, &payload).await?;

    record.apply_update(payload);
    record.touch();
    let updated = service.update(&id, record).await.operation(&tag)?;

    tracing::info!(
        resource = T::resource_name_singular(),
        id = %id,
        store_id = %store_id,
        "record updated"
    );
    Ok(Json(updated))
}

/// `DELETE /api/{store_id}/{plural}/{id}`, answering with the removed record
pub async fn delete_record<T: Resource>(
    State(host): State<Arc<ServerHost>>,
    Path((store_id, id)): Path<(String, String)>,
    user: Authenticated,
) -> ShopResult<Json<T>> {
    let tag = operation_tag::<T>("DELETE");
    let store_id = parse_uuid("Store id", &store_id)?;
    let id = parse_uuid(&id_label::<T>(), &id)?;
    host.require_store_owner(&store_id, &user).await?;

    let service = T::service(&host.catalog);
    let record = find_in_store(service, store_id, id)
        .await
        .operation(&tag)?
        .ok_or_else(|| EntityError::not_found(T::resource_name_singular(), id))?;

    record.check_unreferenced(&host.catalog).await?;

    let deleted = service
        .delete(&id)
        .await
        .operation(&tag)?
        .ok_or_else(|| EntityError::not_found(T::resource_name_singular(), id))?;

    tracing::info!(
        resource = T::resource_name_singular(),
        id = %id,
        store_id = %store_id,
        "record deleted"
    );
    Ok(Json(deleted))
}

/// "Billboard id", "Category id", ...
fn id_label<T: Resource>() -> String {
    let singular = T::resource_name_singular();
    let mut chars = singular.chars();
    match chars.next() {
        Some(first) => format!("{}{} id", first.to_uppercase(), chars.as_str()),
        None => "Id".to_string(),
    }
}
