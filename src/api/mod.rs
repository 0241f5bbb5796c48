//! Resource clients: typed list/get/create/update/delete over a
//! [`Transport`], with responses cached and invalidated by tag.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::cache::{Envelope, QueryCache, QueryKind, Refetch, Tag};
use crate::domain::types::TypeConstraintError;
use crate::permissions::ResourceKind;
use crate::transport::{ApiError, ApiRequest, ApiResult, Transport};

pub mod resources;

/// Page size used when a screen needs every row of a small lookup table.
pub const OPTIONS_PAGE_SIZE: u32 = 500;

/// Resource-specific query parameters appended to list requests.
pub trait ListFilter: Clone + Debug + Default + PartialEq {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

impl ListFilter for () {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Declarative description of one backend resource.
pub trait Resource {
    type Id: Copy + Debug + Into<i32> + TryFrom<i32, Error = TypeConstraintError>;
    type Entity: DeserializeOwned + Serialize + Clone + Debug;
    type Payload: Serialize;
    type Filter: ListFilter;

    /// Collection path, e.g. `/zones`.
    const PATH: &'static str;
    /// Cache tag type shared by every query of the resource.
    const TAG: &'static str;
    /// Human label used in notifications, e.g. `Zone`.
    const LABEL: &'static str;
    const KIND: ResourceKind;
    /// Wrapping of `GET {PATH}/{id}` responses.
    const ENVELOPE: Envelope;
}

/// Parameters of a list query. `page` is 1-based.
#[derive(Clone, Debug, PartialEq)]
pub struct ListParams<F> {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub filter: F,
}

impl<F: ListFilter> ListParams<F> {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            search: None,
            filter: F::default(),
        }
    }

    /// Sets the search term; blank terms are dropped.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into().trim().to_string();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    pub fn filter(mut self, filter: F) -> Self {
        self.filter = filter;
        self
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.page == 0 {
            return Err(ApiError::InvalidParams("page must be at least 1".to_string()));
        }
        if self.size == 0 {
            return Err(ApiError::InvalidParams("size must be positive".to_string()));
        }
        Ok(())
    }

    /// `GET {path}?page=..&size=..[&search=..][&filters..]`
    pub fn to_request(&self, path: &str) -> ApiRequest {
        let mut request = ApiRequest::get(path)
            .query("page", self.page.to_string())
            .query("size", self.size.to_string());
        if let Some(search) = &self.search {
            request = request.query("search", search.clone());
        }
        for (key, value) in self.filter.query_pairs() {
            request = request.query(key, value);
        }
        request
    }
}

/// Pagination metadata. Only `total` is guaranteed after normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<u64>,
}

/// Uniform list response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<E> {
    pub data: Vec<E>,
    pub meta: PageMeta,
}

impl<E> Default for Page<E> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::default(),
        }
    }
}

/// Brings any list response into the `{data: [...], meta: {total, ...}}` shape.
///
/// * a bare array becomes `{data: array, meta: {total: len}}`;
/// * a missing or `null` `data` becomes an empty list;
/// * a missing `meta` gets `total` set to the number of rows;
/// * anything else becomes an empty page.
pub fn normalize_page(value: Value) -> Value {
    match value {
        Value::Array(rows) => {
            let total = rows.len();
            json!({"data": rows, "meta": {"total": total}})
        }
        Value::Object(mut object) => {
            let rows = match object.remove("data") {
                Some(Value::Array(rows)) => rows,
                _ => Vec::new(),
            };
            let meta = match object.remove("meta") {
                Some(Value::Object(mut meta)) => {
                    if !meta.get("total").is_some_and(Value::is_u64) {
                        meta.insert("total".to_string(), json!(rows.len()));
                    }
                    Value::Object(meta)
                }
                _ => json!({"total": rows.len()}),
            };
            json!({"data": rows, "meta": meta})
        }
        _ => json!({"data": [], "meta": {"total": 0}}),
    }
}

/// Unwraps a single-entity response according to `envelope`.
///
/// `None` stands for "not found": a JSON `null`, a `{data: null}` wrapper or a
/// `Data` envelope without `data`.
pub fn normalize_entity(value: Value, envelope: Envelope) -> Option<Value> {
    let entity = match (envelope, value) {
        (Envelope::Data, Value::Object(mut object)) => object.remove("data")?,
        (Envelope::Data, _) => return None,
        (Envelope::Bare, value) => value,
    };
    (!entity.is_null()).then_some(entity)
}

fn normalize(kind: QueryKind, value: Value) -> Value {
    match kind {
        QueryKind::List { .. } => normalize_page(value),
        QueryKind::Item { envelope, .. } => normalize_entity(value, envelope).unwrap_or(Value::Null),
    }
}

/// Client for every resource, sharing a single transport and query cache.
pub struct ApiClient<T> {
    transport: T,
    cache: QueryCache,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: QueryCache::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Lists one page of `R`, served from cache when the entry is fresh.
    pub fn list<R: Resource>(&mut self, params: &ListParams<R::Filter>) -> ApiResult<Page<R::Entity>> {
        params.validate()?;
        let request = params.to_request(R::PATH);
        let value = self.query(request, QueryKind::List { tag: R::TAG })?;
        serde_json::from_value(value).map_err(ApiError::from)
    }

    /// First page of `R` with [`OPTIONS_PAGE_SIZE`] rows, for dropdowns.
    pub fn options<R: Resource>(&mut self) -> ApiResult<Vec<R::Entity>> {
        let params = ListParams::new(1, OPTIONS_PAGE_SIZE);
        Ok(self.list::<R>(&params)?.data)
    }

    /// Fetches a single entity; `Ok(None)` when the backend has none.
    pub fn get_by_id<R: Resource>(&mut self, id: R::Id) -> ApiResult<Option<R::Entity>> {
        let id: i32 = id.into();
        let request = ApiRequest::get(format!("{}/{id}", R::PATH));
        let kind = QueryKind::Item {
            tag: R::TAG,
            id,
            envelope: R::ENVELOPE,
        };
        match self.query(request, kind)? {
            Value::Null => Ok(None),
            value => serde_json::from_value(value).map(Some).map_err(ApiError::from),
        }
    }

    /// `POST {PATH}/add`; invalidates the resource's list queries.
    pub fn create<R: Resource>(&mut self, payload: &R::Payload) -> ApiResult<Option<R::Entity>> {
        let request = ApiRequest::post(format!("{}/add", R::PATH), serde_json::to_value(payload)?);
        let value = self.mutate(&request, &[Tag::List(R::TAG)])?;
        Ok(decode_mutation::<R>(value))
    }

    /// `PUT {PATH}/update/{id}`; invalidates the entity and the list queries.
    pub fn update<R: Resource>(&mut self, id: R::Id, payload: &R::Payload) -> ApiResult<Option<R::Entity>> {
        let id: i32 = id.into();
        let request = ApiRequest::put(
            format!("{}/update/{id}", R::PATH),
            serde_json::to_value(payload)?,
        );
        let value = self.mutate(&request, &[Tag::Id(R::TAG, id), Tag::List(R::TAG)])?;
        Ok(decode_mutation::<R>(value))
    }

    /// `DELETE {PATH}/{id}`; returns the backend's `success` flag and
    /// invalidates the entity and list queries only when it is set.
    pub fn delete<R: Resource>(&mut self, id: R::Id) -> ApiResult<bool> {
        let id: i32 = id.into();
        let request = ApiRequest::delete(format!("{}/{id}", R::PATH));
        let value = self.transport.send(&request)?;
        let success = value
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        // A refused delete changed nothing on the backend.
        if success {
            self.invalidate(&[Tag::Id(R::TAG, id), Tag::List(R::TAG)]);
        }
        Ok(success)
    }

    /// Sends a write and invalidates `invalidates` once it succeeds.
    ///
    /// Failed writes leave the cache untouched.
    pub fn mutate(&mut self, request: &ApiRequest, invalidates: &[Tag]) -> ApiResult<Value> {
        let value = self.transport.send(request)?;
        self.invalidate(invalidates);
        Ok(value)
    }

    /// Marks entries stale and re-executes the subscribed ones.
    pub fn invalidate(&mut self, tags: &[Tag]) {
        for Refetch { request, kind } in self.cache.invalidate(tags) {
            match self.transport.send(&request) {
                Ok(value) => {
                    let value = normalize(kind, value);
                    self.cache.insert(request, kind, value);
                }
                Err(err) => {
                    log::warn!("Refetch of {} failed: {err}", request.cache_key());
                }
            }
        }
    }

    /// Subscribed queries refetch as soon as one of their tags is invalidated.
    pub fn subscribe(&mut self, request: &ApiRequest) {
        self.cache.subscribe(&request.cache_key());
    }

    /// Drops one subscription; the cached response goes with the last one.
    pub fn unsubscribe(&mut self, request: &ApiRequest) {
        self.cache.unsubscribe(&request.cache_key());
    }

    fn query(&mut self, request: ApiRequest, kind: QueryKind) -> ApiResult<Value> {
        let key = request.cache_key();
        if let Some(value) = self.cache.fresh(&key) {
            log::debug!("cache hit {key}");
            return Ok(value.clone());
        }
        log::debug!("cache miss {key}");

        let value = normalize(kind, self.transport.send(&request)?);
        self.cache.insert(request, kind, value.clone());
        Ok(value)
    }
}

/// Decodes the entity a write returned, if it can be decoded at all.
fn decode_mutation<R: Resource>(value: Value) -> Option<R::Entity> {
    let entity = normalize_entity(value, R::ENVELOPE)?;
    match serde_json::from_value(entity) {
        Ok(entity) => Some(entity),
        Err(err) => {
            log::debug!("{} write returned an undecodable body: {err}", R::LABEL);
            None
        }
    }
}
