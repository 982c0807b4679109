use crate::models::EventRecord;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Number, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Firestore
#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or security rules deny access")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection IDs in Firestore
#[derive(Debug, Clone)]
pub struct FirestoreCollections {
    pub events: String,
}

/// Firestore REST client
///
/// Read-only access to the site's document database. Documents come back
/// with typed values (`stringValue`, `doubleValue`, ...) which are decoded
/// into plain JSON before deserializing into domain records.
pub struct FirestoreClient {
    base_url: String,
    api_key: Option<String>,
    project_id: String,
    database_id: String,
    page_size: u32,
    client: Client,
    collections: FirestoreCollections,
}

/// One page of a collection listing
#[derive(Debug, Default)]
pub struct DocumentPage {
    pub documents: Vec<Value>,
    pub next_page_token: Option<String>,
}

impl FirestoreClient {
    /// Create a new Firestore client
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        project_id: String,
        database_id: String,
        page_size: u32,
        collections: FirestoreCollections,
    ) -> Result<Self, FirestoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            project_id,
            database_id,
            page_size: page_size.max(1),
            client,
            collections,
        })
    }

    pub fn collections(&self) -> &FirestoreCollections {
        &self.collections
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database_id,
            collection
        )
    }

    /// Fetch every event, ordered by start date
    pub async fn list_events(&self) -> Result<Vec<EventRecord>, FirestoreError> {
        let documents = self
            .list_documents(&self.collections.events, Some("startDate"))
            .await?;
        let total = documents.len();

        let events: Vec<EventRecord> = documents
            .into_iter()
            .filter_map(|doc| {
                let Some(data) = decode_document(&doc) else {
                    tracing::warn!("Skipping event document without a name");
                    return None;
                };
                match serde_json::from_value::<EventRecord>(data) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        tracing::warn!("Skipping malformed event document: {}", e);
                        None
                    }
                }
            })
            .collect();

        tracing::debug!("Loaded {} events ({} documents)", events.len(), total);

        Ok(events)
    }

    /// List all raw documents of a collection, following page tokens
    pub async fn list_documents(
        &self,
        collection: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<Value>, FirestoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .fetch_page(collection, order_by, page_token.as_deref())
                .await?;
            documents.extend(page.documents);

            match page.next_page_token {
                Some(token) if page_token.as_deref() != Some(token.as_str()) => {
                    page_token = Some(token)
                }
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn fetch_page(
        &self,
        collection: &str,
        order_by: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<DocumentPage, FirestoreError> {
        let mut params = vec![format!("pageSize={}", self.page_size)];
        if let Some(field) = order_by {
            params.push(format!("orderBy={}", urlencoding::encode(field)));
        }
        if let Some(token) = page_token {
            params.push(format!("pageToken={}", urlencoding::encode(token)));
        }
        if let Some(key) = &self.api_key {
            params.push(format!("key={}", urlencoding::encode(key)));
        }

        let url = format!("{}?{}", self.collection_url(collection), params.join("&"));

        tracing::debug!("Fetching {} page (token: {:?})", collection, page_token);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FirestoreError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to list {}: {} - {}", collection, status, body);
            return Err(FirestoreError::ApiError(format!(
                "Failed to list {}: {}",
                collection, status
            )));
        }

        let json: Value = response.json().await?;
        parse_page(json)
    }
}

/// Split a list response into documents and the next page token
///
/// An empty collection comes back as `{}`.
pub fn parse_page(json: Value) -> Result<DocumentPage, FirestoreError> {
    let mut object = match json {
        Value::Object(object) => object,
        _ => return Err(FirestoreError::InvalidResponse("Expected a JSON object".into())),
    };

    let documents = match object.remove("documents") {
        Some(Value::Array(docs)) => docs,
        None | Some(Value::Null) => Vec::new(),
        Some(_) => {
            return Err(FirestoreError::InvalidResponse("documents is not an array".into()))
        }
    };

    let next_page_token = object
        .remove("nextPageToken")
        .and_then(|t| t.as_str().map(str::to_string))
        .filter(|t| !t.is_empty());

    Ok(DocumentPage {
        documents,
        next_page_token,
    })
}

/// Turn a Firestore document into a plain JSON object with an `id` field
///
/// Returns `None` when the document has no `name`.
pub fn decode_document(doc: &Value) -> Option<Value> {
    let name = doc.get("name")?.as_str()?;
    let id = name.rsplit('/').next().unwrap_or(name).to_string();

    let mut data = match doc.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields),
        _ => Map::new(),
    };
    data.insert("id".to_string(), Value::String(id));

    Some(Value::Object(data))
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// Decode a single typed Firestore value
pub fn decode_value(value: &Value) -> Value {
    let Some(object) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
        // int64 travels as a string
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(n) => Value::Number(n.clone()),
            _ => Value::Null,
        },
        // NaN and infinities arrive as strings and have no JSON form
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => {
            let mut point = Map::new();
            for axis in ["latitude", "longitude"] {
                let v = inner
                    .get(axis)
                    .and_then(Value::as_f64)
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::from(0.0));
                point.insert(axis.to_string(), v);
            }
            Value::Object(point)
        }
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        other => {
            tracing::trace!("Unknown Firestore value type: {}", other);
            Value::Null
        }
    }
}
