//! Cloud Firestore document store (REST API v1).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{validate_item_id, NewPortalItem, PortalItem};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{ensure_success, DocumentStore, StoreError, StoreResult, TokenProvider};

/// Firestore REST endpoint.
pub const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1";

/// Collection holding portal item documents.
pub const ITEMS_COLLECTION_ID: &str = "documents";

/// Document store backed by Cloud Firestore.
///
/// Items live at `artifacts/<appId>/public/data/documents/<id>`.
#[derive(Debug, Clone)]
pub struct FirestoreDocumentStore {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
    api_url: String,
    project_id: String,
    app_id: String,
}

impl FirestoreDocumentStore {
    /// Creates a new Firestore store.
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<TokenProvider>,
        project_id: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            tokens,
            api_url: FIRESTORE_API_URL.to_string(),
            project_id: project_id.into(),
            app_id: app_id.into(),
        }
    }

    /// Overrides the API endpoint, e.g. to target an emulator.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Returns the API endpoint in use.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Resource name of the database's document root.
    pub fn database_root(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    /// Resource name of the document that owns the items collection.
    pub fn collection_parent(&self) -> String {
        format!("{}/artifacts/{}/public/data", self.database_root(), self.app_id)
    }

    /// Resource name of one item document.
    pub fn document_name(&self, id: &str) -> String {
        format!("{}/{ITEMS_COLLECTION_ID}/{id}", self.collection_parent())
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn add_item(&self, item: &NewPortalItem) -> StoreResult<String> {
        item.validate()?;

        let id = Uuid::new_v4().simple().to_string();
        let body = commit_body(&self.document_name(&id), item);
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(format!("{}/{}:commit", self.api_url, self.database_root()))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        ensure_success("firestore", response).await?;

        tracing::debug!(item_id = %id, category_id = %item.category_id, "Firestore document created");
        Ok(id)
    }

    async fn list_items(&self, category_id: &str) -> StoreResult<Vec<PortalItem>> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(format!("{}/{}:runQuery", self.api_url, self.collection_parent()))
            .bearer_auth(token)
            .json(&category_query(category_id))
            .send()
            .await?;
        let rows: Vec<RunQueryRow> = ensure_success("firestore", response).await?.json().await?;

        rows.iter()
            .filter_map(|row| row.document.as_ref())
            .map(decode_document)
            .collect()
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        validate_item_id(id)?;
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .delete(format!("{}/{}", self.api_url, self.document_name(id)))
            .bearer_auth(token)
            .send()
            .await?;

        // Firestore already treats deletes of missing documents as success.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        ensure_success("firestore", response).await?;
        Ok(())
    }
}

/// One element of a `runQuery` response stream.
#[derive(Debug, Deserialize)]
struct RunQueryRow {
    document: Option<Value>,
}

/// Builds the `commit` request inserting one item with a server timestamp.
pub fn commit_body(document_name: &str, item: &NewPortalItem) -> Value {
    json!({
        "writes": [{
            "update": {
                "name": document_name,
                "fields": encode_fields(item),
            },
            "updateTransforms": [{
                "fieldPath": "updatedAt",
                "setToServerValue": "REQUEST_TIME",
            }],
            "currentDocument": { "exists": false },
        }]
    })
}

/// Builds the structured query selecting a category's items.
pub fn category_query(category_id: &str) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": ITEMS_COLLECTION_ID }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "categoryId" },
                    "op": "EQUAL",
                    "value": { "stringValue": category_id },
                }
            }
        }
    })
}

/// Encodes an item as Firestore typed fields. Absent URLs are stored as null.
pub fn encode_fields(item: &NewPortalItem) -> Value {
    json!({
        "title": string_value(Some(&item.title)),
        "categoryId": string_value(Some(&item.category_id)),
        "userName": string_value(Some(&item.user_name)),
        "fileUrl": string_value(item.file_url.as_deref()),
        "linkUrl": string_value(item.link_url.as_deref()),
    })
}

fn string_value(value: Option<&str>) -> Value {
    match value {
        Some(text) => json!({ "stringValue": text }),
        None => json!({ "nullValue": null }),
    }
}

/// Decodes a Firestore document into an item.
pub fn decode_document(document: &Value) -> StoreResult<PortalItem> {
    let name = document
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::InvalidDocument("document has no name".to_string()))?;
    let id = name.rsplit('/').next().unwrap_or(name).to_string();

    let empty = Map::new();
    let fields = document
        .get("fields")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    Ok(PortalItem {
        title: read_string(fields, "title").unwrap_or_default(),
        category_id: read_string(fields, "categoryId").unwrap_or_default(),
        user_name: read_string(fields, "userName").unwrap_or_default(),
        file_url: read_string(fields, "fileUrl"),
        link_url: read_string(fields, "linkUrl"),
        updated_at: read_timestamp(fields, "updatedAt", &id)?,
        id,
    })
}

fn read_string(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(|value| value.get("stringValue"))
        .and_then(Value::as_str)
        .map(String::from)
}

fn read_timestamp(
    fields: &Map<String, Value>,
    key: &str,
    id: &str,
) -> StoreResult<Option<DateTime<Utc>>> {
    let Some(raw) = fields
        .get(key)
        .and_then(|value| value.get("timestampValue"))
        .and_then(Value::as_str)
    else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| Some(ts.with_timezone(&Utc)))
        .map_err(|e| StoreError::InvalidDocument(format!("{id}: bad {key} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::auth_token::tests::test_key;

    fn store() -> FirestoreDocumentStore {
        let http = reqwest::Client::new();
        let tokens = Arc::new(TokenProvider::new(test_key(), http.clone()).unwrap());
        FirestoreDocumentStore::new(http, tokens, "demo-project", "demo-app")
    }

    #[test]
    fn test_resource_names() {
        let store = store();

        assert_eq!(
            store.collection_parent(),
            "projects/demo-project/databases/(default)/documents/artifacts/demo-app/public/data"
        );
        assert_eq!(
            store.document_name("abc"),
            "projects/demo-project/databases/(default)/documents/artifacts/demo-app/public/data/documents/abc"
        );
    }

    #[tokio::test]
    async fn test_delete_rejects_ids_outside_collection() {
        // Unroutable endpoints: a request reaching the network would fail
        // with an HTTP error instead of a validation error.
        let store = store().with_api_url("http://127.0.0.1:9");

        let result = store
            .delete_item("../../../../private/data/documents/secret")
            .await;

        assert!(matches!(
            result,
            Err(StoreError::Validation(
                entities::ValidationError::InvalidItemId(_)
            ))
        ));
    }

    #[test]
    fn test_commit_body_sets_server_timestamp() {
        let item = NewPortalItem::new("T", "news", "Tester");
        let body = commit_body("projects/p/databases/(default)/documents/x/1", &item);
        let write = &body["writes"][0];

        assert_eq!(write["update"]["fields"]["title"]["stringValue"], "T");
        assert!(write["update"]["fields"]["fileUrl"]["nullValue"].is_null());
        assert!(write["update"]["fields"].get("updatedAt").is_none());
        assert_eq!(write["updateTransforms"][0]["fieldPath"], "updatedAt");
        assert_eq!(write["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
        assert_eq!(write["currentDocument"]["exists"], false);
    }

    #[test]
    fn test_category_query() {
        let query = category_query("manuals");
        let filter = &query["structuredQuery"]["where"]["fieldFilter"];

        assert_eq!(query["structuredQuery"]["from"][0]["collectionId"], "documents");
        assert_eq!(filter["field"]["fieldPath"], "categoryId");
        assert_eq!(filter["op"], "EQUAL");
        assert_eq!(filter["value"]["stringValue"], "manuals");
    }

    #[test]
    fn test_decode_document() {
        let document = json!({
            "name": "projects/p/databases/(default)/documents/artifacts/a/public/data/documents/doc42",
            "fields": {
                "title": { "stringValue": "Monthly Report" },
                "categoryId": { "stringValue": "news" },
                "userName": { "stringValue": "Tester" },
                "fileUrl": { "stringValue": "https://storage.googleapis.com/b/report.pdf" },
                "linkUrl": { "nullValue": null },
                "updatedAt": { "timestampValue": "2024-03-05T09:30:00.123456Z" },
            },
        });

        let item = decode_document(&document).unwrap();
        assert_eq!(item.id, "doc42");
        assert_eq!(item.title, "Monthly Report");
        assert_eq!(
            item.file_url.as_deref(),
            Some("https://storage.googleapis.com/b/report.pdf")
        );
        assert!(item.link_url.is_none());
        assert_eq!(
            item.updated_at.map(|ts| ts.date_naive()),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap().date_naive())
        );
    }

    #[test]
    fn test_decode_document_without_timestamp() {
        let document = json!({
            "name": "projects/p/databases/(default)/documents/x/doc1",
            "fields": { "title": { "stringValue": "Pending" } },
        });

        let item = decode_document(&document).unwrap();
        assert!(item.updated_at.is_none());
        assert!(item.file_url.is_none());
        assert_eq!(item.category_id, "");
    }

    #[test]
    fn test_decode_document_requires_name() {
        assert!(matches!(
            decode_document(&json!({ "fields": {} })),
            Err(StoreError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        let document = json!({
            "name": "x/doc1",
            "fields": { "updatedAt": { "timestampValue": "yesterday" } },
        });
        assert!(decode_document(&document).is_err());
    }
}
