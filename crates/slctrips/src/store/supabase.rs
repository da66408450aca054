//! PostgREST client for the hosted Supabase project.

use super::{DestinationStore, ListQuery, Page, StoreError, TripKitStore};
use crate::catalog::{
    AffiliateGear, Destination, DestinationId, Subscriber, TripKit, TripKitId, TripKitStop,
};
use crate::config::SupabaseConfig;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

const DESTINATIONS: &str = "destinations";
const TRIPKITS: &str = "tripkits";
const TRIPKIT_DESTINATIONS: &str = "tripkit_destinations";
const SUBSCRIBERS: &str = "tripkit_email_subscribers";
const AFFILIATE_GEAR: &str = "destination_affiliate_gear";

#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    rest_url: String,
}

impl SupabaseStore {
    pub fn from_config(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let credentials = config.require()?;

        let key = HeaderValue::from_str(&credentials.anon_key)
            .map_err(|err| StoreError::Unavailable(format!("invalid API key header: {err}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", credentials.anon_key))
            .map_err(|err| StoreError::Unavailable(format!("invalid API key header: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", credentials.url),
        })
    }

    fn table(&self, table: &str) -> RequestBuilder {
        self.client.get(format!("{}/{}", self.rest_url, table))
    }

    async fn rows<T: DeserializeOwned>(
        &self,
        table: &str,
        request: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        debug!(table, "supabase select");
        let response = checked(request.send().await?).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn first<T: DeserializeOwned>(
        &self,
        table: &str,
        request: RequestBuilder,
    ) -> Result<Option<T>, StoreError> {
        let rows = self.rows(table, request.query(&[("limit", "1")])).await?;
        Ok(rows.into_iter().next())
    }

    async fn destination_where(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<Destination>, StoreError> {
        let request = self
            .table(DESTINATIONS)
            .query(&[("select", "*"), (column, value)]);
        self.first(DESTINATIONS, request).await
    }
}

async fn checked(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), %body, "supabase request failed");
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Total from a `Content-Range: 0-23/120` header; `*/0` for empty results.
fn total_from_content_range(response: &Response) -> Result<usize, StoreError> {
    let header = response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| StoreError::Decode("missing Content-Range header".to_string()))?;
    parse_content_range_total(header)
}

fn parse_content_range_total(header: &str) -> Result<usize, StoreError> {
    header
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
        .ok_or_else(|| StoreError::Decode(format!("unparseable Content-Range '{header}'")))
}

/// A 400 on the id column means the value does not fit the column type
/// (integer id against a UUID column or the reverse). Only the id stage may
/// read that as a miss; every other 400 is an upstream fault.
fn rejected_id(err: &StoreError) -> bool {
    matches!(err, StoreError::Status { status: 400, .. })
}

/// Strip characters that carry meaning inside a PostgREST `or=(...)` group.
fn sanitize_pattern(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, ',' | '(' | ')' | '*' | '"' | '\\'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn search_filter(term: &str) -> String {
    let pattern = format!("*{}*", sanitize_pattern(term));
    let clauses: Vec<String> = ["name", "category", "subcategory", "short", "long"]
        .iter()
        .map(|column| format!("{column}.ilike.{pattern}"))
        .collect();
    format!("({})", clauses.join(","))
}

/// Integer ids and UUIDs are the only shapes the id column accepts.
fn id_filter(id: &DestinationId) -> Option<String> {
    match id {
        DestinationId::Int(value) => Some(format!("eq.{value}")),
        DestinationId::Text(raw) => Uuid::parse_str(raw.trim())
            .ok()
            .map(|uuid| format!("eq.{uuid}")),
    }
}

impl DestinationStore for SupabaseStore {
    async fn fetch_all(&self) -> Result<Vec<Destination>, StoreError> {
        let request = self
            .table(DESTINATIONS)
            .query(&[("select", "*"), ("order", "name.asc")]);
        self.rows(DESTINATIONS, request).await
    }

    async fn fetch_by_id(&self, id: &DestinationId) -> Result<Option<Destination>, StoreError> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };

        match self.destination_where("id", &filter).await {
            Err(err) if rejected_id(&err) => {
                debug!(%id, "supabase rejected id filter");
                Ok(None)
            }
            other => other,
        }
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<Destination>, StoreError> {
        self.destination_where("slug", &format!("eq.{slug}")).await
    }

    async fn find_by_name_fragment(&self, fragment: &str) -> Result<Option<Destination>, StoreError> {
        let pattern = sanitize_pattern(fragment);
        if pattern.is_empty() {
            return Ok(None);
        }
        self.destination_where("name", &format!("ilike.*{pattern}*"))
            .await
    }

    async fn fetch_by_category(&self, category: &str) -> Result<Vec<Destination>, StoreError> {
        let filter = format!("eq.{category}");
        let request = self.table(DESTINATIONS).query(&[
            ("select", "*"),
            ("category", filter.as_str()),
            ("order", "name.asc"),
        ]);
        self.rows(DESTINATIONS, request).await
    }

    async fn fetch_featured(&self, limit: usize) -> Result<Vec<Destination>, StoreError> {
        let limit = limit.to_string();
        let request = self.table(DESTINATIONS).query(&[
            ("select", "*"),
            ("featured", "is.true"),
            ("limit", limit.as_str()),
        ]);
        self.rows(DESTINATIONS, request).await
    }

    async fn list(&self, query: &ListQuery) -> Result<Page, StoreError> {
        let limit = query.limit().to_string();
        let offset = query.offset().to_string();
        let mut params: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("order", "name.asc".to_string()),
            ("limit", limit),
            ("offset", offset),
        ];
        if let Some(category) = query.category() {
            params.push(("category", format!("eq.{category}")));
        }
        if let Some(term) = query.search() {
            params.push(("or", search_filter(term)));
        }

        debug!(table = DESTINATIONS, ?params, "supabase page");
        let response = self
            .table(DESTINATIONS)
            .query(&params)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = checked(response).await?;
        let total = total_from_content_range(&response)?;
        let destinations = response.json::<Vec<Destination>>().await?;

        Ok(Page {
            destinations,
            total,
        })
    }

    async fn count(&self) -> Result<usize, StoreError> {
        debug!(table = DESTINATIONS, "supabase count");
        let response = self
            .table(DESTINATIONS)
            .query(&[("select", "id"), ("limit", "1")])
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = checked(response).await?;
        total_from_content_range(&response)
    }

    async fn upsert(&self, destination: Destination) -> Result<Destination, StoreError> {
        debug!(table = DESTINATIONS, id = %destination.id, "supabase upsert");
        let response = self
            .client
            .post(format!("{}/{}", self.rest_url, DESTINATIONS))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[&destination])
            .send()
            .await?;
        let rows = checked(response).await?.json::<Vec<Destination>>().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("upsert returned no rows".to_string()))
    }

    async fn affiliate_gear(&self, id: &DestinationId) -> Result<Vec<AffiliateGear>, StoreError> {
        let filter = format!("eq.{id}");
        let request = self.table(AFFILIATE_GEAR).query(&[
            ("select", "*"),
            ("destination_id", filter.as_str()),
            ("order", "display_order.asc"),
        ]);
        self.rows(AFFILIATE_GEAR, request).await
    }
}

impl TripKitStore for SupabaseStore {
    async fn fetch_tripkits(&self) -> Result<Vec<TripKit>, StoreError> {
        let request = self
            .table(TRIPKITS)
            .query(&[("select", "*"), ("order", "name.asc")]);
        self.rows(TRIPKITS, request).await
    }

    async fn fetch_tripkit_by_slug(&self, slug: &str) -> Result<Option<TripKit>, StoreError> {
        let filter = format!("eq.{slug}");
        let request = self
            .table(TRIPKITS)
            .query(&[("select", "*"), ("slug", filter.as_str())]);
        self.first(TRIPKITS, request).await
    }

    async fn fetch_tripkit_by_id(&self, id: &TripKitId) -> Result<Option<TripKit>, StoreError> {
        let filter = format!("eq.{}", id.0);
        let request = self
            .table(TRIPKITS)
            .query(&[("select", "*"), ("id", filter.as_str())]);
        match self.first(TRIPKITS, request).await {
            Err(StoreError::Status { status: 400, .. }) => Ok(None),
            other => other,
        }
    }

    async fn tripkit_stops(&self, id: &TripKitId) -> Result<Vec<TripKitStop>, StoreError> {
        let filter = format!("eq.{}", id.0);
        let request = self.table(TRIPKIT_DESTINATIONS).query(&[
            ("select", "display_order,is_preview,destination:destinations(*)"),
            ("tripkit_id", filter.as_str()),
            ("order", "display_order.asc"),
        ]);
        self.rows(TRIPKIT_DESTINATIONS, request).await
    }

    async fn upsert_subscriber(&self, subscriber: Subscriber) -> Result<(), StoreError> {
        debug!(table = SUBSCRIBERS, tripkit = %subscriber.tripkit_id.0, "supabase upsert");
        let response = self
            .client
            .post(format!("{}/{}", self.rest_url, SUBSCRIBERS))
            .query(&[("on_conflict", "email,tripkit_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[&subscriber])
            .send()
            .await?;
        checked(response).await?;
        Ok(())
    }
}
