use super::destination::Destination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripKitId(pub String);

/// Themed guide. A price of zero marks the kit as free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripKit {
    pub id: TripKitId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub sections: Vec<TripKitSection>,
}

impl TripKit {
    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripKitSection {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Destination linked into a kit with its position and preview flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripKitStop {
    pub destination: Destination,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_preview: bool,
}

/// Kit as served to an anonymous visitor: paid kits expose preview stops only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripKitView {
    #[serde(flatten)]
    pub tripkit: TripKit,
    pub destinations: Vec<Destination>,
    pub total_destinations: usize,
    pub full_access: bool,
}

impl TripKitView {
    pub fn new(tripkit: TripKit, mut stops: Vec<TripKitStop>) -> Self {
        stops.sort_by_key(|stop| stop.display_order);
        let total_destinations = stops.len();
        let full_access = tripkit.is_free();

        let destinations = stops
            .into_iter()
            .filter(|stop| full_access || stop.is_preview)
            .map(|stop| stop.destination)
            .collect();

        Self {
            tripkit,
            destinations,
            total_destinations,
            full_access,
        }
    }
}

/// Inbound email capture payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tripkit_id: Option<String>,
    #[serde(default)]
    pub consent_given: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Row written to the subscriber table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub tripkit_id: TripKitId,
    pub consent_given: bool,
    pub consent_at: DateTime<Utc>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    #[error("email, tripkit_id and consent_given are required")]
    MissingFields,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("consent must be given before subscribing")]
    ConsentRequired,
}

impl SubscribeRequest {
    /// Enforce the consent gate and normalise the email address.
    pub fn into_subscriber(self, now: DateTime<Utc>) -> Result<Subscriber, SubscriptionError> {
        let email = self
            .email
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .ok_or(SubscriptionError::MissingFields)?;
        let tripkit_id = self
            .tripkit_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(SubscriptionError::MissingFields)?;
        let consent_given = self.consent_given.ok_or(SubscriptionError::MissingFields)?;

        if !is_valid_email(&email) {
            return Err(SubscriptionError::InvalidEmail(email));
        }
        if !consent_given {
            return Err(SubscriptionError::ConsentRequired);
        }

        Ok(Subscriber {
            email,
            tripkit_id: TripKitId(tripkit_id),
            consent_given,
            consent_at: now,
            name: self.name.filter(|name| !name.trim().is_empty()),
            source: self.source,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub tripkit_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
