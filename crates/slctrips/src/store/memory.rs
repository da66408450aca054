use super::{DestinationStore, ListQuery, Page, StoreError, TripKitStore};
use crate::catalog::{
    filters, sort_destinations, AffiliateGear, Destination, DestinationId, SortKey, Subscriber,
    TripKit, TripKitId, TripKitStop,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    destinations: Vec<Destination>,
    gear: HashMap<DestinationId, Vec<AffiliateGear>>,
    tripkits: Vec<TripKit>,
    stops: HashMap<TripKitId, Vec<TripKitStop>>,
    subscribers: Vec<Subscriber>,
}

/// Process-local store backed by fixture data. Mirrors the hosted store's
/// semantics so handlers and the CLI can run without a database.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables {
                destinations,
                ..Tables::default()
            })),
        }
    }

    pub fn with_gear(self, id: DestinationId, gear: Vec<AffiliateGear>) -> Result<Self, StoreError> {
        self.write()?.gear.insert(id, gear);
        Ok(self)
    }

    pub fn with_tripkit(
        self,
        tripkit: TripKit,
        stops: Vec<TripKitStop>,
    ) -> Result<Self, StoreError> {
        {
            let mut tables = self.write()?;
            tables.stops.insert(tripkit.id.clone(), stops);
            tables.tripkits.push(tripkit);
        }
        Ok(self)
    }

    pub fn subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        Ok(self.read()?.subscribers.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn find(&self, predicate: impl Fn(&Destination) -> bool) -> Result<Option<Destination>, StoreError> {
        Ok(self
            .read()?
            .destinations
            .iter()
            .find(|destination| predicate(destination))
            .cloned())
    }
}

impl DestinationStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Destination>, StoreError> {
        Ok(self.read()?.destinations.clone())
    }

    async fn fetch_by_id(&self, id: &DestinationId) -> Result<Option<Destination>, StoreError> {
        self.find(|destination| &destination.id == id)
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<Destination>, StoreError> {
        self.find(|destination| destination.slug.as_deref() == Some(slug))
    }

    async fn find_by_name_fragment(&self, fragment: &str) -> Result<Option<Destination>, StoreError> {
        let needle = fragment.to_lowercase();
        self.find(|destination| destination.name.to_lowercase().contains(&needle))
    }

    async fn fetch_by_category(&self, category: &str) -> Result<Vec<Destination>, StoreError> {
        let tables = self.read()?;
        Ok(filters::by_category(&tables.destinations, Some(category)))
    }

    async fn fetch_featured(&self, limit: usize) -> Result<Vec<Destination>, StoreError> {
        Ok(self
            .read()?
            .destinations
            .iter()
            .filter(|destination| destination.featured)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page, StoreError> {
        let tables = self.read()?;
        let matched = filters::search(&tables.destinations, query.search().unwrap_or_default());
        let matched = filters::by_category(&matched, query.category());
        let total = matched.len();

        let destinations = sort_destinations(&matched, SortKey::NameAsc)
            .into_iter()
            .skip(query.offset())
            .take(query.limit())
            .collect();

        Ok(Page {
            destinations,
            total,
        })
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.destinations.len())
    }

    async fn upsert(&self, destination: Destination) -> Result<Destination, StoreError> {
        let mut tables = self.write()?;
        match tables
            .destinations
            .iter()
            .position(|existing| existing.id == destination.id)
        {
            Some(index) => tables.destinations[index] = destination.clone(),
            None => tables.destinations.push(destination.clone()),
        }
        Ok(destination)
    }

    async fn affiliate_gear(&self, id: &DestinationId) -> Result<Vec<AffiliateGear>, StoreError> {
        Ok(self.read()?.gear.get(id).cloned().unwrap_or_default())
    }
}

impl TripKitStore for MemoryStore {
    async fn fetch_tripkits(&self) -> Result<Vec<TripKit>, StoreError> {
        Ok(self.read()?.tripkits.clone())
    }

    async fn fetch_tripkit_by_slug(&self, slug: &str) -> Result<Option<TripKit>, StoreError> {
        Ok(self
            .read()?
            .tripkits
            .iter()
            .find(|tripkit| tripkit.slug == slug)
            .cloned())
    }

    async fn fetch_tripkit_by_id(&self, id: &TripKitId) -> Result<Option<TripKit>, StoreError> {
        Ok(self
            .read()?
            .tripkits
            .iter()
            .find(|tripkit| &tripkit.id == id)
            .cloned())
    }

    async fn tripkit_stops(&self, id: &TripKitId) -> Result<Vec<TripKitStop>, StoreError> {
        let mut stops = self.read()?.stops.get(id).cloned().unwrap_or_default();
        stops.sort_by_key(|stop| stop.display_order);
        Ok(stops)
    }

    async fn upsert_subscriber(&self, subscriber: Subscriber) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        match tables.subscribers.iter().position(|existing| {
            existing.email == subscriber.email && existing.tripkit_id == subscriber.tripkit_id
        }) {
            Some(index) => tables.subscribers[index] = subscriber,
            None => tables.subscribers.push(subscriber),
        }
        Ok(())
    }
}
