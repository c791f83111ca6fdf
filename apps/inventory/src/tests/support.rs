//! In-memory [`LaptopService`] shared by the page and rendering tests.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use client_core::{ClientError, LaptopService, Result};
use serde_json::{json, Value};
use shared::{
    domain::{LaptopId, LaptopRecord},
    draft::LaptopDraft,
};

pub(crate) const TTL: Duration = Duration::from_secs(3);

#[derive(Default)]
struct Store {
    next_id: i64,
    laptops: Vec<LaptopRecord>,
}

/// In-memory laptops collection that records every call it receives.
#[derive(Default)]
pub(crate) struct FakeInventory {
    store: Mutex<Store>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<ClientError>>,
}

impl FakeInventory {
    pub(crate) fn seeded(laptops: Vec<LaptopRecord>) -> Arc<Self> {
        let next_id = laptops.len() as i64;
        Arc::new(Self {
            store: Mutex::new(Store { next_id, laptops }),
            ..Self::default()
        })
    }

    pub(crate) fn fail_with(&self, err: ClientError) {
        *self.failure.lock().expect("failure lock") = Some(err);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn laptops(&self) -> Vec<LaptopRecord> {
        self.store.lock().expect("store lock").laptops.clone()
    }

    fn enter(&self, call: String) -> Result<()> {
        self.calls.lock().expect("calls lock").push(call);
        match self.failure.lock().expect("failure lock").clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LaptopService for FakeInventory {
    async fn list_all(&self) -> Result<Vec<LaptopRecord>> {
        self.enter("list".into())?;
        Ok(self.laptops())
    }

    async fn get_by_id(&self, id: &LaptopId) -> Result<LaptopRecord> {
        self.enter(format!("get {id}"))?;
        self.laptops()
            .into_iter()
            .find(|laptop| laptop.id.as_ref() == Some(id))
            .ok_or_else(|| ClientError::NotFound {
                id: id.clone(),
                detail: "Request failed with status code 404".into(),
            })
    }

    async fn create(&self, draft: &LaptopDraft) -> Result<LaptopRecord> {
        draft.validate()?;
        self.enter("create".into())?;
        let mut store = self.store.lock().expect("store lock");
        store.next_id += 1;
        let record = LaptopRecord {
            id: Some(LaptopId::Number(store.next_id)),
            ..draft.to_record()
        };
        store.laptops.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &LaptopId, record: &LaptopRecord) -> Result<LaptopRecord> {
        self.enter(format!("update {id}"))?;
        let mut store = self.store.lock().expect("store lock");
        let slot = store
            .laptops
            .iter_mut()
            .find(|laptop| laptop.id.as_ref() == Some(id))
            .ok_or_else(|| ClientError::UpdateFailed {
                detail: "Request failed with status code 404".into(),
            })?;
        *slot = LaptopRecord {
            id: Some(id.clone()),
            ..record.clone()
        };
        Ok(slot.clone())
    }

    async fn remove(&self, id: &LaptopId) -> Result<Value> {
        self.enter(format!("remove {id}"))?;
        let mut store = self.store.lock().expect("store lock");
        let before = store.laptops.len();
        store.laptops.retain(|laptop| laptop.id.as_ref() != Some(id));
        if store.laptops.len() == before {
            return Err(ClientError::DeleteFailed {
                detail: "Laptop not found".into(),
            });
        }
        Ok(json!({ "message": "Laptop deleted" }))
    }
}

pub(crate) fn laptop(id: i64, brand: &str, model: &str) -> LaptopRecord {
    LaptopRecord {
        id: Some(LaptopId::Number(id)),
        brand: brand.into(),
        model: model.into(),
        price: 1299.0,
        ram: 16,
        storage: 512,
        stock_quantity: 4,
        ..LaptopRecord::default()
    }
}

pub(crate) fn two_laptops() -> Arc<FakeInventory> {
    FakeInventory::seeded(vec![laptop(1, "Dell", "XPS 13"), laptop(2, "Apple", "MacBook Air")])
}
