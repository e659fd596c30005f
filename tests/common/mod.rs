//! Shared fixtures for the integration specs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use block_schedule::aggregate::{parse_items, Aggregator, ResourceSource, RetrievalError};
use block_schedule::config::default_resources;
use block_schedule::models::{DayCode, Item};
use block_schedule::state::ScheduleController;
use reqwest::StatusCode;
use tokio::sync::{Notify, Semaphore};

/// Scripted outcome for one locator.
#[derive(Debug, Clone)]
pub enum Script {
    Items(Vec<Item>),
    Status(u16),
    Garbage,
}

/// In-memory resource source with per-locator delays and outcomes.
///
/// Unscripted locators answer 404.
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, (Duration, Script)>>,
    calls: AtomicUsize,
    started: Notify,
    gate: Option<Semaphore>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            gate: None,
        }
    }

    /// Every resource returns `{title: "T{n}", artist: "Art{n}"}`.
    pub fn one_item_each() -> Self {
        let source = Self::new();
        for (i, locator) in default_resources().iter().enumerate() {
            let n = i + 1;
            source.set(
                locator,
                0,
                Script::Items(vec![item(&format!("T{}", n), &format!("Art{}", n))]),
            );
        }
        source
    }

    /// Hold every fetch until [`ScriptedSource::open_gate`] is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn set(&self, locator: &str, delay_ms: u64, script: Script) {
        self.scripts
            .lock()
            .unwrap()
            .insert(locator.to_string(), (Duration::from_millis(delay_ms), script));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(64);
        }
    }
}

#[async_trait]
impl ResourceSource for ScriptedSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<Item>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }

        let scripted = self.scripts.lock().unwrap().get(locator).cloned();
        let (delay, script) = scripted.unwrap_or((Duration::ZERO, Script::Status(404)));
        tokio::time::sleep(delay).await;

        match script {
            Script::Items(items) => Ok(items),
            Script::Status(code) => Err(RetrievalError::Status {
                locator: locator.to_string(),
                status: StatusCode::from_u16(code).unwrap(),
            }),
            Script::Garbage => parse_items(locator, b"<html>not json</html>"),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

pub fn item(title: &str, artist: &str) -> Item {
    Item {
        title: Some(title.into()),
        artist: Some(artist.into()),
        ..Default::default()
    }
}

pub fn aggregator(source: &Arc<ScriptedSource>) -> Aggregator {
    let source: Arc<dyn ResourceSource> = source.clone();
    Aggregator::new(source, default_resources())
}

pub fn controller(source: &Arc<ScriptedSource>) -> ScheduleController {
    ScheduleController::new(aggregator(source), DayCode::A)
}

pub fn titles(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.title.as_ref().map(|t| t.to_string()).unwrap_or_default())
        .collect()
}
