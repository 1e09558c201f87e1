//! Shared test support: a scripted in-memory transport.

#![allow(dead_code)]

use serde_json::{json, Value};
use soul_qobuz::{Params, QobuzError, Result, Transport};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// Replies with queued responses per endpoint and records every call.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<HashMap<String, VecDeque<Result<Value>>>>,
    calls: RefCell<Vec<(String, Params)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next call to `endpoint`.
    pub fn reply(&self, endpoint: &str, response: Value) -> &Self {
        self.push(endpoint, Ok(response))
    }

    /// Queue a transport failure for the next call to `endpoint`.
    pub fn fail(&self, endpoint: &str, status: u16) -> &Self {
        self.push(
            endpoint,
            Err(QobuzError::ServerError {
                status,
                message: "scripted failure".into(),
            }),
        )
    }

    fn push(&self, endpoint: &str, reply: Result<Value>) -> &Self {
        self.replies
            .borrow_mut()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<(String, Params)> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Params> {
        self.calls
            .borrow()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn request(&self, endpoint: &str, params: &Params) -> Result<Value> {
        self.calls
            .borrow_mut()
            .push((endpoint.to_string(), params.clone()));

        self.replies
            .borrow_mut()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("unexpected request to {endpoint}"))
    }
}

pub fn artist_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "picture": null,
        "slug": name.to_lowercase().replace(' ', "-"),
        "albums_count": 3
    })
}

pub fn album_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "tracks_count": 2,
        "media_count": 1,
        "released_at": 590709600,
        "artist": artist_json(38895, "Talk Talk"),
        "genre": {"id": 113, "name": "Rock"}
    })
}

pub fn track_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "duration": 300,
        "track_number": 1,
        "media_number": 1,
        "performer": {"id": 38895},
        "album": album_json("0060253780968", "Spirit of Eden")
    })
}

pub fn login_json() -> Value {
    json!({
        "user_auth_token": "user-token",
        "user": {"id": 1, "credential": {"id": 2}, "device": {"id": 3}}
    })
}
