//! Session state owned by one agent
//!
//! [`SessionState`] types the fields this crate reasons about and keeps every
//! other persisted field in an opaque `content` map so it survives reads,
//! writes and clones verbatim. Content keys never shadow a typed field.

use crate::error::ReservedKeyError;
use cgo_identity::AgentIdentity;
use chrono::{DateTime, Utc};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Generation phase of an agent
///
/// Persisted as its numeric code (`0` is `Idle`). Snake-case names are
/// accepted on read as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DevState {
    /// Nothing running; the phase every new session starts in
    #[default]
    Idle = 0,
    /// Planning the next phase
    PhaseGenerating = 1,
    /// Implementing a planned phase
    PhaseImplementing = 2,
    /// Reviewing generated code
    Reviewing = 3,
    /// Regenerating individual files
    FileRegenerating = 4,
    /// Wrapping up
    Finalizing = 5,
}

impl DevState {
    /// Phase a fresh or cloned session starts in
    pub const INITIAL: DevState = DevState::Idle;

    const ALL: [DevState; 6] = [
        DevState::Idle,
        DevState::PhaseGenerating,
        DevState::PhaseImplementing,
        DevState::Reviewing,
        DevState::FileRegenerating,
        DevState::Finalizing,
    ];

    /// Check if this is the initial phase
    #[inline]
    #[must_use]
    pub fn is_initial(self) -> bool {
        self == Self::INITIAL
    }

    /// Persisted numeric code
    #[inline]
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Phase for a persisted numeric code
    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| u64::from(s.code()) == code)
    }

    /// Snake-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PhaseGenerating => "phase_generating",
            Self::PhaseImplementing => "phase_implementing",
            Self::Reviewing => "reviewing",
            Self::FileRegenerating => "file_regenerating",
            Self::Finalizing => "finalizing",
        }
    }
}

impl fmt::Display for DevState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DevState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

struct DevStateVisitor;

impl Visitor<'_> for DevStateVisitor {
    type Value = DevState;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a phase code 0..=5 or a phase name")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<DevState, E> {
        DevState::from_code(v).ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<DevState, E> {
        u64::try_from(v)
            .ok()
            .and_then(DevState::from_code)
            .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<DevState, E> {
        DevState::ALL
            .into_iter()
            .find(|s| s.as_str() == v)
            .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for DevState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DevStateVisitor)
    }
}

/// Marker that a generation run is in flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMarker {
    /// Run identifier assigned by the generation component
    pub run_id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl GenerationMarker {
    /// Marker for a run starting now
    #[must_use]
    pub fn started(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
        }
    }
}

/// Error reported by the running client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReportedError {
    /// Error message
    pub message: String,
    /// Stack trace, if the client sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// When the client reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_at: Option<DateTime<Utc>>,
}

impl ClientReportedError {
    /// Create report with just a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
            reported_at: None,
        }
    }
}

/// Full mutable snapshot owned by one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Equals the owning agent's identity
    pub session_id: AgentIdentity,

    /// Link to a live execution environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_instance_id: Option<String>,

    /// Unresolved prompts, oldest first
    #[serde(default)]
    pub pending_user_inputs: Vec<String>,

    /// Current generation phase
    #[serde(default)]
    pub current_dev_state: DevState,

    /// Present while a generation run is in flight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_promise: Option<GenerationMarker>,

    /// Whether generation should resume after a restart
    #[serde(default)]
    pub should_be_generating: bool,

    /// Errors reported by the running client
    #[serde(default)]
    pub client_reported_errors: Vec<ClientReportedError>,

    // Never holds a key from `RESERVED_KEYS`.
    #[serde(flatten)]
    content: Map<String, Value>,
}

impl SessionState {
    /// Serialized names of the typed fields
    pub const RESERVED_KEYS: &'static [&'static str] = &[
        "sessionId",
        "sandboxInstanceId",
        "pendingUserInputs",
        "currentDevState",
        "generationPromise",
        "shouldBeGenerating",
        "clientReportedErrors",
    ];

    /// Fresh state for a session
    #[must_use]
    pub fn new(session_id: AgentIdentity) -> Self {
        Self {
            session_id,
            sandbox_instance_id: None,
            pending_user_inputs: Vec::new(),
            current_dev_state: DevState::INITIAL,
            generation_promise: None,
            should_be_generating: false,
            client_reported_errors: Vec::new(),
            content: Map::new(),
        }
    }

    /// Check if `key` names a typed field
    #[inline]
    #[must_use]
    pub fn is_reserved_key(key: &str) -> bool {
        Self::RESERVED_KEYS.contains(&key)
    }

    /// Opaque fields persisted by the generation component
    #[inline]
    #[must_use]
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// Store an opaque field, returning the previous value
    ///
    /// # Errors
    /// `ReservedKeyError` if `key` names a typed field.
    pub fn insert_content(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, ReservedKeyError> {
        let key = key.into();
        if Self::is_reserved_key(&key) {
            return Err(ReservedKeyError(key));
        }
        Ok(self.content.insert(key, value))
    }

    /// Remove an opaque field
    pub fn remove_content(&mut self, key: &str) -> Option<Value> {
        self.content.remove(key)
    }

    /// With an opaque content field
    ///
    /// Reserved keys are dropped with a warning; use
    /// [`insert_content`](Self::insert_content) to observe the rejection.
    #[must_use]
    pub fn with_content(mut self, key: impl Into<String>, value: Value) -> Self {
        if let Err(e) = self.insert_content(key, value) {
            tracing::warn!(session_id = %self.session_id, error = %e, "content field dropped");
        }
        self
    }

    /// Copy of this state re-owned by `new_identity`
    ///
    /// Runtime fields are reset; content fields are copied unchanged.
    /// Identifiers nested inside `content` are copied as-is.
    #[must_use]
    pub fn clone_for(&self, new_identity: AgentIdentity) -> Self {
        let content = self
            .content
            .iter()
            .filter(|(key, _)| !Self::is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            content,
            ..Self::new(new_identity)
        }
    }

    /// Check if a generation run is in flight
    #[inline]
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.generation_promise.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn busy_state() -> SessionState {
        let mut state = SessionState::new(AgentIdentity::new("src"))
            .with_content("projectName", json!("todo-app"))
            .with_content("generatedFilesMap", json!({"src/main.go": {"fileId": "f1"}}));
        state.sandbox_instance_id = Some("sbx-1".into());
        state.pending_user_inputs = vec!["add dark mode".into()];
        state.current_dev_state = DevState::Reviewing;
        state.generation_promise = Some(GenerationMarker::started("run-1"));
        state.should_be_generating = true;
        state.client_reported_errors = vec![ClientReportedError::new("TypeError")];
        state
    }

    #[test]
    fn new_state_starts_idle_and_empty() {
        let state = SessionState::new(AgentIdentity::new("a"));
        assert!(state.current_dev_state.is_initial());
        assert!(!state.is_generating());
        assert!(state.content().is_empty());
    }

    #[test]
    fn clone_for_resets_runtime_fields() {
        let source = busy_state();
        let cloned = source.clone_for(AgentIdentity::new("dst"));

        assert_eq!(cloned.session_id, AgentIdentity::new("dst"));
        assert_eq!(cloned.sandbox_instance_id, None);
        assert!(cloned.pending_user_inputs.is_empty());
        assert_eq!(cloned.current_dev_state, DevState::Idle);
        assert_eq!(cloned.generation_promise, None);
        assert!(!cloned.should_be_generating);
        assert!(cloned.client_reported_errors.is_empty());
        assert_eq!(cloned.content(), source.content());
    }

    #[test]
    fn clone_for_keeps_nested_ids() {
        let source = busy_state();
        let cloned = source.clone_for(AgentIdentity::new("dst"));
        assert_eq!(
            cloned.content()["generatedFilesMap"]["src/main.go"]["fileId"],
            json!("f1")
        );
    }

    #[test]
    fn dev_state_persists_as_code() {
        assert_eq!(serde_json::to_value(DevState::Idle).unwrap(), json!(0));
        assert_eq!(serde_json::to_value(DevState::Finalizing).unwrap(), json!(5));
        assert_eq!(
            serde_json::from_value::<DevState>(json!(2)).unwrap(),
            DevState::PhaseImplementing
        );
        assert_eq!(
            serde_json::from_value::<DevState>(json!("reviewing")).unwrap(),
            DevState::Reviewing
        );
        assert!(serde_json::from_value::<DevState>(json!(6)).is_err());
        assert!(serde_json::from_value::<DevState>(json!(-1)).is_err());
        assert!(serde_json::from_value::<DevState>(json!("sleeping")).is_err());
    }

    #[test]
    fn reads_snapshot_with_numeric_phase() {
        let state: SessionState =
            serde_json::from_value(json!({"sessionId": "s1", "currentDevState": 0})).unwrap();
        assert_eq!(state.session_id, AgentIdentity::new("s1"));
        assert!(state.current_dev_state.is_initial());
        assert!(state.content().is_empty());

        let busy: SessionState =
            serde_json::from_value(json!({"sessionId": "s2", "currentDevState": 3, "query": "x"}))
                .unwrap();
        assert_eq!(busy.current_dev_state, DevState::Reviewing);
        assert_eq!(busy.content()["query"], json!("x"));
    }

    #[test]
    fn reserved_keys_are_rejected_as_content() {
        let mut state = SessionState::new(AgentIdentity::new("a"));
        for key in SessionState::RESERVED_KEYS {
            let err = state.insert_content(*key, json!("b")).unwrap_err();
            assert_eq!(err, ReservedKeyError((*key).to_string()));
        }
        assert_eq!(state.insert_content("title", json!("t")).unwrap(), None);
        assert_eq!(state.insert_content("title", json!("u")).unwrap(), Some(json!("t")));

        let state = SessionState::new(AgentIdentity::new("a")).with_content("sessionId", json!("b"));
        assert!(state.content().is_empty());

        let back: SessionState =
            serde_json::from_value(serde_json::to_value(&state).unwrap()).unwrap();
        assert_eq!(back.session_id, AgentIdentity::new("a"));
    }

    #[test]
    fn unknown_fields_survive_serde() {
        let raw = json!({
            "sessionId": "s1",
            "currentDevState": "phase_implementing",
            "shouldBeGenerating": true,
            "blueprint": {"title": "Todo"},
            "conversationMessages": [{"id": "m1", "text": "hi"}]
        });

        let state: SessionState = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(state.current_dev_state, DevState::PhaseImplementing);
        assert_eq!(state.content()["blueprint"]["title"], json!("Todo"));

        let back = serde_json::to_value(&state).unwrap();
        assert_eq!(back["conversationMessages"], raw["conversationMessages"]);
        assert_eq!(back["sessionId"], json!("s1"));
        assert_eq!(back["currentDevState"], json!(2));
    }

    fn any_key() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z]{1,10}",
            prop::sample::select(SessionState::RESERVED_KEYS).prop_map(str::to_string),
        ]
    }

    proptest! {
        #[test]
        fn clone_for_output_round_trips(
            keys in prop::collection::vec(any_key(), 0..8),
            phase in 0u64..=5,
            errors in prop::collection::vec("[ -~]{0,12}", 0..3),
        ) {
            let mut source = SessionState::new(AgentIdentity::new("src"));
            source.current_dev_state = DevState::from_code(phase).unwrap();
            source.client_reported_errors =
                errors.into_iter().map(ClientReportedError::new).collect();
            // bypass the checked insert to model a corrupted snapshot
            for (i, key) in keys.into_iter().enumerate() {
                source.content.insert(key, json!(i));
            }

            let cloned = source.clone_for(AgentIdentity::new("dst"));
            prop_assert!(cloned.content().keys().all(|k| !SessionState::is_reserved_key(k)));
            prop_assert!(cloned.client_reported_errors.is_empty());
            prop_assert!(cloned.current_dev_state.is_initial());

            let back: SessionState =
                serde_json::from_value(serde_json::to_value(&cloned).unwrap()).unwrap();
            prop_assert_eq!(back, cloned);
        }
    }
}
