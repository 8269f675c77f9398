use secrecy::Secret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{email::Email, role::Role};

/// Unique principal identifier, `"trainer-<uuid>"` or `"client-<uuid>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new_trainer() -> Self {
        PrincipalId(format!("trainer-{}", Uuid::new_v4()))
    }

    pub fn new_client() -> Self {
        PrincipalId(format!("client-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PrincipalId {
    fn from(value: String) -> Self {
        PrincipalId(value)
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored trainer record. The password hash never leaves this type:
/// outward-facing payloads are built via [`Trainer::profile`].
#[derive(Debug, Clone)]
pub struct Trainer {
    id: PrincipalId,
    name: String,
    email: Email,
    password_hash: Secret<String>,
}

impl Trainer {
    pub fn new(name: String, email: Email, password_hash: Secret<String>) -> Self {
        Self {
            id: PrincipalId::new_trainer(),
            name,
            email,
            password_hash,
        }
    }

    /// Rebuild a trainer from its stored fields.
    pub fn from_stored(
        id: PrincipalId,
        name: String,
        email: Email,
        password_hash: Secret<String>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &Secret<String> {
        &self.password_hash
    }

    pub fn profile(&self) -> PrincipalProfile {
        PrincipalProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: Some(self.email.clone()),
            role: Role::Trainer,
        }
    }
}

/// One logged workout, merged per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub date: String,
    pub duration: u32,
}

/// A stored client record. Clients are created by a trainer and may or may
/// not carry credentials; a client without a password hash cannot log in.
#[derive(Debug, Clone)]
pub struct Client {
    id: PrincipalId,
    name: String,
    trainer_id: PrincipalId,
    password_hash: Option<Secret<String>>,
    measurements: Vec<serde_json::Value>,
    custom_routine: Vec<serde_json::Value>,
    workout_logs: Vec<WorkoutLog>,
}

impl Client {
    pub fn new(name: String, trainer_id: PrincipalId, password_hash: Option<Secret<String>>) -> Self {
        Self {
            id: PrincipalId::new_client(),
            name,
            trainer_id,
            password_hash,
            measurements: Vec::new(),
            custom_routine: Vec::new(),
            workout_logs: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_stored(
        id: PrincipalId,
        name: String,
        trainer_id: PrincipalId,
        password_hash: Option<Secret<String>>,
        measurements: Vec<serde_json::Value>,
        custom_routine: Vec<serde_json::Value>,
        workout_logs: Vec<WorkoutLog>,
    ) -> Self {
        Self {
            id,
            name,
            trainer_id,
            password_hash,
            measurements,
            custom_routine,
            workout_logs,
        }
    }

    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trainer_id(&self) -> &PrincipalId {
        &self.trainer_id
    }

    pub fn password_hash(&self) -> Option<&Secret<String>> {
        self.password_hash.as_ref()
    }

    pub fn measurements(&self) -> &[serde_json::Value] {
        &self.measurements
    }

    pub fn custom_routine(&self) -> &[serde_json::Value] {
        &self.custom_routine
    }

    pub fn workout_logs(&self) -> &[WorkoutLog] {
        &self.workout_logs
    }

    /// Apply a merge-update. `None` fields are left untouched.
    pub fn apply_update(&mut self, update: ClientUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(hash) = update.password_hash {
            self.password_hash = Some(hash);
        }
        if let Some(measurements) = update.measurements {
            self.measurements = measurements;
        }
        if let Some(routine) = update.custom_routine {
            self.custom_routine = routine;
        }
    }

    /// Add `minutes` to the log entry for `date`, creating it if absent.
    pub fn merge_workout(&mut self, date: String, minutes: u32) {
        match self.workout_logs.iter_mut().find(|log| log.date == date) {
            Some(log) => log.duration += minutes,
            None => self.workout_logs.push(WorkoutLog {
                date,
                duration: minutes,
            }),
        }
    }

    pub fn profile(&self) -> PrincipalProfile {
        PrincipalProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: None,
            role: Role::Client,
        }
    }

    pub fn view(&self) -> ClientView {
        ClientView {
            id: self.id.clone(),
            name: self.name.clone(),
            trainer_id: self.trainer_id.clone(),
            role: Role::Client,
            measurements: self.measurements.clone(),
            custom_routine: self.custom_routine.clone(),
            workout_logs: self.workout_logs.clone(),
        }
    }
}

/// Partial update for a client record. A provided password arrives here
/// already hashed; plaintext never reaches the store layer.
#[derive(Debug, Default)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub password_hash: Option<Secret<String>>,
    pub measurements: Option<Vec<serde_json::Value>>,
    pub custom_routine: Option<Vec<serde_json::Value>>,
}

/// The sanitized principal shape used in auth payloads. By construction it
/// cannot carry a password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalProfile {
    pub id: PrincipalId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    pub role: Role,
}

/// The sanitized client record returned from the CRUD surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    pub id: PrincipalId,
    pub name: String,
    pub trainer_id: PrincipalId,
    pub role: Role,
    pub measurements: Vec<serde_json::Value>,
    pub custom_routine: Vec<serde_json::Value>,
    pub workout_logs: Vec<WorkoutLog>,
}
