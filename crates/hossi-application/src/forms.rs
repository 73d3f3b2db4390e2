//! Form layer: input checks that run before anything is sent.
//!
//! Field rules follow the browser client's schemas and the fields the
//! backend insists on. A form that fails validation never reaches the HTTP
//! adapter.

use chrono::{NaiveDate, NaiveDateTime};
use hossi_core::HossiError;
use hossi_core::resource::ResourceKind;
use hossi_core::session::Role;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const REQUIRED: &str = "Required";

/// Field name to error message, for every field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn require_text(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
        }
    }

    fn require_id(&mut self, field: &'static str, value: Option<u64>) {
        if value.is_none() {
            self.add(field, REQUIRED);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for HossiError {
    fn from(err: ValidationErrors) -> Self {
        HossiError::Validation(err.to_string())
    }
}

/// A form that checks itself and turns into a request body.
pub trait Form: Serialize {
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Validates, then serializes the form into the JSON payload.
    fn into_payload(self) -> Result<Value, ValidationErrors>
    where
        Self: Sized,
    {
        self.validate()?;
        serde_json::to_value(&self).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("form", e.to_string());
            errors
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Form for LoginForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("username", &self.username);
        errors.require_text("password", &self.password);
        errors.into_result()
    }
}

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientForm {
    pub username: String,
    pub password: String,
    pub name: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub dob: String,
    pub gender: String,
    pub id_number: String,
    pub branch_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

impl Form for PatientForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("username", &self.username);
        errors.require_text("password", &self.password);
        errors.require_text("name", &self.name);
        errors.require_text("dob", &self.dob);
        errors.require_text("gender", &self.gender);
        errors.require_text("id_number", &self.id_number);
        errors.require_id("branch_id", self.branch_id);

        if !self.dob.trim().is_empty()
            && NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d").is_err()
        {
            errors.add("dob", "Must be a date (YYYY-MM-DD)");
        }

        if !self.gender.trim().is_empty() && !GENDERS.contains(&self.gender.as_str()) {
            errors.add("gender", "Must be one of Male, Female, Other");
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchForm {
    pub county: String,
    pub location: String,
    pub contact: String,
    pub capacity: Option<i64>,
}

impl Form for BranchForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("county", &self.county);
        errors.require_text("location", &self.location);
        errors.require_text("contact", &self.contact);

        match self.capacity {
            None => errors.add("capacity", REQUIRED),
            Some(capacity) if capacity <= 0 => errors.add("capacity", "Must be positive"),
            Some(_) => {}
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    pub password: String,
    pub role: String,
    pub branch_id: Option<u64>,
}

impl Form for UserForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("username", &self.username);
        errors.require_text("password", &self.password);
        errors.require_text("role", &self.role);
        errors.require_id("branch_id", self.branch_id);

        if !self.role.trim().is_empty() && Role::from_str(self.role.trim()).is_err() {
            errors.add("role", "Must be one of admin, doctor, nurse, patient");
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    pub patient_id: Option<u64>,
    pub doctor_id: Option<u64>,
    pub branch_id: Option<u64>,
    /// ISO-8601 date-time, e.g. `2026-10-20T09:30:00`.
    pub appointment_date: String,
    pub status: String,
}

impl AppointmentForm {
    fn parse_date(value: &str) -> bool {
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
    }
}

impl Form for AppointmentForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_id("patient_id", self.patient_id);
        errors.require_id("doctor_id", self.doctor_id);
        errors.require_id("branch_id", self.branch_id);
        errors.require_text("appointment_date", &self.appointment_date);
        errors.require_text("status", &self.status);

        let date = self.appointment_date.trim();
        if !date.is_empty() && !Self::parse_date(date) {
            errors.add("appointment_date", "Must be a date-time (YYYY-MM-DDTHH:MM[:SS])");
        }

        errors.into_result()
    }
}

/// Parses a raw JSON object into the form for `kind` and returns its payload.
pub fn payload_for(kind: ResourceKind, raw: Value) -> Result<Value, ValidationErrors> {
    fn parse<F: Form + DeserializeOwned>(raw: Value) -> Result<Value, ValidationErrors> {
        let form: F = serde_json::from_value(raw).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("form", e.to_string());
            errors
        })?;
        form.into_payload()
    }

    match kind {
        ResourceKind::Patients => parse::<PatientForm>(raw),
        ResourceKind::Branches => parse::<BranchForm>(raw),
        ResourceKind::Users => parse::<UserForm>(raw),
        ResourceKind::Appointments => parse::<AppointmentForm>(raw),
        ResourceKind::Audits => {
            let mut errors = ValidationErrors::new();
            errors.add("form", "Audit records cannot be created");
            Err(errors)
        }
    }
}
