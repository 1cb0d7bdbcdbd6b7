// src/types/profile.rs
//! Profile record: the single JSON document describing the candidate,
//! the message templates and the target companies.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::OrderedMap;
use crate::utils::{file_stem, is_valid_email, looks_like_uri};

pub const DEFAULT_POSITION: &str = "Senior Fullstack Developer";
pub const DEFAULT_MINIMUM_INTERVAL: i64 = 30;
pub const DEFAULT_MAXIMUM_INTERVAL: i64 = 60;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Data validation error: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("Data validation error: '{field}' {reason}")]
    Invalid { field: String, reason: String },
}

impl ProfileError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub name: String,
    pub title: String,
    pub avatar: PathBuf,
    pub contact: Contact,
    pub about: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// category -> skill -> level (1-5)
    #[serde(default)]
    pub skills: OrderedMap<OrderedMap<i64>>,
    /// language -> level (1-5)
    #[serde(default)]
    pub languages: OrderedMap<i64>,
    pub message: MessageTemplate,
    pub companies: Vec<TargetCompany>,
    #[serde(default = "default_minimum_interval")]
    pub minimum_interval: i64,
    #[serde(default = "default_maximum_interval")]
    pub maximum_interval: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Experience {
    pub title: String,
    pub team: String,
    pub company: String,
    pub date: String,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Certificate {
    pub name: String,
    pub authority: String,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: ProjectDescription,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProjectDescription {
    Single(String),
    Lines(Vec<String>),
}

impl ProjectDescription {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Single(text) => vec![text.as_str()],
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

/// Email body fragments. `variable` holds interchangeable alternatives.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageTemplate {
    pub opening: Vec<String>,
    pub constant: Vec<String>,
    pub variable: Vec<String>,
    pub ending: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetCompany {
    /// File name inside the logos directory; its stem names the company
    pub logo: String,
    pub email: String,
    #[serde(default = "default_position")]
    pub position: String,
}

impl TargetCompany {
    pub fn stem(&self) -> String {
        file_stem(&self.logo)
    }
}

fn default_position() -> String {
    DEFAULT_POSITION.to_string()
}

fn default_minimum_interval() -> i64 {
    DEFAULT_MINIMUM_INTERVAL
}

fn default_maximum_interval() -> i64 {
    DEFAULT_MAXIMUM_INTERVAL
}

impl ProfileRecord {
    /// Read, parse and validate the profile file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ProfileError> {
        let record: Self = serde_json::from_str(content)?;
        record.validate()?;
        Ok(record)
    }

    /// Checks serde cannot express
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !self.contact.email.is_empty() && !is_valid_email(&self.contact.email) {
            return Err(ProfileError::invalid(
                "contact.email",
                format!("'{}' is not a valid email", self.contact.email),
            ));
        }

        for (field, value) in [
            ("contact.linkedin", &self.contact.linkedin),
            ("contact.github", &self.contact.github),
        ] {
            if !value.is_empty() && !looks_like_uri(value) {
                return Err(ProfileError::invalid(
                    field,
                    format!("'{}' is not a valid uri", value),
                ));
            }
        }

        if self.message.variable.is_empty() {
            return Err(ProfileError::invalid(
                "message.variable",
                "needs at least one alternative",
            ));
        }

        for (index, company) in self.companies.iter().enumerate() {
            if company.logo.trim().is_empty() {
                return Err(ProfileError::invalid(
                    format!("companies[{}].logo", index),
                    "is empty",
                ));
            }
            if !is_valid_email(&company.email) {
                return Err(ProfileError::invalid(
                    format!("companies[{}].email", index),
                    format!("'{}' is not a valid email", company.email),
                ));
            }
        }

        Ok(())
    }
}
