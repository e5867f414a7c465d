//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{CreateBoardRequest, LoginRequest, MessageRequest, RegisterRequest};

const MAX_TOPIC_LENGTH: usize = 256;
const MAX_TEXT_LENGTH: usize = 2048;

/// A request field that failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validated registration form
#[derive(Debug)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Validated login form
#[derive(Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn require(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::new(field, format!("The `{}` field is required", field)))
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_]{1,128}$").expect("Failed to compile username regex")
    });

    if !regex.is_match(username) {
        return Err(ValidationError::new(
            "username",
            "Username must be 1 to 128 letters, digits or underscores",
        ));
    }

    Ok(())
}

/// Validate a first or last name
pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Zа-яА-Я]{0,128}$").expect("Failed to compile name regex")
    });

    if !regex.is_match(name) {
        return Err(ValidationError::new(
            field,
            "Names may only contain up to 128 Latin or Cyrillic letters",
        ));
    }

    Ok(())
}

/// Validate board topic
pub fn validate_topic(topic: &str) -> Result<(), ValidationError> {
    if topic.is_empty() {
        return Err(ValidationError::new(
            "topic",
            "The board's topic must be specified",
        ));
    }

    if topic.chars().count() > MAX_TOPIC_LENGTH {
        return Err(ValidationError::new(
            "topic",
            format!("The topic must be at most {} characters long", MAX_TOPIC_LENGTH),
        ));
    }

    Ok(())
}

/// Validate message text
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::new("text", "The message cannot be empty"));
    }

    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::new(
            "text",
            format!("The message must be at most {} characters long", MAX_TEXT_LENGTH),
        ));
    }

    Ok(())
}

pub fn registration(request: RegisterRequest) -> Result<RegistrationForm, ValidationError> {
    let username = require("username", request.username)?;
    validate_username(&username)?;

    let password = require("password", request.password)?;

    let first_name = require("first_name", request.first_name)?;
    validate_name("first_name", &first_name)?;

    let last_name = require("last_name", request.last_name)?;
    validate_name("last_name", &last_name)?;

    Ok(RegistrationForm {
        username,
        password,
        first_name,
        last_name,
    })
}

pub fn login(request: LoginRequest) -> Result<LoginForm, ValidationError> {
    let username = require("username", request.username)?;
    validate_username(&username)?;

    let password = require("password", request.password)?;

    Ok(LoginForm { username, password })
}

pub fn board_topic(request: CreateBoardRequest) -> Result<String, ValidationError> {
    let topic = require("topic", request.topic)?;
    validate_topic(&topic)?;
    Ok(topic)
}

pub fn message_text(request: MessageRequest) -> Result<String, ValidationError> {
    let text = require("text", request.text)?;
    validate_text(&text)?;
    Ok(text)
}
