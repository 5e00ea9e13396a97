//! Client configuration from environment variables (with `.env` support).
//!
//! The web original read its session context out of page metadata; the
//! desktop client takes the same values from the environment.

use std::env;

use anyhow::{anyhow, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Faculty,
    DeptHead,
    Dean,
    Guest,
}

impl Role {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "FACULTY" => Ok(Self::Faculty),
            "DEPT_HEAD" => Ok(Self::DeptHead),
            "DEAN" => Ok(Self::Dean),
            "GUEST" => Ok(Self::Guest),
            other => Err(anyhow!("Unknown user role: {other}")),
        }
    }

    pub fn sees_department_portfolios(self) -> bool {
        self == Self::DeptHead
    }

    pub fn sees_college_portfolios(self) -> bool {
        self == Self::Dean
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    pub csrf_header: String,
    pub csrf_token: Option<String>,
    pub session_cookie: Option<String>,
    pub user_role: Role,
    /// Set when the client is launched into a portfolio details context.
    pub portfolio_id: Option<i64>,
    pub folder_id: Option<i64>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("PORTFOLIO_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let csrf_header =
            env::var("PORTFOLIO_CSRF_HEADER").unwrap_or_else(|_| "X-CSRF-TOKEN".to_string());
        let csrf_token = env::var("PORTFOLIO_CSRF_TOKEN").ok();
        let session_cookie = env::var("PORTFOLIO_SESSION_COOKIE").ok();

        let role_str = env::var("PORTFOLIO_USER_ROLE").unwrap_or_else(|_| "FACULTY".to_string());
        let user_role = Role::parse(&role_str)?;

        Ok(Self {
            base_url,
            csrf_header,
            csrf_token,
            session_cookie,
            user_role,
            portfolio_id: optional_id("PORTFOLIO_CONTEXT_ID")?,
            folder_id: optional_id("PORTFOLIO_FOLDER_ID")?,
        })
    }
}

fn optional_id(key: &str) -> Result<Option<i64>> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("{key} must be a numeric id, got {value:?}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_case_insensitively() {
        assert_eq!(Role::parse("dept_head").unwrap(), Role::DeptHead);
        assert_eq!(Role::parse("DEAN").unwrap(), Role::Dean);
        assert!(Role::parse("JANITOR").is_err());
    }

    #[test]
    fn role_gates_the_shared_tabs() {
        assert!(Role::DeptHead.sees_department_portfolios());
        assert!(!Role::DeptHead.sees_college_portfolios());
        assert!(Role::Dean.sees_college_portfolios());
        assert!(!Role::Faculty.sees_department_portfolios());
    }
}
