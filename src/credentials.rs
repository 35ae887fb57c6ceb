// Copyright 2025 Helsing GmbH
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::env;

use miette::Diagnostic;

/// Environment variable holding the registry username
pub const USERNAME_VAR: &str = "DEPLOY_NPM_USERNAME";
/// Environment variable holding the registry password
pub const PASSWORD_VAR: &str = "DEPLOY_NPM_PASSWORD";
/// Environment variable holding the registry email
pub const EMAIL_VAR: &str = "DEPLOY_NPM_EMAIL";

/// Error for a credential whose environment variable is unset or empty.
#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("{credential} should be passed via ${variable} env variable")]
pub struct MissingCredential {
    /// Human name of the credential
    pub credential: &'static str,
    /// The environment variable it is read from
    pub variable: &'static str,
}

/// Credentials used to authenticate against a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Credentials {
    /// Reads the credentials from the process environment.
    pub fn from_env() -> Result<Self, MissingCredential> {
        Self::from_lookup(|variable| env::var(variable).ok())
    }

    /// Reads the credentials through an explicit lookup function.
    ///
    /// An absent or empty value counts as missing and names the variable
    /// that has to be set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MissingCredential>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |credential: &'static str, variable: &'static str| {
            lookup(variable)
                .filter(|value| !value.is_empty())
                .ok_or(MissingCredential {
                    credential,
                    variable,
                })
        };

        Ok(Self {
            username: fetch("username", USERNAME_VAR)?,
            password: fetch("password", PASSWORD_VAR)?,
            email: fetch("email", EMAIL_VAR)?,
        })
    }
}
