// Dot-env loading and credential resolution
// Values from files never override non-empty process environment values

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use super::types::SyncConfig;

/// Variables collected from dot-env style files
#[derive(Debug, Default, Clone)]
pub struct DotEnv {
    vars: HashMap<String, String>,
}

impl DotEnv {
    /// Load files in order; the first definition of a key wins.
    /// Missing files are skipped.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> io::Result<Self> {
        let mut env = Self::default();
        for path in paths {
            let path = path.as_ref();
            let content = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            env.merge(&content);
        }
        Ok(env)
    }

    /// Parse `KEY=VALUE` lines into this set without replacing existing values
    pub fn merge(&mut self, content: &str) {
        for (key, value) in parse(content) {
            let slot = self.vars.entry(key).or_default();
            if slot.is_empty() {
                *slot = value;
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Resolve a variable: non-empty process value first, then the files
    pub fn var(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.get(key).map(ToString::to_string))
            .filter(|v| !v.is_empty())
    }
}

/// Parse dot-env content. Comments, blank lines and lines without `=` are ignored.
pub fn parse(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Webflow API credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub collection_id: String,
}

impl Credentials {
    /// Returns `None` unless both variables resolve to non-empty values
    pub fn resolve(config: &SyncConfig, env: &DotEnv) -> Option<Self> {
        Some(Self {
            api_token: env.var(&config.token_var)?,
            collection_id: env.var(&config.collection_var)?,
        })
    }
}
