//! Translation lookup.
//!
//! Locale tables are nested JSON objects embedded at compile time. `t` never
//! fails: a key missing from the active locale is looked up in the default
//! locale, and a key missing there too comes back unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
    Fr,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Pt, Language::En, Language::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Pt => "Português",
            Language::En => "English",
            Language::Fr => "Français",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Cycles pt → en → fr → pt.
    pub fn next(self) -> Language {
        let idx = Self::ALL.iter().position(|&l| l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn embedded_table(self) -> &'static str {
        match self {
            Language::Pt => include_str!("../locales/pt.json"),
            Language::En => include_str!("../locales/en.json"),
            Language::Fr => include_str!("../locales/fr.json"),
        }
    }
}

pub const DEFAULT_LANGUAGE: Language = Language::Pt;

pub struct Translator {
    language: Language,
    tables: HashMap<Language, Value>,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        let tables = Language::ALL
            .into_iter()
            .map(|lang| {
                let table = serde_json::from_str(lang.embedded_table()).unwrap_or_else(|e| {
                    error!(language = lang.code(), error = %e, "locale table is not valid JSON");
                    Value::Null
                });
                (lang, table)
            })
            .collect();
        Self::with_tables(language, tables)
    }

    pub fn with_tables(language: Language, tables: HashMap<Language, Value>) -> Self {
        Self { language, tables }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        let mut node = self.tables.get(&language)?;
        for part in key.split('.') {
            node = node.as_object()?.get(part)?;
        }
        node.as_str()
    }

    pub fn t(&self, key: &str) -> String {
        if let Some(s) = self.lookup(self.language, key) {
            return s.to_string();
        }
        if let Some(s) = self.lookup(DEFAULT_LANGUAGE, key) {
            return s.to_string();
        }
        warn!(
            key,
            language = self.language.code(),
            "translation key not found in active or default locale"
        );
        key.to_string()
    }
}
