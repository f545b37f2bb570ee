//! Bilingual string tables

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    Kz,
}

/// Labels for every visible piece of text in the converter.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub amount: &'static str,
    pub from_placeholder: &'static str,
    pub to_placeholder: &'static str,
    pub convert: &'static str,
    pub last_update: &'static str,
    pub next_update: &'static str,
    pub code: &'static str,
    pub rate: &'static str,
    pub loading: &'static str,
}

static RU: Strings = Strings {
    title: "Конвертер валют 💱",
    amount: "Сумма",
    from_placeholder: "Из какой",
    to_placeholder: "В какую",
    convert: "Конвертировать 💱",
    last_update: "Последнее обновление",
    next_update: "Следующее обновление",
    code: "Код валюты",
    rate: "Курс к USD",
    loading: "Loading...",
};

static KZ: Strings = Strings {
    title: "Валюта конвертері 💱",
    amount: "Сома",
    from_placeholder: "Қай валютадан",
    to_placeholder: "Қай валютаға",
    convert: "Аудару 💱",
    last_update: "Соңғы жаңарту",
    next_update: "Келесі жаңарту",
    code: "Валюта коды",
    rate: "USD бағамы",
    loading: "Loading...",
};

impl Language {
    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::Ru => &RU,
            Language::Kz => &KZ,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Language::Ru => "ru",
                Language::Kz => "kz",
            }
        )
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "kz" => Ok(Language::Kz),
            _ => Err(anyhow::anyhow!("Invalid language: {} (expected ru or kz)", s)),
        }
    }
}
