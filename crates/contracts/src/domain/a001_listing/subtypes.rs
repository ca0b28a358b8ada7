use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Choice
// ============================================================================

/// Один вариант подтипа: значение поля и подпись для `<option>`.
///
/// На проводе это пара `["apartment", "Квартира"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct SubtypeChoice {
    pub value: String,
    pub label: String,
}

impl SubtypeChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<(String, String)> for SubtypeChoice {
    fn from((value, label): (String, String)) -> Self {
        Self { value, label }
    }
}

impl From<SubtypeChoice> for (String, String) {
    fn from(choice: SubtypeChoice) -> Self {
        (choice.value, choice.label)
    }
}

// ============================================================================
// Table
// ============================================================================

/// Таблица подтипов по категориям.
///
/// Ключи хранятся в нижнем регистре; поиск нормализует категорию так же,
/// поэтому `"Flat"` и `" flat "` находят один и тот же список.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtypeChoiceTable {
    entries: BTreeMap<String, Vec<SubtypeChoice>>,
}

impl SubtypeChoiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Разбор JSON-пакета, встроенного в страницу
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let entries: BTreeMap<String, Vec<SubtypeChoice>> =
            serde_json::from_str(raw).context("malformed subtype choices payload")?;
        Ok(entries.into_iter().collect())
    }

    /// Значение атрибута `data-subtypes`; его рендерит серверный шаблон
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("failed to serialize subtype choices")
    }

    pub fn insert(&mut self, category: &str, choices: Vec<SubtypeChoice>) {
        self.entries.insert(normalize_key(category), choices);
    }

    /// Варианты для категории; неизвестная категория даёт пустой срез
    pub fn choices_for(&self, category: &str) -> &[SubtypeChoice] {
        self.entries
            .get(&normalize_key(category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn allows(&self, category: &str, value: &str) -> bool {
        self.choices_for(category)
            .iter()
            .any(|choice| choice.value == value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<SubtypeChoice>)> for SubtypeChoiceTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<SubtypeChoice>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (category, choices) in iter {
            table.insert(&category, choices);
        }
        table
    }
}

fn normalize_key(category: &str) -> String {
    category.trim().to_lowercase()
}

// ============================================================================
// Canonical server table
// ============================================================================

static PROPERTY_SUBTYPE_CHOICES: Lazy<SubtypeChoiceTable> = Lazy::new(|| {
    let mut table = SubtypeChoiceTable::new();
    table.insert(
        "house",
        pairs(&[
            ("house", "Жилой дом"),
            ("dacha", "Дача"),
            ("townhouse", "Таунхаус"),
            ("duplex", "Дуплекс"),
        ]),
    );
    table.insert(
        "flat",
        pairs(&[
            ("apartment", "Квартира"),
            ("studio", "Студия"),
            ("euro", "Евро-формат"),
            ("apartments", "Апартаменты"),
        ]),
    );
    table.insert("room", pairs(&[("room", "Комната"), ("share", "Доля")]));
    table.insert(
        "commercial",
        pairs(&[
            ("office", "Офис"),
            ("retail", "Торговая"),
            ("warehouse", "Склад"),
            ("production", "Производство"),
            ("free_use", "Свободное назначение"),
        ]),
    );
    table.insert(
        "land",
        pairs(&[
            ("individual_housing", "ИЖС"),
            ("agricultural", "С/Х"),
            ("garden", "Сад/ДНП"),
        ]),
    );
    table.insert("garage", pairs(&[("garage", "Гараж"), ("parking", "Машиноместо")]));
    table
});

fn pairs(raw: &[(&str, &str)]) -> Vec<SubtypeChoice> {
    raw.iter()
        .map(|(value, label)| SubtypeChoice::new(*value, *label))
        .collect()
}

/// Таблица подтипов объекта недвижимости, которую сервер встраивает в форму.
///
/// Источник для серверного рендера `data-subtypes`; клиент читает пакет
/// со страницы и эту таблицу напрямую не использует.
pub fn property_subtype_choices() -> &'static SubtypeChoiceTable {
    &PROPERTY_SUBTYPE_CHOICES
}
