use contracts::domain::a001_listing::SubtypeChoiceTable;
use web_sys::Document;

use crate::shared::dom;

/// Узел со встроенной таблицей подтипов
pub const DATA_NODE_ID: &str = "subtypes-data";

const DEFAULT_PLACEHOLDER: &str = "— не выбрано —";
const DEFAULT_STATUS_CONTROL_ID: &str = "id_status";

/// Настройки формы объекта, неизменяемые после загрузки страницы.
///
/// Собираются один раз и передаются движку видимости и построителю
/// подтипов явно, без обращения к глобальному состоянию.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFormConfig {
    pub choices: SubtypeChoiceTable,
    pub placeholder: String,
    /// Обязательное поле статуса, которое движок никогда не выключает
    pub status_control_id: String,
    pub category_field: String,
    pub operation_field: String,
    pub subtype_field: String,
}

impl Default for ListingFormConfig {
    fn default() -> Self {
        Self {
            choices: SubtypeChoiceTable::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            status_control_id: DEFAULT_STATUS_CONTROL_ID.to_string(),
            category_field: "category".to_string(),
            operation_field: "operation".to_string(),
            subtype_field: "subtype".to_string(),
        }
    }
}

impl ListingFormConfig {
    /// Наложить значения из `data-subtypes` / `data-placeholder`.
    ///
    /// Отсутствующее или битое значение оставляет умолчание.
    pub fn with_overrides(mut self, subtypes: Option<&str>, placeholder: Option<&str>) -> Self {
        if let Some(placeholder) = placeholder.filter(|p| !p.trim().is_empty()) {
            self.placeholder = placeholder.to_string();
        }
        if let Some(raw) = subtypes {
            match SubtypeChoiceTable::parse(raw) {
                Ok(choices) => self.choices = choices,
                Err(e) => {
                    log::warn!("ignoring subtype choices payload: {:#}", e);
                    self.choices = SubtypeChoiceTable::new();
                }
            }
        }
        self
    }

    /// Прочитать настройки со страницы
    ///
    /// # Returns
    /// - Умолчания, если узла `#subtypes-data` нет
    pub fn load(document: &Document) -> Self {
        let Some(node) = document.get_element_by_id(DATA_NODE_ID) else {
            log::debug!("#{} not found, subtype choices are empty", DATA_NODE_ID);
            return Self::default();
        };
        let subtypes = dom::data_attr(&node, "subtypes");
        let placeholder = dom::data_attr(&node, "placeholder");
        Self::default().with_overrides(subtypes.as_deref(), placeholder.as_deref())
    }

    /// Есть ли встроенная таблица, по которой можно перестраивать подтипы
    pub fn has_data_node(document: &Document) -> bool {
        document.get_element_by_id(DATA_NODE_ID).is_some()
    }
}
