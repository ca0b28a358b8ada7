use contracts::domain::a001_listing::SubtypeChoiceTable;

use super::config::ListingFormConfig;

/// Поле выбора подтипа: список `<option>` и текущее значение
pub trait SubtypeField {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn clear_options(&mut self);
    fn append_option(&mut self, value: &str, label: &str);
}

/// Перестраивает варианты подтипа под выбранную категорию
#[derive(Debug, Clone)]
pub struct SubtypeOptionBuilder {
    choices: SubtypeChoiceTable,
    placeholder: String,
}

impl SubtypeOptionBuilder {
    pub fn new(config: &ListingFormConfig) -> Self {
        Self {
            choices: config.choices.clone(),
            placeholder: config.placeholder.clone(),
        }
    }

    /// Заменить варианты поля и вернуть выбранное значение.
    ///
    /// Первым всегда идёт пустой вариант-заглушка. Прежний выбор
    /// сохраняется, только если `preserve_selection` и он есть среди новых
    /// вариантов; иначе поле сбрасывается на заглушку.
    pub fn rebuild<F: SubtypeField>(
        &self,
        field: &mut F,
        category: &str,
        preserve_selection: bool,
    ) -> String {
        let previous = if preserve_selection {
            field.value()
        } else {
            String::new()
        };

        field.clear_options();
        field.append_option("", &self.placeholder);

        let choices = self.choices.choices_for(category);
        for choice in choices {
            field.append_option(&choice.value, &choice.label);
        }

        let keep = !previous.is_empty() && choices.iter().any(|choice| choice.value == previous);
        let selected = if keep { previous } else { String::new() };
        field.set_value(&selected);

        log::debug!(
            "subtype options rebuilt for '{}': {} choices, selected '{}'",
            category,
            choices.len(),
            selected
        );
        selected
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::SubtypeField;

    /// `<select>` в памяти
    #[derive(Debug, Default)]
    pub struct FakeSelect {
        pub options: Vec<(String, String)>,
        pub value: String,
    }

    impl FakeSelect {
        pub fn with_value(value: &str) -> Self {
            Self {
                options: vec![(value.to_string(), value.to_string())],
                value: value.to_string(),
            }
        }

        pub fn values(&self) -> Vec<&str> {
            self.options.iter().map(|(v, _)| v.as_str()).collect()
        }
    }

    impl SubtypeField for FakeSelect {
        fn value(&self) -> String {
            self.value.clone()
        }

        fn set_value(&mut self, value: &str) {
            // как у браузера: значение вне списка не выбирается
            if self.options.iter().any(|(v, _)| v == value) {
                self.value = value.to_string();
            } else {
                self.value.clear();
            }
        }

        fn clear_options(&mut self) {
            self.options.clear();
            self.value.clear();
        }

        fn append_option(&mut self, value: &str, label: &str) {
            if self.options.is_empty() {
                self.value = value.to_string();
            }
            self.options.push((value.to_string(), label.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeSelect;
    use super::*;
    use contracts::domain::a001_listing::property_subtype_choices;

    fn builder() -> SubtypeOptionBuilder {
        let config = ListingFormConfig {
            choices: property_subtype_choices().clone(),
            ..ListingFormConfig::default()
        };
        SubtypeOptionBuilder::new(&config)
    }

    #[test]
    fn test_placeholder_then_category_choices() {
        let mut field = FakeSelect::default();
        builder().rebuild(&mut field, "room", false);

        assert_eq!(field.values(), vec!["", "room", "share"]);
        assert_eq!(field.options[0].1, "— не выбрано —");
        assert_eq!(field.value, "");
    }

    #[test]
    fn test_valid_selection_preserved() {
        let mut field = FakeSelect::with_value("studio");
        let selected = builder().rebuild(&mut field, "Flat", true);

        assert_eq!(selected, "studio");
        assert_eq!(field.value, "studio");
    }

    #[test]
    fn test_foreign_selection_resets_to_placeholder() {
        let mut field = FakeSelect::with_value("studio");
        let selected = builder().rebuild(&mut field, "land", true);

        assert_eq!(selected, "");
        assert_eq!(field.value, "");
    }

    #[test]
    fn test_selection_dropped_without_preserve() {
        let mut field = FakeSelect::with_value("studio");
        builder().rebuild(&mut field, "flat", false);

        assert_eq!(field.value, "");
    }

    #[test]
    fn test_unknown_category_yields_placeholder_only() {
        let mut field = FakeSelect::with_value("garage");
        builder().rebuild(&mut field, "castle", true);

        assert_eq!(field.values(), vec![""]);
        assert_eq!(field.value, "");
    }

    #[test]
    fn test_custom_placeholder() {
        let config = ListingFormConfig::default().with_overrides(None, Some("Любой"));
        let mut field = FakeSelect::default();
        SubtypeOptionBuilder::new(&config).rebuild(&mut field, "", false);

        assert_eq!(field.options, vec![(String::new(), "Любой".to_string())]);
    }
}
