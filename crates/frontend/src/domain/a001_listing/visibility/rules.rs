//! Правила сопоставления секций формы с текущим выбором
//! категории / типа сделки / подтипа.

use std::collections::BTreeSet;

/// Текущие значения трёх полей-селекторов (уже обрезанные)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorContext {
    pub category: String,
    pub operation: String,
    pub subtype: String,
}

impl SelectorContext {
    pub fn new(category: &str, operation: &str, subtype: &str) -> Self {
        Self {
            category: category.trim().to_string(),
            operation: operation.trim().to_string(),
            subtype: subtype.trim().to_string(),
        }
    }
}

/// Разбить значение атрибута-фильтра на токены по запятым и пробелам
pub fn split_tokens(raw: &str) -> BTreeSet<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Совпадение типа сделки.
///
/// Токен подходит, если равен значению, если это `rent` и значение
/// начинается с `rent` (`rent_long`, `rent_short`), или если токен является
/// префиксом значения. Пустое значение совпадает только с пустым набором.
pub fn operation_matches(tokens: &BTreeSet<String>, operation: &str) -> bool {
    if tokens.is_empty() {
        return true;
    }
    let value = operation.trim();
    if value.is_empty() {
        return false;
    }
    tokens.iter().any(|token| {
        token == value
            || (token == "rent" && value.starts_with("rent"))
            || value.starts_with(token.as_str())
    })
}

/// Результат проверки одной секции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionVerdict {
    pub visible: bool,
    /// Секция с объявленными категориями при скрытии выключает контролы
    pub disable_allowed: bool,
}

/// Фильтры, объявленные на секции. Пустой набор совпадает с чем угодно.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionCriteria {
    pub categories: BTreeSet<String>,
    pub operations: BTreeSet<String>,
    pub subtypes: BTreeSet<String>,
}

impl SectionCriteria {
    /// Из атрибутов `data-category` (или `data-section`), `data-operation`, `data-subtype`
    pub fn from_attributes(
        category: Option<&str>,
        section: Option<&str>,
        operation: Option<&str>,
        subtype: Option<&str>,
    ) -> Self {
        let category_raw = category
            .filter(|raw| !raw.trim().is_empty())
            .or(section)
            .unwrap_or_default();
        Self {
            categories: split_tokens(category_raw),
            operations: split_tokens(operation.unwrap_or_default()),
            subtypes: split_tokens(subtype.unwrap_or_default()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.categories.is_empty() && self.operations.is_empty() && self.subtypes.is_empty()
    }

    pub fn evaluate(&self, context: &SelectorContext) -> SectionVerdict {
        let category_match =
            self.categories.is_empty() || self.categories.contains(&context.category);
        let visible = category_match
            && operation_matches(&self.operations, &context.operation)
            && (self.subtypes.is_empty() || self.subtypes.contains(&context.subtype));

        SectionVerdict {
            visible,
            disable_allowed: !self.categories.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &str) -> BTreeSet<String> {
        split_tokens(raw)
    }

    #[test]
    fn test_split_tokens() {
        assert_eq!(
            tokens(" flat, room  house,,"),
            ["flat", "house", "room"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<String>>()
        );
        assert!(tokens("").is_empty());
        assert!(tokens(" , ").is_empty());
    }

    #[test]
    fn test_rent_token_matches_rent_variants() {
        let rent = tokens("rent");
        assert!(operation_matches(&rent, "rent"));
        assert!(operation_matches(&rent, "rent_long"));
        assert!(operation_matches(&rent, "rent_short"));
        assert!(!operation_matches(&rent, "sale"));
    }

    #[test]
    fn test_operation_exact_and_prefix() {
        assert!(operation_matches(&tokens("sale"), "sale"));
        assert!(operation_matches(&tokens("rent_long sale"), "rent_long"));
        assert!(!operation_matches(&tokens("rent_long"), "rent_short"));
        assert!(operation_matches(&tokens("sa"), "sale"));
    }

    #[test]
    fn test_empty_operation_only_matches_wildcard() {
        assert!(operation_matches(&BTreeSet::new(), ""));
        assert!(!operation_matches(&tokens("sale"), ""));
        assert!(!operation_matches(&tokens("rent"), "   "));
    }

    #[test]
    fn test_category_falls_back_to_section_attribute() {
        let criteria = SectionCriteria::from_attributes(None, Some("flat room"), None, None);
        assert_eq!(criteria.categories, tokens("flat,room"));

        let criteria = SectionCriteria::from_attributes(Some(" "), Some("land"), None, None);
        assert_eq!(criteria.categories, tokens("land"));

        let criteria = SectionCriteria::from_attributes(Some("house"), Some("land"), None, None);
        assert_eq!(criteria.categories, tokens("house"));
    }

    #[test]
    fn test_wildcard_section_always_visible() {
        let criteria = SectionCriteria::default();
        assert!(criteria.is_wildcard());
        for context in [
            SelectorContext::default(),
            SelectorContext::new("flat", "sale", "studio"),
            SelectorContext::new("garage", "rent_short", ""),
        ] {
            let verdict = criteria.evaluate(&context);
            assert!(verdict.visible);
            assert!(!verdict.disable_allowed);
        }
    }

    #[test]
    fn test_all_three_stages_must_match() {
        let criteria = SectionCriteria::from_attributes(
            Some("flat"),
            None,
            Some("rent"),
            Some("apartment,studio"),
        );

        assert!(criteria.evaluate(&SelectorContext::new("flat", "rent_long", "studio")).visible);
        assert!(!criteria.evaluate(&SelectorContext::new("house", "rent_long", "studio")).visible);
        assert!(!criteria.evaluate(&SelectorContext::new("flat", "sale", "studio")).visible);
        assert!(!criteria.evaluate(&SelectorContext::new("flat", "rent", "euro")).visible);
        assert!(criteria.evaluate(&SelectorContext::new("flat", "sale", "")).disable_allowed);
    }

    #[test]
    fn test_section_without_categories_hides_without_disabling() {
        let criteria = SectionCriteria::from_attributes(None, None, Some("sale"), None);
        let verdict = criteria.evaluate(&SelectorContext::new("flat", "rent", ""));
        assert!(!verdict.visible);
        assert!(!verdict.disable_allowed);
    }

    #[test]
    fn test_context_is_trimmed() {
        let context = SelectorContext::new(" flat ", "sale\n", "\tstudio");
        assert_eq!(context, SelectorContext::new("flat", "sale", "studio"));
    }
}
