use super::config::ListingFormConfig;
use super::subtype_options::{SubtypeField, SubtypeOptionBuilder};
use super::visibility::{FormSurface, ManagedSection, SelectorContext, VisibilityEngine, VisibilityReport};

/// Связка движка видимости и построителя подтипов для одной формы.
///
/// Секции собираются один раз при создании. Подтип читается из самого поля
/// после перестройки вариантов, поэтому сброшенный выбор сразу учитывается
/// при сопоставлении секций.
pub struct ListingFormController<S: FormSurface, T: SubtypeField> {
    engine: VisibilityEngine,
    builder: SubtypeOptionBuilder,
    surface: S,
    sections: Vec<ManagedSection<S::Section>>,
    subtype: Option<T>,
    rebuild_subtypes: bool,
}

impl<S: FormSurface, T: SubtypeField> ListingFormController<S, T> {
    /// `rebuild_subtypes` выключают, когда на странице нет встроенной таблицы
    pub fn new(config: &ListingFormConfig, surface: S, subtype: Option<T>, rebuild_subtypes: bool) -> Self {
        let sections = surface.sections();
        log::debug!("listing form: {} managed sections", sections.len());
        Self {
            engine: VisibilityEngine::new(config),
            builder: SubtypeOptionBuilder::new(config),
            surface,
            sections,
            subtype,
            rebuild_subtypes,
        }
    }

    /// Первичная настройка: варианты подтипа с сохранением выбора, затем видимость
    pub fn start(&mut self, category: &str, operation: &str) -> VisibilityReport {
        self.rebuild(category, true);
        self.refresh(category, operation)
    }

    /// Смена категории: варианты подтипа строятся заново без сохранения выбора
    pub fn category_changed(&mut self, category: &str, operation: &str) -> VisibilityReport {
        self.rebuild(category, false);
        self.refresh(category, operation)
    }

    /// Пересчитать видимость по текущим значениям
    pub fn refresh(&mut self, category: &str, operation: &str) -> VisibilityReport {
        let context = self.context(category, operation);
        let report = self.engine.apply(&mut self.surface, &context, &self.sections);
        log::debug!(
            "sections for {:?}: {} visible, {} hidden, {} changes",
            context,
            report.visible,
            report.hidden,
            report.changes
        );
        report
    }

    pub fn context(&self, category: &str, operation: &str) -> SelectorContext {
        let subtype = self.subtype.as_ref().map(|f| f.value()).unwrap_or_default();
        SelectorContext::new(category, operation, &subtype)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn subtype_field(&self) -> Option<&T> {
        self.subtype.as_ref()
    }

    fn rebuild(&mut self, category: &str, preserve_selection: bool) {
        if !self.rebuild_subtypes {
            return;
        }
        if let Some(field) = self.subtype.as_mut() {
            self.builder.rebuild(field, category, preserve_selection);
        }
    }
}
