use super::rules::{SectionCriteria, SelectorContext};
use crate::domain::a001_listing::config::ListingFormConfig;

/// Признаки контрола, по которым решается, трогает ли его движок
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFlags {
    pub id: String,
    pub required: bool,
    pub keep_enabled: bool,
}

/// Доступ к секциям и контролам формы.
///
/// Веб-реализация работает с DOM, в тестах используется память.
pub trait FormSurface {
    type Section;
    type Control;

    /// Все секции с объявленными фильтрами
    fn sections(&self) -> Vec<ManagedSection<Self::Section>>;
    fn controls(&self, section: &Self::Section) -> Vec<Self::Control>;
    fn control_flags(&self, control: &Self::Control) -> ControlFlags;

    fn is_hidden(&self, section: &Self::Section) -> bool;
    fn set_hidden(&mut self, section: &Self::Section, hidden: bool);

    fn is_disabled(&self, control: &Self::Control) -> bool;
    fn set_disabled(&mut self, control: &Self::Control, disabled: bool);

    /// Запомненное исходное состояние `disabled`, если уже было снято
    fn initial_disabled(&self, control: &Self::Control) -> Option<bool>;
    fn remember_initial_disabled(&mut self, control: &Self::Control, disabled: bool);
}

/// Секция вместе с разобранными фильтрами
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedSection<S> {
    pub handle: S,
    pub criteria: SectionCriteria,
}

impl<S> ManagedSection<S> {
    pub fn new(handle: S, criteria: SectionCriteria) -> Self {
        Self { handle, criteria }
    }
}

/// Итог одного прохода: сколько секций показано и сколько реальных изменений внесено
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    pub visible: usize,
    pub hidden: usize,
    pub changes: usize,
}

/// Движок видимости секций формы
#[derive(Debug, Clone)]
pub struct VisibilityEngine {
    status_control_id: String,
}

impl VisibilityEngine {
    pub fn new(config: &ListingFormConfig) -> Self {
        Self {
            status_control_id: config.status_control_id.clone(),
        }
    }

    /// Контролы, чьё состояние движок не трогает никогда
    pub fn is_exempt(&self, flags: &ControlFlags) -> bool {
        flags.id == self.status_control_id || flags.keep_enabled || flags.required
    }

    /// Показать/скрыть секции под текущий контекст.
    ///
    /// Повторный вызов с тем же контекстом ничего не меняет.
    pub fn apply<F: FormSurface>(
        &self,
        surface: &mut F,
        context: &SelectorContext,
        sections: &[ManagedSection<F::Section>],
    ) -> VisibilityReport {
        let mut report = VisibilityReport::default();

        for section in sections {
            let verdict = section.criteria.evaluate(context);
            let hidden = !verdict.visible;

            if surface.is_hidden(&section.handle) != hidden {
                surface.set_hidden(&section.handle, hidden);
                report.changes += 1;
            }

            if verdict.visible {
                report.visible += 1;
                report.changes += self.toggle_controls(surface, &section.handle, false);
            } else {
                report.hidden += 1;
                if verdict.disable_allowed {
                    report.changes += self.toggle_controls(surface, &section.handle, true);
                }
            }
        }

        report
    }

    /// Выключить контролы секции или вернуть им исходное состояние
    fn toggle_controls<F: FormSurface>(
        &self,
        surface: &mut F,
        section: &F::Section,
        disable: bool,
    ) -> usize {
        let mut changes = 0;

        for control in surface.controls(section) {
            if self.is_exempt(&surface.control_flags(&control)) {
                continue;
            }

            let initial = match surface.initial_disabled(&control) {
                Some(initial) => initial,
                None => {
                    let current = surface.is_disabled(&control);
                    surface.remember_initial_disabled(&control, current);
                    current
                }
            };

            let target = disable || initial;
            if surface.is_disabled(&control) != target {
                surface.set_disabled(&control, target);
                changes += 1;
            }
        }

        changes
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeForm;
    use super::*;

    fn engine() -> VisibilityEngine {
        VisibilityEngine::new(&ListingFormConfig::default())
    }

    fn flat_only() -> SectionCriteria {
        SectionCriteria::from_attributes(Some("flat"), None, None, None)
    }

    fn run(form: &mut FakeForm, context: &SelectorContext) -> VisibilityReport {
        let sections = form.sections();
        engine().apply(form, context, &sections)
    }

    #[test]
    fn test_hides_and_disables_non_matching_section() {
        let mut form = FakeForm::default();
        let floor = form.add_control("id_floor", false);
        let section = form.add_section(flat_only(), vec![floor]);

        let report = run(&mut form, &SelectorContext::new("house", "sale", ""));

        assert!(form.sections[section].hidden);
        assert!(form.controls[floor].disabled);
        assert_eq!(report.hidden, 1);
        assert_eq!(report.visible, 0);
    }

    #[test]
    fn test_second_apply_changes_nothing() {
        let mut form = FakeForm::default();
        let a = form.add_control("id_a", false);
        let b = form.add_control("id_b", true);
        form.add_section(flat_only(), vec![a]);
        form.add_section(
            SectionCriteria::from_attributes(None, None, Some("rent"), None),
            vec![b],
        );
        let context = SelectorContext::new("house", "rent_long", "");

        let first = run(&mut form, &context);
        let snapshot: Vec<(bool, Option<bool>)> = form
            .controls
            .iter()
            .map(|c| (c.disabled, c.initial_disabled))
            .collect();
        let second = run(&mut form, &context);

        assert!(first.changes > 0);
        assert_eq!(second.changes, 0);
        let after: Vec<(bool, Option<bool>)> = form
            .controls
            .iter()
            .map(|c| (c.disabled, c.initial_disabled))
            .collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_hide_show_cycle_restores_initial_state() {
        let mut form = FakeForm::default();
        let editable = form.add_control("id_rooms", false);
        let locked = form.add_control("id_cadastral", true);
        let section = form.add_section(flat_only(), vec![editable, locked]);

        run(&mut form, &SelectorContext::new("house", "", ""));
        assert!(form.controls[editable].disabled);
        assert!(form.controls[locked].disabled);

        run(&mut form, &SelectorContext::new("flat", "", ""));
        assert!(!form.sections[section].hidden);
        assert!(!form.controls[editable].disabled);
        assert!(form.controls[locked].disabled);
        assert_eq!(form.controls[locked].initial_disabled, Some(true));
    }

    #[test]
    fn test_initial_state_captured_once() {
        let mut form = FakeForm::default();
        let control = form.add_control("id_area", false);
        form.add_section(flat_only(), vec![control]);

        for category in ["house", "flat", "house", "land", "flat"] {
            run(&mut form, &SelectorContext::new(category, "", ""));
        }

        assert_eq!(form.controls[control].initial_disabled, Some(false));
        assert!(!form.controls[control].disabled);
    }

    #[test]
    fn test_exempt_controls_are_never_touched() {
        let mut form = FakeForm::default();
        let status = form.add_control("id_status", false);
        let required = form.add_control("id_title", false);
        form.controls[required].flags.required = true;
        let pinned = form.add_control("id_notes", false);
        form.controls[pinned].flags.keep_enabled = true;
        let section = form.add_section(flat_only(), vec![status, required, pinned]);

        run(&mut form, &SelectorContext::new("garage", "", ""));

        assert!(form.sections[section].hidden);
        for control in [status, required, pinned] {
            assert!(!form.controls[control].disabled);
            assert_eq!(form.controls[control].initial_disabled, None);
        }
    }

    #[test]
    fn test_wildcard_section_is_never_disabled() {
        let mut form = FakeForm::default();
        let control = form.add_control("id_price", false);
        let section = form.add_section(SectionCriteria::default(), vec![control]);

        for context in [
            SelectorContext::default(),
            SelectorContext::new("flat", "sale", "studio"),
            SelectorContext::new("garage", "rent_short", "parking"),
        ] {
            run(&mut form, &context);
            assert!(!form.sections[section].hidden);
            assert!(!form.controls[control].disabled);
        }
    }

    #[test]
    fn test_section_without_categories_hidden_but_not_disabled() {
        let mut form = FakeForm::default();
        let deposit = form.add_control("id_deposit", false);
        let section = form.add_section(
            SectionCriteria::from_attributes(None, None, Some("rent"), None),
            vec![deposit],
        );

        run(&mut form, &SelectorContext::new("flat", "sale", ""));

        assert!(form.sections[section].hidden);
        assert!(!form.controls[deposit].disabled);
    }

    #[test]
    fn test_empty_operation_hides_operation_scoped_section() {
        let mut form = FakeForm::default();
        let control = form.add_control("id_lease_term", false);
        let section = form.add_section(
            SectionCriteria::from_attributes(Some("flat"), None, Some("rent"), None),
            vec![control],
        );

        run(&mut form, &SelectorContext::new("flat", "", ""));
        assert!(form.sections[section].hidden);
        assert!(form.controls[control].disabled);

        run(&mut form, &SelectorContext::new("flat", "rent_short", ""));
        assert!(!form.sections[section].hidden);
        assert!(!form.controls[control].disabled);
    }
}
