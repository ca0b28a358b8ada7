use contracts::domain::a002_listing_photo::{BulkDeleteRequest, BulkDeleteResponse};

use super::error::PhotoDeleteError;
use super::state::{DeleteEvent, DeleteState, DeleteTrigger, TransitionError};

/// Кнопки массовых действий галереи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryAction {
    SelectAll,
    ClearSelection,
    DeleteSelected,
    DeleteAll,
}

impl GalleryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryAction::SelectAll => "select-all",
            GalleryAction::ClearSelection => "clear-selection",
            GalleryAction::DeleteSelected => "delete-selected",
            GalleryAction::DeleteAll => "delete-all",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "select-all" => Some(GalleryAction::SelectAll),
            "clear-selection" => Some(GalleryAction::ClearSelection),
            "delete-selected" => Some(GalleryAction::DeleteSelected),
            "delete-all" => Some(GalleryAction::DeleteAll),
            _ => None,
        }
    }
}

/// Отображение галереи: карточки, счётчик, кнопки и диалоги
pub trait GalleryView {
    /// id карточек в порядке отображения
    fn card_ids(&self) -> Vec<String>;
    fn is_checked(&self, id: &str) -> bool;
    /// Отметка карточки вместе с подсветкой
    fn set_checked(&mut self, id: &str, checked: bool);
    fn remove_card(&mut self, id: &str);

    fn set_selection_count(&mut self, count: usize);
    fn set_action_enabled(&mut self, action: GalleryAction, enabled: bool);
    /// Кнопка, запустившая удаление, выключается на время запроса
    fn set_trigger_enabled(&mut self, trigger: &DeleteTrigger, enabled: bool);
    /// Скрыть массовые действия и показать сообщение о пустой галерее
    fn show_empty_state(&mut self);

    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Итог сверки после ответа сервера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub removed: Vec<String>,
    /// Запрошены, но сервер их не подтвердил
    pub kept: Vec<String>,
    pub remaining: usize,
    pub failed: bool,
}

/// Галерея фотографий объекта: выбор карточек и массовое удаление
pub struct PhotoGallery<V: GalleryView> {
    view: V,
    property_id: String,
    confirm_prompts: bool,
    state: DeleteState,
}

impl<V: GalleryView> PhotoGallery<V> {
    pub fn new(view: V, property_id: impl Into<String>, confirm_prompts: bool) -> Self {
        let mut gallery = Self {
            view,
            property_id: property_id.into(),
            confirm_prompts,
            state: DeleteState::Idle,
        };
        gallery.refresh_summary();
        if gallery.view.card_ids().is_empty() {
            gallery.view.show_empty_state();
        }
        gallery
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.view
            .card_ids()
            .into_iter()
            .filter(|id| self.view.is_checked(id))
            .collect()
    }

    pub fn select_all(&mut self) {
        self.set_all(true);
    }

    pub fn clear_selection(&mut self) {
        self.set_all(false);
    }

    /// Пользователь отметил или снял отметку с карточки
    pub fn toggle_card(&mut self, id: &str, checked: bool) {
        self.view.set_checked(id, checked);
        self.refresh_summary();
    }

    fn set_all(&mut self, checked: bool) {
        for id in self.view.card_ids() {
            self.view.set_checked(&id, checked);
        }
        self.refresh_summary();
    }

    /// Счётчик выбранных и доступность кнопок
    fn refresh_summary(&mut self) {
        let count = self.selected_ids().len();
        let delete_selected_busy = self.state.trigger() == Some(&DeleteTrigger::Selected);

        self.view.set_selection_count(count);
        self.view.set_action_enabled(GalleryAction::ClearSelection, count > 0);
        self.view
            .set_action_enabled(GalleryAction::DeleteSelected, count > 0 && !delete_selected_busy);
    }

    fn confirmation_message(trigger: &DeleteTrigger, count: usize) -> String {
        match trigger {
            DeleteTrigger::Selected => format!("Удалить выбранные фотографии? Количество: {}", count),
            DeleteTrigger::All => format!("Удалить все фотографии? Количество: {}", count),
            DeleteTrigger::Single(_) => "Удалить фотографию?".to_string(),
        }
    }

    /// Начать удаление.
    ///
    /// # Returns
    /// - Запрос для отправки на сервер
    /// - `None`, если удалять нечего, пользователь отказался или запрос уже идёт
    pub fn begin_delete(&mut self, trigger: DeleteTrigger) -> Option<BulkDeleteRequest> {
        let ids = match &trigger {
            DeleteTrigger::Selected => self.selected_ids(),
            DeleteTrigger::All => self.view.card_ids(),
            DeleteTrigger::Single(id) => self
                .view
                .card_ids()
                .into_iter()
                .filter(|card| card == id)
                .collect(),
        };

        if !self.state.is_idle() {
            log::warn!("photo delete ignored: {}", TransitionError::InFlight);
            return None;
        }
        if ids.is_empty() {
            return None;
        }
        if self.confirm_prompts && !self.view.confirm(&Self::confirmation_message(&trigger, ids.len())) {
            return None;
        }

        let next = self.state.transition(DeleteEvent::Submit {
            trigger: trigger.clone(),
            ids: ids.clone(),
        });
        match next {
            Ok(state) => self.state = state,
            Err(e) => {
                log::warn!("photo delete not started: {}", e);
                return None;
            }
        }

        self.view.set_trigger_enabled(&trigger, false);
        self.refresh_summary();
        log::info!("deleting {} photos of property {}", ids.len(), self.property_id);
        Some(BulkDeleteRequest::new(self.property_id.clone(), ids))
    }

    /// Применить ответ сервера к галерее и вернуться в `Idle`.
    ///
    /// Удаляются только карточки, подтверждённые сервером; при ошибке
    /// карточки не трогаются, пользователь получает `alert`.
    pub fn complete_delete(
        &mut self,
        outcome: Result<BulkDeleteResponse, PhotoDeleteError>,
    ) -> Result<ReconcileSummary, TransitionError> {
        let outcome = outcome.map(|response| response.deleted);
        self.state = self.state.transition(DeleteEvent::Resolved(outcome))?;

        let (trigger, requested, outcome) = match &self.state {
            DeleteState::Reconciling {
                trigger,
                requested,
                outcome,
            } => (trigger.clone(), requested.clone(), outcome.clone()),
            other => {
                return Err(TransitionError::Invalid {
                    state: other.name(),
                    event: "resolved",
                })
            }
        };

        let mut removed = Vec::new();
        let failed = match outcome {
            Ok(confirmed) => {
                let present = self.view.card_ids();
                for id in confirmed {
                    if present.contains(&id) && !removed.contains(&id) {
                        self.view.remove_card(&id);
                        removed.push(id);
                    }
                }
                false
            }
            Err(e) => {
                log::error!("photo delete failed: {}", e);
                self.view.alert(&e.to_string());
                true
            }
        };

        self.state = self.state.transition(DeleteEvent::Reconciled)?;

        // Кнопка «удалить выбранные» и есть триггер: счётчик решает последним
        self.view.set_trigger_enabled(&trigger, true);
        let remaining = self.view.card_ids().len();
        self.refresh_summary();
        if remaining == 0 {
            self.view.show_empty_state();
        }

        let kept = requested
            .into_iter()
            .filter(|id| !removed.contains(id))
            .collect();
        Ok(ReconcileSummary {
            removed,
            kept,
            remaining,
            failed,
        })
    }
}
