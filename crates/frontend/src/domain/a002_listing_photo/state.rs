use thiserror::Error;

use super::error::PhotoDeleteError;

/// Что запустило удаление
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTrigger {
    /// Кнопка «Удалить выбранные»
    Selected,
    /// Кнопка «Удалить все»
    All,
    /// Кнопка удаления на карточке
    Single(String),
}

/// Состояние удаления фотографий
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState {
    Idle,
    Submitting {
        trigger: DeleteTrigger,
        requested: Vec<String>,
    },
    Reconciling {
        trigger: DeleteTrigger,
        requested: Vec<String>,
        outcome: Result<Vec<String>, PhotoDeleteError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteEvent {
    Submit { trigger: DeleteTrigger, ids: Vec<String> },
    /// Ответ сервера: подтверждённые id или ошибка
    Resolved(Result<Vec<String>, PhotoDeleteError>),
    Reconciled,
}

impl DeleteEvent {
    fn name(&self) -> &'static str {
        match self {
            DeleteEvent::Submit { .. } => "submit",
            DeleteEvent::Resolved(_) => "resolved",
            DeleteEvent::Reconciled => "reconciled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("delete request already in flight")]
    InFlight,

    #[error("nothing to delete")]
    NothingToDelete,

    #[error("event '{event}' is not valid in state '{state}'")]
    Invalid {
        state: &'static str,
        event: &'static str,
    },
}

impl DeleteState {
    pub fn name(&self) -> &'static str {
        match self {
            DeleteState::Idle => "idle",
            DeleteState::Submitting { .. } => "submitting",
            DeleteState::Reconciling { .. } => "reconciling",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DeleteState::Idle)
    }

    pub fn trigger(&self) -> Option<&DeleteTrigger> {
        match self {
            DeleteState::Idle => None,
            DeleteState::Submitting { trigger, .. } | DeleteState::Reconciling { trigger, .. } => {
                Some(trigger)
            }
        }
    }

    /// Следующее состояние.
    ///
    /// `Idle → Submitting → Reconciling → Idle`; всё остальное отклоняется,
    /// в том числе повторная отправка, пока запрос не вернулся.
    pub fn transition(&self, event: DeleteEvent) -> Result<DeleteState, TransitionError> {
        match (self, event) {
            (DeleteState::Idle, DeleteEvent::Submit { ids, .. }) if ids.is_empty() => {
                Err(TransitionError::NothingToDelete)
            }
            (DeleteState::Idle, DeleteEvent::Submit { trigger, ids }) => Ok(DeleteState::Submitting {
                trigger,
                requested: ids,
            }),
            (DeleteState::Submitting { .. } | DeleteState::Reconciling { .. }, DeleteEvent::Submit { .. }) => {
                Err(TransitionError::InFlight)
            }
            (DeleteState::Submitting { trigger, requested }, DeleteEvent::Resolved(outcome)) => {
                Ok(DeleteState::Reconciling {
                    trigger: trigger.clone(),
                    requested: requested.clone(),
                    outcome,
                })
            }
            (DeleteState::Reconciling { .. }, DeleteEvent::Reconciled) => Ok(DeleteState::Idle),
            (state, event) => Err(TransitionError::Invalid {
                state: state.name(),
                event: event.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_cycle() {
        let submitting = DeleteState::Idle
            .transition(DeleteEvent::Submit {
                trigger: DeleteTrigger::Selected,
                ids: ids(&["1", "2"]),
            })
            .unwrap();
        assert_eq!(submitting.name(), "submitting");
        assert_eq!(submitting.trigger(), Some(&DeleteTrigger::Selected));

        let reconciling = submitting
            .transition(DeleteEvent::Resolved(Ok(ids(&["1"]))))
            .unwrap();
        match &reconciling {
            DeleteState::Reconciling {
                requested, outcome, ..
            } => {
                assert_eq!(requested, &ids(&["1", "2"]));
                assert_eq!(outcome, &Ok(ids(&["1"])));
            }
            other => panic!("unexpected state {:?}", other),
        }

        assert_eq!(
            reconciling.transition(DeleteEvent::Reconciled).unwrap(),
            DeleteState::Idle
        );
    }

    #[test]
    fn test_double_submit_rejected() {
        let submitting = DeleteState::Idle
            .transition(DeleteEvent::Submit {
                trigger: DeleteTrigger::All,
                ids: ids(&["5"]),
            })
            .unwrap();

        let again = submitting.transition(DeleteEvent::Submit {
            trigger: DeleteTrigger::All,
            ids: ids(&["5"]),
        });
        assert_eq!(again, Err(TransitionError::InFlight));
    }

    #[test]
    fn test_empty_submit_rejected() {
        let result = DeleteState::Idle.transition(DeleteEvent::Submit {
            trigger: DeleteTrigger::Selected,
            ids: Vec::new(),
        });
        assert_eq!(result, Err(TransitionError::NothingToDelete));
    }

    #[test]
    fn test_out_of_order_events_rejected() {
        assert_eq!(
            DeleteState::Idle.transition(DeleteEvent::Resolved(Ok(Vec::new()))),
            Err(TransitionError::Invalid {
                state: "idle",
                event: "resolved",
            })
        );
        assert!(DeleteState::Idle.transition(DeleteEvent::Reconciled).is_err());

        let submitting = DeleteState::Submitting {
            trigger: DeleteTrigger::Single("9".into()),
            requested: ids(&["9"]),
        };
        assert!(submitting.transition(DeleteEvent::Reconciled).is_err());
    }
}
