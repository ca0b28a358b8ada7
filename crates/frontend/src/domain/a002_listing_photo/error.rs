use thiserror::Error;

/// Ошибки массового удаления фотографий.
///
/// Текст `Display` показывается пользователю в `alert`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoDeleteError {
    #[error("Не удалось связаться с сервером: {0}")]
    Network(String),

    #[error("Не удалось удалить фотографии: {code}")]
    Server { status: u16, code: String },

    #[error("Некорректный ответ сервера: {0}")]
    InvalidResponse(String),
}
