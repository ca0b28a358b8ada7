//! Запоминание прокрутки между отправкой формы и следующей загрузкой страницы.
//!
//! Перед навигационным submit в sessionStorage кладётся снимок
//! `{scrollY, photosTop}`. При загрузке снимок читается один раз, удаляется
//! и страница прокручивается так, чтобы блок фотографий оказался на прежнем
//! месте. Любые ошибки хранилища молча игнорируются.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlFormElement};

use crate::shared::dom;

pub const STORAGE_KEY: &str = "listing_form_scroll";
/// Якорь, относительно которого восстанавливается позиция
pub const ANCHOR_SELECTOR: &str = "[data-photo-gallery]";
/// Формы, отправка которых должна сохранить позицию
pub const REMEMBER_FORM_SELECTOR: &str = "form[data-remember-scroll]";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSnapshot {
    #[serde(rename = "scrollY")]
    pub scroll_y: f64,
    #[serde(rename = "photosTop", default)]
    pub photos_top: Option<f64>,
}

impl ScrollSnapshot {
    /// Куда прокрутить, если блок фотографий сместился после перезагрузки
    pub fn restore_target(&self, current_photos_top: Option<f64>) -> f64 {
        let target = match (self.photos_top, current_photos_top) {
            (Some(saved), Some(current)) => self.scroll_y + (current - saved),
            _ => self.scroll_y,
        };
        if target.is_finite() {
            target.max(0.0)
        } else {
            0.0
        }
    }

    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str::<ScrollSnapshot>(raw)
            .ok()
            .filter(|snapshot| snapshot.scroll_y.is_finite())
    }
}

fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok()?
}

/// Абсолютная позиция якоря от начала документа
fn anchor_top(document: &Document) -> Option<f64> {
    let window = web_sys::window()?;
    let anchor = document.query_selector(ANCHOR_SELECTOR).ok().flatten()?;
    let scroll_y = window.scroll_y().ok()?;
    Some(anchor.get_bounding_client_rect().top() + scroll_y)
}

/// Сохранить текущую прокрутку перед отправкой формы
pub fn remember(document: &Document) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(storage) = session_storage() else {
        log::debug!("sessionStorage unavailable, scroll position not saved");
        return;
    };
    let snapshot = ScrollSnapshot {
        scroll_y: window.scroll_y().unwrap_or(0.0),
        photos_top: anchor_top(document),
    };
    if let Ok(json) = serde_json::to_string(&snapshot) {
        if storage.set_item(STORAGE_KEY, &json).is_err() {
            log::debug!("failed to persist scroll snapshot");
        }
    }
}

/// Прочитать снимок и сразу удалить его; битый снимок тоже удаляется
pub fn take() -> Option<ScrollSnapshot> {
    let storage = session_storage()?;
    let raw = storage.get_item(STORAGE_KEY).ok().flatten();
    let _ = storage.remove_item(STORAGE_KEY);
    let snapshot = raw.as_deref().and_then(ScrollSnapshot::decode);
    if raw.is_some() && snapshot.is_none() {
        log::debug!("discarded corrupt scroll snapshot");
    }
    snapshot
}

/// Восстановить позицию после загрузки, дождавшись одного тика таймера
pub fn restore_on_load(document: &Document) {
    let Some(snapshot) = take() else {
        return;
    };
    let document = document.clone();
    spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(0).await;
        let Some(window) = web_sys::window() else {
            return;
        };
        let target = snapshot.restore_target(anchor_top(&document));
        log::debug!("restoring scroll position to {}", target);
        window.scroll_to_with_x_and_y(0.0, target);
    });
}

/// Повесить сохранение прокрутки на submit помеченных форм
pub fn remember_on_submit(document: &Document) {
    for form in dom::query_all(document, REMEMBER_FORM_SELECTOR) {
        let Ok(form) = form.dyn_into::<HtmlFormElement>() else {
            continue;
        };
        let document = document.clone();
        let on_submit = Closure::wrap(Box::new(move |_: Event| {
            remember(&document);
        }) as Box<dyn FnMut(Event)>);
        let _ = form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref());
        on_submit.forget();
    }
}
