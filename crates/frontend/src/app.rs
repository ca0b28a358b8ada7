use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event};

use crate::domain::a001_listing::ui::init_listing_form;
use crate::domain::a002_listing_photo::ui::init_photo_gallery;
use crate::shared::{dom, scroll_memory};

/// Подключить поведение страницы редактирования объекта.
///
/// Если модуль загрузился раньше, чем разобран документ, подключение
/// откладывается до `DOMContentLoaded`.
pub fn boot() {
    let Some(document) = dom::document() else {
        log::warn!("no document, nothing to enhance");
        return;
    };

    if document.ready_state() != "loading" {
        enhance(&document);
        return;
    }

    let doc = document.clone();
    let on_ready = Closure::once(move |_: Event| {
        enhance(&doc);
    });
    let _ = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref());
    on_ready.forget();
}

fn enhance(document: &Document) {
    init_listing_form(document);
    init_photo_gallery(document);
    scroll_memory::remember_on_submit(document);
    scroll_memory::restore_on_load(document);
}
