//! Галерея фотографий на странице редактирования объекта.
//!
//! # Разметка
//! ```html
//! <section data-photo-gallery data-property-id="42"
//!          data-delete-url="/panel/photos/bulk-delete/">
//!     <div data-photo-bulk-actions>
//!         <span data-photo-selection-count></span>
//!         <button data-photo-action="select-all">Выбрать все</button>
//!         <button data-photo-action="clear-selection">Снять выбор</button>
//!         <button data-photo-action="delete-selected">Удалить выбранные</button>
//!         <button data-photo-action="delete-all">Удалить все</button>
//!     </div>
//!     <div data-photo-list>
//!         <figure data-photo-card data-photo-id="17">
//!             <input type="checkbox" data-photo-select>
//!             <button data-photo-delete>×</button>
//!         </figure>
//!     </div>
//! </section>
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlInputElement};

use super::api;
use super::gallery::{GalleryAction, GalleryView, PhotoGallery};
use super::state::DeleteTrigger;
use crate::shared::{api_utils, dom, scroll_memory};

pub const GALLERY_SELECTOR: &str = "[data-photo-gallery]";
const LIST_SELECTOR: &str = "[data-photo-list]";
const CARD_SELECTOR: &str = "[data-photo-card]";
const CHECKBOX_SELECTOR: &str = "input[data-photo-select]";
const CARD_DELETE_SELECTOR: &str = "[data-photo-delete]";
const ACTION_SELECTOR: &str = "[data-photo-action]";
const COUNT_SELECTOR: &str = "[data-photo-selection-count]";
const BULK_ACTIONS_SELECTOR: &str = "[data-photo-bulk-actions]";
const UPLOAD_SELECTOR: &str = "input[data-photo-upload]";
const SELECTED_CLASS: &str = "is-selected";
const DEFAULT_EMPTY_TEXT: &str = "Фотографий пока нет";

/// Настройки галереи из атрибутов корневого элемента
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    pub property_id: String,
    pub delete_url: String,
    pub empty_text: String,
    pub confirm_prompts: bool,
}

impl GalleryConfig {
    /// # Returns
    /// - `None`, если не указан объект или адрес удаления
    pub fn from_root(root: &Element) -> Option<Self> {
        let property_id = dom::data_attr(root, "property-id")?;
        let delete_url = dom::data_attr(root, "delete-url")?;
        Some(Self {
            property_id,
            delete_url,
            empty_text: dom::data_attr(root, "empty-text").unwrap_or_else(|| DEFAULT_EMPTY_TEXT.to_string()),
            confirm_prompts: dom::data_attr(root, "confirm").as_deref() != Some("false"),
        })
    }
}

/// Галерея в живом документе
pub struct DomGalleryView {
    root: Element,
    empty_text: String,
}

impl DomGalleryView {
    pub fn new(root: Element, empty_text: impl Into<String>) -> Self {
        Self {
            root,
            empty_text: empty_text.into(),
        }
    }

    fn cards(&self) -> Vec<Element> {
        dom::query_all_in(&self.root, CARD_SELECTOR)
    }

    fn card(&self, id: &str) -> Option<Element> {
        self.cards()
            .into_iter()
            .find(|card| dom::data_attr(card, "photo-id").as_deref() == Some(id))
    }

    fn checkbox(card: &Element) -> Option<HtmlInputElement> {
        dom::query_in(card, CHECKBOX_SELECTOR)?.dyn_into::<HtmlInputElement>().ok()
    }

    fn action_buttons(&self, action: GalleryAction) -> Vec<Element> {
        dom::query_all_in(
            &self.root,
            &format!("[data-photo-action=\"{}\"]", action.as_str()),
        )
    }
}

impl GalleryView for DomGalleryView {
    fn card_ids(&self) -> Vec<String> {
        self.cards()
            .iter()
            .filter_map(|card| dom::data_attr(card, "photo-id"))
            .collect()
    }

    fn is_checked(&self, id: &str) -> bool {
        self.card(id)
            .as_ref()
            .and_then(Self::checkbox)
            .map(|checkbox| checkbox.checked())
            .unwrap_or(false)
    }

    fn set_checked(&mut self, id: &str, checked: bool) {
        let Some(card) = self.card(id) else {
            return;
        };
        if let Some(checkbox) = Self::checkbox(&card) {
            checkbox.set_checked(checked);
        }
        let classes = card.class_list();
        let _ = if checked {
            classes.add_1(SELECTED_CLASS)
        } else {
            classes.remove_1(SELECTED_CLASS)
        };
    }

    fn remove_card(&mut self, id: &str) {
        if let Some(card) = self.card(id) {
            card.remove();
        }
    }

    fn set_selection_count(&mut self, count: usize) {
        for label in dom::query_all_in(&self.root, COUNT_SELECTOR) {
            label.set_text_content(Some(&format!("Выбрано: {}", count)));
        }
    }

    fn set_action_enabled(&mut self, action: GalleryAction, enabled: bool) {
        for button in self.action_buttons(action) {
            dom::set_disabled(&button, !enabled);
        }
    }

    fn set_trigger_enabled(&mut self, trigger: &DeleteTrigger, enabled: bool) {
        let buttons = match trigger {
            DeleteTrigger::Selected => self.action_buttons(GalleryAction::DeleteSelected),
            DeleteTrigger::All => self.action_buttons(GalleryAction::DeleteAll),
            DeleteTrigger::Single(id) => self
                .card(id)
                .map(|card| dom::query_all_in(&card, CARD_DELETE_SELECTOR))
                .unwrap_or_default(),
        };
        for button in buttons {
            dom::set_disabled(&button, !enabled);
        }
    }

    fn show_empty_state(&mut self) {
        for controls in dom::query_all_in(&self.root, BULK_ACTIONS_SELECTOR) {
            dom::set_hidden(&controls, true);
        }
        let Some(list) = dom::query_in(&self.root, LIST_SELECTOR) else {
            return;
        };
        list.set_inner_html("");
        let Some(document) = list.owner_document() else {
            return;
        };
        if let Ok(message) = document.create_element("p") {
            message.set_class_name("photo-gallery__empty");
            message.set_text_content(Some(&self.empty_text));
            let _ = list.append_child(&message);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|win| win.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(win) = web_sys::window() {
            let _ = win.alert_with_message(message);
        }
    }
}

type SharedGallery = Rc<RefCell<PhotoGallery<DomGalleryView>>>;

/// Запустить удаление и применить ответ, когда он придёт
fn run_delete(gallery: &SharedGallery, document: &Document, delete_url: &str, trigger: DeleteTrigger) {
    let Some(request) = gallery.borrow_mut().begin_delete(trigger) else {
        return;
    };
    let csrf = api_utils::csrf_token(document);
    let gallery = gallery.clone();
    let url = delete_url.to_string();

    spawn_local(async move {
        let outcome = api::bulk_delete(&url, &request, csrf.as_deref()).await;
        match gallery.borrow_mut().complete_delete(outcome) {
            Ok(summary) => {
                if !summary.kept.is_empty() {
                    log::warn!("server kept photos {:?}", summary.kept);
                }
            }
            Err(e) => log::error!("photo delete response dropped: {}", e),
        }
    });
}

/// Ближайший предок (или сам элемент) события, подходящий под селектор
fn event_target_closest(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

fn card_id_of(element: &Element) -> Option<String> {
    let card = element.closest(CARD_SELECTOR).ok().flatten()?;
    dom::data_attr(&card, "photo-id")
}

fn wire_clicks(root: &Element, gallery: SharedGallery, document: Document, delete_url: String) {
    let on_click = Closure::wrap(Box::new(move |event: Event| {
        if let Some(button) = event_target_closest(&event, CARD_DELETE_SELECTOR) {
            event.prevent_default();
            if let Some(id) = card_id_of(&button) {
                run_delete(&gallery, &document, &delete_url, DeleteTrigger::Single(id));
            }
            return;
        }

        let Some(button) = event_target_closest(&event, ACTION_SELECTOR) else {
            return;
        };
        let Some(action) = button
            .get_attribute("data-photo-action")
            .as_deref()
            .and_then(GalleryAction::parse)
        else {
            return;
        };
        event.prevent_default();

        match action {
            GalleryAction::SelectAll => gallery.borrow_mut().select_all(),
            GalleryAction::ClearSelection => gallery.borrow_mut().clear_selection(),
            GalleryAction::DeleteSelected => {
                run_delete(&gallery, &document, &delete_url, DeleteTrigger::Selected)
            }
            GalleryAction::DeleteAll => run_delete(&gallery, &document, &delete_url, DeleteTrigger::All),
        }
    }) as Box<dyn FnMut(Event)>);

    let _ = root.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
    on_click.forget();
}

fn wire_checkboxes(root: &Element, gallery: SharedGallery) {
    let on_change = Closure::wrap(Box::new(move |event: Event| {
        let Some(target) = event_target_closest(&event, CHECKBOX_SELECTOR) else {
            return;
        };
        let Some(id) = card_id_of(&target) else {
            return;
        };
        let checked = target
            .dyn_ref::<HtmlInputElement>()
            .map(|input| input.checked())
            .unwrap_or(false);
        gallery.borrow_mut().toggle_card(&id, checked);
    }) as Box<dyn FnMut(Event)>);

    let _ = root.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
    on_change.forget();
}

/// Выбор файла сразу отправляет форму загрузки штатным submit
fn wire_upload(document: &Document) {
    for input in dom::query_all(document, UPLOAD_SELECTOR) {
        let Ok(input) = input.dyn_into::<HtmlInputElement>() else {
            continue;
        };
        let document = document.clone();
        let upload = input.clone();
        let on_change = Closure::wrap(Box::new(move |_: Event| {
            let has_files = upload.files().map(|files| files.length() > 0).unwrap_or(false);
            if !has_files {
                return;
            }
            let Some(form) = upload.form() else {
                return;
            };
            scroll_memory::remember(&document);
            if let Err(e) = form.submit() {
                log::error!("photo upload submit failed: {:?}", e);
            }
        }) as Box<dyn FnMut(Event)>);
        let _ = input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
        on_change.forget();
    }
}

/// Подключить галерею фотографий, если она есть на странице
pub fn init_photo_gallery(document: &Document) {
    wire_upload(document);

    let Some(root) = document.query_selector(GALLERY_SELECTOR).ok().flatten() else {
        return;
    };
    let Some(config) = GalleryConfig::from_root(&root) else {
        log::warn!("photo gallery without data-property-id/data-delete-url, bulk actions disabled");
        return;
    };

    let view = DomGalleryView::new(root.clone(), config.empty_text.clone());
    let gallery: SharedGallery = Rc::new(RefCell::new(PhotoGallery::new(
        view,
        config.property_id.clone(),
        config.confirm_prompts,
    )));

    wire_clicks(&root, gallery.clone(), document.clone(), config.delete_url.clone());
    wire_checkboxes(&root, gallery);
    log::info!("photo gallery ready for property {}", config.property_id);
}
