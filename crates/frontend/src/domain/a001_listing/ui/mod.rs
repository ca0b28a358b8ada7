//! Привязка формы объекта к серверной разметке.
//!
//! # Разметка
//! ```html
//! <div id="subtypes-data" hidden
//!      data-subtypes='{"flat": [["studio", "Студия"]]}'
//!      data-placeholder="— не выбрано —"></div>
//!
//! <select name="category">...</select>
//! <select name="operation">...</select>
//! <select name="subtype"></select>
//!
//! <fieldset data-category="flat,room" data-operation="rent">
//!     <input name="deposit">
//!     <input name="floor" data-keep-enabled="true">
//! </fieldset>
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlOptionElement, HtmlSelectElement};

use super::config::ListingFormConfig;
use super::form::ListingFormController;
use super::subtype_options::SubtypeField;
use super::visibility::{ControlFlags, FormSurface, ManagedSection, SectionCriteria};
use crate::shared::dom;

pub const SECTION_SELECTOR: &str = "[data-section], [data-category], [data-operation], [data-subtype]";
pub const CONTROL_SELECTOR: &str = "input, select, textarea";
const INITIAL_DISABLED_ATTR: &str = "data-initial-disabled";
const KEEP_ENABLED_ATTR: &str = "data-keep-enabled";

/// Секции и контролы формы в живом документе
pub struct DomFormSurface {
    document: Document,
}

impl DomFormSurface {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
        }
    }
}

fn section_criteria(section: &Element) -> SectionCriteria {
    SectionCriteria::from_attributes(
        section.get_attribute("data-category").as_deref(),
        section.get_attribute("data-section").as_deref(),
        section.get_attribute("data-operation").as_deref(),
        section.get_attribute("data-subtype").as_deref(),
    )
}

impl FormSurface for DomFormSurface {
    type Section = Element;
    type Control = Element;

    fn sections(&self) -> Vec<ManagedSection<Element>> {
        dom::query_all(&self.document, SECTION_SELECTOR)
            .into_iter()
            .map(|section| {
                let criteria = section_criteria(&section);
                ManagedSection::new(section, criteria)
            })
            .collect()
    }

    fn controls(&self, section: &Element) -> Vec<Element> {
        dom::query_all_in(section, CONTROL_SELECTOR)
    }

    fn control_flags(&self, control: &Element) -> ControlFlags {
        ControlFlags {
            id: control.id(),
            required: control.has_attribute("required"),
            keep_enabled: control.get_attribute(KEEP_ENABLED_ATTR).as_deref() == Some("true"),
        }
    }

    fn is_hidden(&self, section: &Element) -> bool {
        dom::is_hidden(section)
    }

    fn set_hidden(&mut self, section: &Element, hidden: bool) {
        dom::set_hidden(section, hidden);
    }

    fn is_disabled(&self, control: &Element) -> bool {
        dom::is_disabled(control)
    }

    fn set_disabled(&mut self, control: &Element, disabled: bool) {
        dom::set_disabled(control, disabled);
    }

    fn initial_disabled(&self, control: &Element) -> Option<bool> {
        match control.get_attribute(INITIAL_DISABLED_ATTR).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    fn remember_initial_disabled(&mut self, control: &Element, disabled: bool) {
        let value = if disabled { "true" } else { "false" };
        if let Err(e) = control.set_attribute(INITIAL_DISABLED_ATTR, value) {
            log::debug!("failed to remember initial disabled state: {:?}", e);
        }
    }
}

/// Поле подтипа. Варианты перестраиваются только у `<select>`,
/// для прочих элементов доступно лишь значение.
pub struct DomSubtypeField {
    element: Element,
}

impl DomSubtypeField {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn is_select(&self) -> bool {
        self.element.dyn_ref::<HtmlSelectElement>().is_some()
    }
}

impl SubtypeField for DomSubtypeField {
    fn value(&self) -> String {
        dom::element_value(&self.element)
    }

    fn set_value(&mut self, value: &str) {
        if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn clear_options(&mut self) {
        if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.set_length(0);
        }
    }

    fn append_option(&mut self, value: &str, label: &str) {
        let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() else {
            return;
        };
        match HtmlOptionElement::new_with_text_and_value(label, value) {
            Ok(option) => {
                let _ = select.append_child(&option);
            }
            Err(e) => log::warn!("failed to create subtype option: {:?}", e),
        }
    }
}

type DomController = ListingFormController<DomFormSurface, DomSubtypeField>;

/// Поля-селекторы, найденные на странице
#[derive(Clone)]
struct SelectorFields {
    category: Option<Element>,
    operation: Option<Element>,
}

impl SelectorFields {
    fn category(&self) -> String {
        self.category.as_ref().map(dom::element_value).unwrap_or_default()
    }

    fn operation(&self) -> String {
        self.operation.as_ref().map(dom::element_value).unwrap_or_default()
    }
}

fn listen_change<F>(element: &Element, handler: F)
where
    F: FnMut() + 'static,
{
    let mut handler = handler;
    let on_change = Closure::wrap(Box::new(move |_: Event| handler()) as Box<dyn FnMut(Event)>);
    let _ = element.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
    on_change.forget();
}

/// Подключить форму объекта: первичный проход и обработчики `change`
pub fn init_listing_form(document: &Document) {
    let config = ListingFormConfig::load(document);

    let fields = SelectorFields {
        category: dom::find_field(document, &config.category_field),
        operation: dom::find_field(document, &config.operation_field),
    };
    let subtype_element = dom::find_field(document, &config.subtype_field);

    if fields.category.is_none() {
        log::debug!("category field not found, category matching uses empty value");
    }

    let subtype = subtype_element.clone().map(DomSubtypeField::new);
    let rebuild_subtypes = ListingFormConfig::has_data_node(document)
        && fields.category.is_some()
        && subtype.as_ref().map(DomSubtypeField::is_select).unwrap_or(false);

    let controller: Rc<RefCell<DomController>> = Rc::new(RefCell::new(ListingFormController::new(
        &config,
        DomFormSurface::new(document),
        subtype,
        rebuild_subtypes,
    )));

    if let Some(category_field) = fields.category.as_ref() {
        let controller = controller.clone();
        let fields = fields.clone();
        listen_change(category_field, move || {
            controller
                .borrow_mut()
                .category_changed(&fields.category(), &fields.operation());
        });
    }

    for element in [fields.operation.as_ref(), subtype_element.as_ref()].into_iter().flatten() {
        let controller = controller.clone();
        let fields = fields.clone();
        listen_change(element, move || {
            controller
                .borrow_mut()
                .refresh(&fields.category(), &fields.operation());
        });
    }

    let report = controller
        .borrow_mut()
        .start(&fields.category(), &fields.operation());
    log::info!(
        "listing form ready: {} visible, {} hidden sections",
        report.visible,
        report.hidden
    );
}
