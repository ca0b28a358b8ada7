//! Мелкие помощники для работы с серверной разметкой через `web_sys`.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Поиск логического поля формы: сначала по `name`, затем по `id_<name>`
pub fn find_field(document: &Document, name: &str) -> Option<Element> {
    document
        .query_selector(&format!("[name=\"{}\"]", name))
        .ok()
        .flatten()
        .or_else(|| document.get_element_by_id(&format!("id_{}", name)))
}

/// Все элементы документа по селектору
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => collect_elements(&list),
        Err(_) => Vec::new(),
    }
}

/// Все потомки элемента по селектору
pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    match root.query_selector_all(selector) {
        Ok(list) => collect_elements(&list),
        Err(_) => Vec::new(),
    }
}

pub fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

fn collect_elements(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Значение `input`, `select` или `textarea`; для прочих элементов пустая строка
pub fn element_value(element: &Element) -> String {
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        return select.value();
    }
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        return textarea.value();
    }
    String::new()
}

/// Атрибут `data-*`; пустое значение считается отсутствующим
pub fn data_attr(element: &Element, name: &str) -> Option<String> {
    element
        .get_attribute(&format!("data-{}", name))
        .filter(|value| !value.trim().is_empty())
}

pub fn set_hidden(element: &Element, hidden: bool) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        html.set_hidden(hidden);
    } else {
        set_flag_attr(element, "hidden", hidden);
    }
}

pub fn is_hidden(element: &Element) -> bool {
    element.has_attribute("hidden")
}

/// Включение/выключение через атрибут `disabled`, общий для всех контролов
pub fn set_disabled(element: &Element, disabled: bool) {
    set_flag_attr(element, "disabled", disabled);
}

/// Булев атрибут: есть или нет
fn set_flag_attr(element: &Element, name: &str, on: bool) {
    let result = if on {
        element.set_attribute(name, "")
    } else {
        element.remove_attribute(name)
    };
    if let Err(e) = result {
        log::debug!("failed to toggle [{}] on <{}>: {:?}", name, element.tag_name(), e);
    }
}

pub fn is_disabled(element: &Element) -> bool {
    element.has_attribute("disabled")
}
