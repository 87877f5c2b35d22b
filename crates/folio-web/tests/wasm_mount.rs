#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use folio_core::Dom;
use folio_web::{WebDom, mount_portfolio};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn page(markup: &str) -> WebDom {
    let dom = WebDom::new().expect("browser document");
    let body = dom.document().body().expect("body");
    body.set_inner_html(markup);
    dom
}

#[wasm_bindgen_test]
fn same_node_maps_to_same_handle() {
    let dom = page(r#"<div id="card" class="project-card"></div>"#);
    let by_id = dom.by_id("card").expect("card");
    assert_eq!(dom.by_id("card"), Some(by_id));
    assert_eq!(dom.query_all(".project-card"), vec![by_id]);
    assert_eq!(dom.attribute(by_id, "data-folio-id"), Some(by_id.get().to_string()));
}

#[wasm_bindgen_test]
fn inline_styles_set_and_clear() {
    let dom = page(r#"<div id="bar"></div>"#);
    let bar = dom.by_id("bar").expect("bar");
    dom.set_style(bar, "width", "75%");
    assert_eq!(dom.style(bar, "width").as_deref(), Some("75%"));
    dom.set_style(bar, "width", "");
    assert_eq!(dom.style(bar, "width"), None);
}

#[wasm_bindgen_test]
fn form_controls_expose_values() {
    let dom = page(
        r#"<input id="name" value="Jane"><textarea id="msg">Hi</textarea><button id="go">Send</button>"#,
    );
    let name = dom.by_id("name").expect("name");
    let msg = dom.by_id("msg").expect("msg");
    let go = dom.by_id("go").expect("go");
    assert_eq!(dom.value(name), "Jane");
    assert_eq!(dom.value(msg), "Hi");
    dom.set_value(name, "");
    assert_eq!(dom.value(name), "");
    dom.set_disabled(go, true);
    assert!(dom.is_disabled(go));
    dom.set_disabled(go, false);
    assert!(!dom.is_disabled(go));
}

#[wasm_bindgen_test]
fn created_elements_attach_and_detach() {
    let dom = page("");
    let body = dom.body().expect("body");
    let note = dom.create_element("div");
    assert!(!dom.is_connected(note));
    dom.append_child(body, note);
    assert!(dom.is_connected(note));
    dom.remove(note);
    assert!(!dom.is_connected(note));
}

#[wasm_bindgen_test]
fn removed_elements_are_released_and_ids_not_reused() {
    let dom = page("");
    let body = dom.body().expect("body");
    let baseline = dom.live_handles();

    let mut seen = Vec::new();
    for _ in 0..5 {
        let ripple = dom.create_element("span");
        dom.append_child(body, ripple);
        dom.remove(ripple);
        assert!(dom.element(ripple).is_none());
        seen.push(ripple);
    }
    assert_eq!(dom.live_handles(), baseline);
    seen.dedup();
    assert_eq!(seen.len(), 5, "each element gets a fresh id");

    let next = dom.create_element("span");
    dom.remove(seen[0]);
    assert!(dom.element(next).is_some(), "stale id leaves newer elements alone");
}

#[wasm_bindgen_test]
fn clicks_on_plain_nodes_are_not_registered() {
    let dom = page(r#"<p id="plain">text</p>"#);
    let handle = mount_portfolio(None).expect("mount");
    let plain = dom
        .document()
        .get_element_by_id("plain")
        .expect("plain")
        .dyn_into::<HtmlElement>()
        .expect("html element");

    plain.click();
    assert!(!plain.has_attribute("data-folio-id"));
    drop(handle);
}

#[wasm_bindgen_test]
fn mount_restores_stored_dark_theme() {
    let dom = page(
        r#"<input type="checkbox" id="theme-switch"><nav class="nav"></nav><section id="home"></section>"#,
    );
    let storage = dom
        .window()
        .local_storage()
        .expect("storage access")
        .expect("storage");
    storage.set_item("theme", "dark").expect("write theme");

    let handle = mount_portfolio(None).expect("mount");
    assert_eq!(handle.theme(), "dark");
    let body = dom.body().expect("body");
    assert_eq!(dom.attribute(body, "data-theme").as_deref(), Some("dark"));
    let switch = dom.by_id("theme-switch").expect("switch");
    assert!(dom.is_checked(switch));

    drop(handle);
    storage.remove_item("theme").expect("clear theme");
}

#[wasm_bindgen_test]
fn invalid_config_refuses_to_mount() {
    page("");
    assert!(mount_portfolio(Some(r#"{"counter":{"steps":0}}"#.to_string())).is_err());
}
