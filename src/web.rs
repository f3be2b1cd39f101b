//! Browser bindings: the share button, wired to the page's own share and clipboard APIs.
//!
//! Optional APIs are looked up on `navigator` at call time, the same way a script would
//! feature-test them, so a browser missing one of them still gets the next delivery.

use std::rc::Rc;

use js_sys::{Function, Object, Promise, Reflect};
use tracing::Level;
use url::Url;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::{
    config::{ShareConfig, EMBEDDED_CONFIG},
    logging,
    message::ShareMessage,
    platform::{
        Capability, Clipboard, ClipboardError, NativeShare, Page, PageError, Platform,
        ShareOutcome, UserActivation,
    },
    share::ShareAction,
};

fn property(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn method(target: &JsValue, key: &str) -> Option<Function> {
    property(target, key)?.dyn_into::<Function>().ok()
}

/// A DOM exception's name, or whatever else a rejection carried.
fn describe(err: &JsValue) -> String {
    property(err, "name")
        .and_then(|name| name.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

async fn settle(value: JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(Promise::resolve(&value)).await
}

pub struct WebPage {
    document: web_sys::Document,
    location: web_sys::Location,
}

impl Page for WebPage {
    fn text_content(&self, selector: &str) -> Option<String> {
        let element = self.document.query_selector(selector).ok().flatten()?;

        match element.dyn_into::<web_sys::HtmlElement>() {
            Ok(html) => Some(html.inner_text()),
            Err(element) => element.text_content(),
        }
    }

    fn location(&self) -> Result<Url, PageError> {
        let href = self
            .location
            .href()
            .map_err(|err| PageError::UnreadableLocation(describe(&err)))?;

        Ok(Url::parse(&href)?)
    }
}

pub struct WebShare {
    navigator: web_sys::Navigator,
}

impl WebShare {
    fn data(message: &ShareMessage) -> Object {
        let data = Object::new();

        for (key, value) in [
            ("title", message.title.as_str()),
            ("text", message.text.as_str()),
            ("url", message.url.as_str()),
        ] {
            // setting a property on a fresh plain object can't throw
            let _ = Reflect::set(&data, &JsValue::from_str(key), &JsValue::from_str(value));
        }

        data
    }
}

impl NativeShare for WebShare {
    fn can_share(&self, message: &ShareMessage) -> bool {
        let Some(can_share) = method(&self.navigator, "canShare") else {
            return false;
        };

        can_share
            .call1(&self.navigator, &Self::data(message))
            .map(|accepted| accepted.is_truthy())
            .unwrap_or(false)
    }

    async fn share(&self, message: &ShareMessage) -> ShareOutcome {
        let Some(share) = method(&self.navigator, "share") else {
            return ShareOutcome::Failed("navigator.share is missing".to_owned());
        };

        let result = match share.call1(&self.navigator, &Self::data(message)) {
            Ok(promise) => settle(promise).await,
            Err(err) => Err(err),
        };

        result.map(drop).map_err(|err| describe(&err)).into()
    }
}

pub struct WebClipboard {
    clipboard: JsValue,
}

impl Clipboard for WebClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let write_text = method(&self.clipboard, "writeText")
            .ok_or_else(|| ClipboardError::new("clipboard.writeText is missing"))?;

        let promise = write_text
            .call1(&self.clipboard, &JsValue::from_str(text))
            .map_err(|err| ClipboardError::new(describe(&err)))?;

        settle(promise)
            .await
            .map(drop)
            .map_err(|err| ClipboardError::new(describe(&err)))
    }
}

/// What `navigator.userActivation.isActive` says, if the browser has it.
fn activation(navigator: &JsValue) -> UserActivation {
    property(navigator, "userActivation")
        .and_then(|activation| property(&activation, "isActive"))
        .and_then(|active| active.as_bool())
        .into()
}

pub struct WebPlatform {
    window: web_sys::Window,
}

impl Platform for WebPlatform {
    type Share = WebShare;
    type Clipboard = WebClipboard;

    fn native_share(&self) -> Capability<WebShare> {
        let navigator = self.window.navigator();

        method(&navigator, "canShare")
            .map(|_| WebShare { navigator })
            .into()
    }

    fn clipboard(&self) -> Capability<WebClipboard> {
        property(&self.window.navigator(), "clipboard")
            .map(|clipboard| WebClipboard { clipboard })
            .into()
    }

    fn user_activation(&self) -> UserActivation {
        activation(&self.window.navigator())
    }

    fn notify(&self, notice: &str) {
        if let Err(err) = self.window.alert_with_message(notice) {
            tracing::warn!(reason = %describe(&err), "couldn't show notice");
        }
    }

    fn prompt(&self, message: &str, value: &str) {
        if let Err(err) = self.window.prompt_with_message_and_default(message, value) {
            tracing::warn!(reason = %describe(&err), "couldn't show prompt");
        }
    }
}

fn console(level: Level, line: &str) {
    let line = JsValue::from_str(line);

    if level == Level::ERROR {
        web_sys::console::error_1(&line);
    } else if level == Level::WARN {
        web_sys::console::warn_1(&line);
    } else if level == Level::INFO {
        web_sys::console::info_1(&line);
    } else if level == Level::DEBUG {
        web_sys::console::debug_1(&line);
    } else {
        web_sys::console::log_1(&line);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    logging::init_tracing(console);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let embedded = document
        .query_selector(EMBEDDED_CONFIG)?
        .and_then(|element| element.text_content());

    let config = ShareConfig::from_embedded(embedded.as_deref()).map_err(|err| {
        tracing::error!(%err, "invalid share config");
        JsValue::from_str(&err.to_string())
    })?;

    attach(window, config)
}

/// Binds the share action to the trigger element, then unhides it.
///
/// The element ships hidden, so pages where this never runs don't show a dead button.
#[tracing::instrument(skip_all)]
pub fn attach(window: web_sys::Window, config: ShareConfig) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let Some(trigger) = document.query_selector(&config.selectors.trigger)? else {
        tracing::warn!(selector = %config.selectors.trigger, "no share button on this page");
        return Ok(());
    };
    let trigger = trigger.dyn_into::<web_sys::HtmlElement>()?;

    let page = Rc::new(WebPage {
        document,
        location: window.location(),
    });
    let action = Rc::new(ShareAction::new(WebPlatform { window }, config));

    let on_click = Closure::<dyn FnMut()>::new(move || {
        let page = page.clone();
        let action = action.clone();

        spawn_local(async move {
            match action.share(&*page).await {
                Ok(delivery) => tracing::debug!(?delivery, "share finished"),
                Err(err) => tracing::error!(%err, "share failed"),
            }
        });
    });

    trigger.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    trigger.set_hidden(false);
    tracing::info!("share button ready");

    Ok(())
}
