//! Bindings to the Auth0 single-page-app SDK loaded by the page shell.
//!
//! Only compiled for the browser. The SDK owns the OAuth flow; this module
//! adapts it to [`IdentityProvider`] and keeps the one client instance for
//! the lifetime of the page.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Promise, JSON};
use leptos::logging::warn;
use naff_types::{IdentityConfig, IdentityUser};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::session::{get_public_config, IdentityError, IdentityProvider, SessionStore};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = auth0)]
    type Auth0Client;

    #[wasm_bindgen(constructor, js_namespace = auth0, catch)]
    fn new(options: &JsValue) -> Result<Auth0Client, JsValue>;

    #[wasm_bindgen(method, js_name = checkSession)]
    fn check_session(this: &Auth0Client) -> Promise;

    #[wasm_bindgen(method, js_name = isAuthenticated)]
    fn is_authenticated(this: &Auth0Client) -> Promise;

    #[wasm_bindgen(method, js_name = getUser)]
    fn get_user(this: &Auth0Client) -> Promise;

    #[wasm_bindgen(method, js_name = getTokenSilently)]
    fn get_token_silently(this: &Auth0Client) -> Promise;

    #[wasm_bindgen(method, js_name = loginWithPopup)]
    fn login_with_popup(this: &Auth0Client) -> Promise;

    #[wasm_bindgen(method)]
    fn logout(this: &Auth0Client, options: &JsValue) -> Promise;
}

thread_local! {
    static PROVIDER: RefCell<Option<Rc<Auth0Provider>>> = const { RefCell::new(None) };
}

pub struct Auth0Provider {
    client: Auth0Client,
}

impl Auth0Provider {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let options = to_js(&serde_json::json!({
            "domain": config.domain,
            "clientId": config.client_id,
        }))?;
        let client = Auth0Client::new(&options).map_err(js_error)?;
        Ok(Self { client })
    }
}

impl IdentityProvider for Auth0Provider {
    async fn check_session(&self) -> Result<(), IdentityError> {
        settle(self.client.check_session()).await.map(|_| ())
    }

    async fn is_authenticated(&self) -> Result<bool, IdentityError> {
        let value = settle(self.client.is_authenticated()).await?;
        value
            .as_bool()
            .ok_or_else(|| IdentityError::Decode("isAuthenticated did not return a boolean".into()))
    }

    async fn get_user(&self) -> Result<Option<IdentityUser>, IdentityError> {
        let value = settle(self.client.get_user()).await?;
        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        let json: String = JSON::stringify(&value).map_err(js_error)?.into();
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| IdentityError::Decode(e.to_string()))
    }

    async fn get_token_silently(&self) -> Result<String, IdentityError> {
        let value = settle(self.client.get_token_silently()).await?;
        value
            .as_string()
            .ok_or_else(|| IdentityError::Decode("getTokenSilently did not return a string".into()))
    }

    async fn login_with_popup(&self) -> Result<(), IdentityError> {
        settle(self.client.login_with_popup()).await.map(|_| ())
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        let options = to_js(&serde_json::json!({ "openUrl": false }))?;
        settle(self.client.logout(&options)).await.map(|_| ())
    }
}

async fn settle(promise: Promise) -> Result<JsValue, IdentityError> {
    JsFuture::from(promise).await.map_err(js_error)
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, IdentityError> {
    JSON::parse(&value.to_string()).map_err(js_error)
}

fn js_error(value: JsValue) -> IdentityError {
    let message = value
        .as_string()
        .or_else(|| {
            JSON::stringify(&value)
                .ok()
                .map(String::from)
        })
        .unwrap_or_else(|| "unknown error".into());
    IdentityError::Provider(message)
}

fn provider() -> Option<Rc<Auth0Provider>> {
    PROVIDER.with(|p| p.borrow().clone())
}

/// Builds the provider from the server's public config and initialises the
/// session store against it.
pub async fn connect(session: &SessionStore) {
    let config = match get_public_config().await {
        Ok(config) => config,
        Err(e) => {
            warn!("could not fetch public config: {e}");
            return;
        }
    };

    if !config.identity.is_configured() {
        warn!("identity provider not configured, browser sign-in disabled");
        return;
    }

    let provider = match Auth0Provider::new(&config.identity) {
        Ok(provider) => Rc::new(provider),
        Err(e) => {
            warn!("could not create identity client: {e}");
            return;
        }
    };
    PROVIDER.with(|p| *p.borrow_mut() = Some(Rc::clone(&provider)));

    if let Err(e) = session.init(provider.as_ref()).await {
        warn!("session check failed: {e}");
    }
}

pub fn spawn_login(session: SessionStore) {
    let Some(provider) = provider() else {
        warn!("identity provider not ready");
        return;
    };
    spawn_local(async move {
        if let Err(e) = session.login(provider.as_ref()).await {
            warn!("login failed: {e}");
        }
    });
}

pub fn spawn_logout(session: SessionStore) {
    let Some(provider) = provider() else {
        session.clear();
        return;
    };
    spawn_local(async move {
        if let Err(e) = session.logout(provider.as_ref()).await {
            warn!("logout failed: {e}");
        }
    });
}
