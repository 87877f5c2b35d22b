#![forbid(unsafe_code)]

//! Browser binding for the Folio portfolio page.
//!
//! [`folio_core::Portfolio`] does all the work; this crate supplies the
//! browser-backed capabilities it needs and forwards DOM events to it:
//!
//! - `web_dom`: [`folio_core::Dom`] over `web-sys` elements.
//! - `storage`: [`folio_core::theme::PreferenceStore`] over `localStorage`.
//! - `emailjs`: [`folio_core::form::EmailSender`] over the page's `emailjs`
//!   global.
//! - `console`: panic hook and a `tracing` writer targeting the console.
//! - `wasm`: the `mountPortfolio` export and the animation-frame driver.
//!
//! Only [`bridge`] compiles on native targets.

pub mod bridge;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod emailjs;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod web_dom;

#[cfg(target_arch = "wasm32")]
pub use emailjs::EmailJsSender;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use wasm::{PortfolioHandle, mount_portfolio};
#[cfg(target_arch = "wasm32")]
pub use web_dom::WebDom;
