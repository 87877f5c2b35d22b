#![forbid(unsafe_code)]

//! Core: the behavior layer of the Folio portfolio page.
//!
//! # Role in Folio
//! `folio-core` owns every page behavior as deterministic, host-driven
//! logic. It never touches a browser API directly; instead each component
//! receives its element capabilities through the [`dom::Dom`] trait and its
//! notion of time through the shared [`timer::Scheduler`].
//!
//! # Primary responsibilities
//! - **Visibility**: [`observer::VisibilityObserver`] turns element geometry
//!   into per-element edge-crossing transitions.
//! - **Animations**: [`animate::AnimationCoordinator`] routes transitions to
//!   the reveal, counter and skill-bar animators.
//! - **Contact form**: [`form::ContactForm`] validates, locks the submit
//!   control, calls the [`form::EmailSender`] collaborator and reports
//!   through [`feedback::Feedback`].
//! - **Page chrome**: theme persistence, navigation highlighting, scroll
//!   effects and the decorative handlers.
//!
//! # How it fits in the system
//! `folio-web` implements [`dom::Dom`], [`theme::PreferenceStore`] and
//! [`form::EmailSender`] on top of `web-sys`, then drives
//! [`app::Portfolio`] from browser events and an animation-frame loop. Tests
//! drive the same type against [`memory::MemoryDom`].

pub mod animate;
pub mod app;
pub mod config;
pub mod decor;
pub mod dom;
pub mod error;
pub mod feedback;
pub mod form;
pub mod konami;
pub mod memory;
pub mod nav;
pub mod observer;
pub mod scroll;
pub mod theme;
pub mod throttle;
pub mod timer;

pub use app::Portfolio;
pub use config::FolioConfig;
pub use dom::{Dom, ElementId, Rect};
pub use error::{FolioError, Result};
