#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
//! Test doubles for ctxmenu hosts.
//!
//! Everything here is deterministic: time only moves when a test calls
//! [`ManualTimers::advance`], assets only finish loading when a test says so,
//! and popups are rendered into memory.
//!
//! ```
//! use ctxmenu_core::host::TimerService;
//! use ctxmenu_test::ManualTimers;
//! use std::time::Duration;
//!
//! let mut timers = ManualTimers::new();
//! let id = timers.schedule(Duration::from_millis(500));
//! assert!(timers.advance(499).is_empty());
//! assert_eq!(timers.advance(1), vec![id]);
//! ```

mod assets;
mod clock;
pub mod fixture;
mod surface;

pub use assets::ScriptedAssets;
pub use clock::ManualTimers;
pub use surface::{ContainerRecord, HeadlessSurface};
