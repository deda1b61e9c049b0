//! Terminal output helpers
//!
//! Uses `cliclack` for styled output in interactive terminals and falls back
//! to plain `[OK]`/`[WARN]` lines in CI or when stdout is piped.
//!
//! # Example
//!
//! ```rust,ignore
//! use binscope::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect();
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Scanning ./services...");
//! // ... walk the tree ...
//! spinner.stop("Scanned 12 binaries");
//!
//! ui::step_warn_hint(&ctx, "Skipped cmd/broken/main.go", "line 3: expected import path");
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{intro, remark, step_info, step_ok_detail, step_warn_hint};
pub use progress::TaskSpinner;
