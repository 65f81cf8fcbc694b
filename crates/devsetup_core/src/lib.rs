//! # devsetup_core
//!
//! Config resolution and setup orchestration for dev-setup.
//!
//! A setup run layers three configs and renders a project template tree:
//!
//! - **base**: the environment's default config, placeholders removed
//! - **override**: the user-editable `.dev-setup.yml`, created on first run
//! - **computed**: values derived by rendering a template against the override
//!
//! The override always wins over the computed layer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use devsetup_core::{run_setup, AutoAccept, Environment, SetupLayout, SetupRequest};
//!
//! let layout = SetupLayout::for_project(".");
//! let request = SetupRequest::new()
//!     .package_name("robot_driver")
//!     .environment(Environment::RosHumble);
//!
//! let outcome = run_setup(&layout, &request, &mut AutoAccept).unwrap();
//! println!("{} files written", outcome.report.file_count());
//! ```

pub mod decision;
pub mod environment;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod request;
pub mod resolver;

pub use decision::{AutoAccept, ConflictResolver, KeepCurrent};
pub use environment::Environment;
pub use error::{CoreError, CoreResult};
pub use layout::SetupLayout;
pub use request::{SetupRequest, DEFAULT_PACKAGE_NAME};
pub use resolver::{run_setup, ConfigResolver, Resolution, SetupOutcome};
