// -- Lint policy ---------------------------------------------------------
// Mirrors [workspace.lints] in Cargo.toml; keep the two in sync.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// String and import hygiene
#![deny(clippy::str_to_string)]
#![deny(clippy::wildcard_imports)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Renderer-agnostic styling, clustering, and click-interaction engine
//! for map feature layers.
//!
//! Cartovis turns GeoJSON point data into styled render nodes — with
//! optional marker clustering — and drives the click-to-select / popup
//! interaction state machine on top of them. It never rasterizes
//! anything: a host renderer draws the [`layer::StyledNode`]s the engine
//! produces and feeds pointer clicks back in.
//!
//! # Key entry points
//!
//! - [`map::Map`] - the layer stack, overlays, and shared viewport
//! - [`layer::VectorLayer`] - a feature source bound to a style table
//! - [`style::StyleTable`] / [`style::resolve_style`] - conditional style
//!   dispatch, clustering-aware
//! - [`interaction::InteractionController`] - the click state machine
//! - [`options::MapOptions`] - runtime configuration (view, cluster,
//!   interaction) with TOML presets
//!
//! # Model
//!
//! Everything is single-threaded and synchronous, tied to the host's
//! event loop. Feature selection flags are the only mutable shared state;
//! their sole writer is the interaction controller, and style resolution
//! reads them live on the next render pass. A click either finds a hit or
//! it doesn't — there is nothing asynchronous to cancel or retry.

pub mod error;
pub mod feature;
pub mod geojson;
pub mod geometry;
pub mod interaction;
pub mod layer;
pub mod map;
pub mod options;
pub mod overlay;
pub mod source;
pub mod style;
pub mod viewport;
