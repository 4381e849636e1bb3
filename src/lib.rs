//! # dex-index
//!
//! Builds static, generation-filtered reference indexes of items and moves
//! from the paginated [PokéAPI](https://pokeapi.co) REST API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────────┐   ┌───────────┐   ┌──────────┐
//! │  Source  │──▶│ Selection │──▶│ Normalize  │──▶│  Resolve  │──▶│  Index   │
//! │ (HTTP)   │   │ (first    │   │ (locale /  │   │ (machine, │   │ merge +  │
//! │          │   │  gen)     │   │  version)  │   │  chain)   │   │ persist  │
//! └──────────┘   └───────────┘   └────────────┘   └───────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! dex sync items                 # writes item_index.json
//! dex sync moves --end 354       # writes move_index.json
//! dex xp --output xp_levels.json
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Fatal error taxonomy |
//! | [`source`] | Source client (HTTP and in-memory) |
//! | [`raw`] | Typed raw API resources |
//! | [`models`] | Normalized index records |
//! | [`selection`] | Generation-based inclusion policy |
//! | [`normalize`] | Field selection rules |
//! | [`resolve`] | Secondary fetches and reference ids |
//! | [`index`] | Index accumulator and persistence |
//! | [`pipeline`] | Per-id driver |
//! | [`progress`] | Progress reporting |
//! | [`xp`] | Experience tables per growth rate |

pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod raw;
pub mod resolve;
pub mod selection;
pub mod source;
pub mod xp;
