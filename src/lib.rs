//! # burst-plan: Segment and Sky Planning for Coincidence Burst Searches
//!
//! Metadata bookkeeping that a multi-detector coincidence search consumes:
//!
//! - **Frame catalogs**: parse per-detector frame listings into validated
//!   [`frame::FrameRecord`]s
//! - **Segment selection**: assign frames to fixed-length analysis segments
//!   with edge padding
//! - **Sky masks**: restrict the sky directions a search examines to a circle
//!   on a HEALPix or regular grid
//!
//! No signal processing happens here; everything is interval and spherical
//! membership testing over ordered collections.
//!
//! ## Example Usage
//!
//! ```rust
//! use burst_plan::frame::{CatalogOptions, DetectorCatalog};
//! use burst_plan::segment::SegmentPlanner;
//! use burst_plan::sky::{build_mask, CoordinateMode, SkyGrid};
//!
//! let options = CatalogOptions::default();
//! let h1 = DetectorCatalog::parse(
//!     "/data/H-H1_HOFT-1200000000-4096.gwf\n/data/H-H1_HOFT-1200004096-4096.gwf\n",
//!     "H1",
//!     &options,
//! )?;
//! let l1 = DetectorCatalog::parse("/data/L-L1_HOFT-1200000000-4096.gwf\n", "L1", &options)?;
//!
//! let planner = SegmentPlanner::new(600.0, 300.0, 8.0)?;
//! let windows = planner.windows(1_200_000_000.0, 1_200_001_200.0)?;
//! let segments = planner.plan(&[h1, l1], &windows)?;
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].frames().len(), 2);
//!
//! let grid = SkyGrid::healpix(4)?;
//! let mask = build_mask(&grid, 45.0, 90.0, 15.0, CoordinateMode::Celestial)?;
//! assert_eq!(mask.len(), grid.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod frame;
pub mod logging;
pub mod segment;
pub mod sky;

pub use error::{Error, FormatError, Result, ValidationError};
