//! Launch data pipeline shared by the terminal and browser front ends:
//! records are windowed in time, grouped by site, projected onto a world map
//! and relaxed so that no two markers overlap.

pub mod aggregate;
pub mod charts;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod land;
pub mod layout;
pub mod projection;
pub mod scale;
pub mod selection;
pub mod timeline;
pub mod window;
pub mod zoom;

pub use aggregate::{aggregate, Launchpad, Launchpads, StatusCounts};
pub use domain::{LaunchRecord, LaunchStatus, Milestone, ViewMode, YearMonth, MAX_YEAR};
pub use error::{AtlasError, Result};
pub use frame::{build_frame, FrameInput, MapFrame, Marker, MarkerStyle};
pub use geometry::{Point, Size};
pub use interaction::{hit_test, InteractionState, Tooltip, TooltipKind};
pub use selection::{Era, SelectionLevel, SelectionState};
pub use timeline::Timeline;
pub use zoom::ZoomTransform;
