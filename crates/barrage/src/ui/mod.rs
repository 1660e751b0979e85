//! Screen-space widgets: bars, mission cards and menus.

mod bar;
mod menu;
mod mission;
mod pause;

pub use bar::ProgressBar;
pub use menu::{MenuChoice, MenuDecision, MenuInput, MenuKind, MenuOverlay, MenuPhase};
pub use mission::{KillLedger, Mission, MissionBoard, MissionPhase, MissionTarget, MissionUi};
pub use pause::PauseControl;
