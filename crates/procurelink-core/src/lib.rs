pub mod error;
pub mod events;
pub mod keywords;
pub mod model;
pub mod registry;
pub mod target;
pub mod time;

pub use error::{CoreError, ValidationError};
pub use keywords::{Category, KeywordRules};
pub use registry::{
    AutomationFlags, Filters, TargetDisplayInfo, TargetRegistry, TargetTypeConfig, WidgetConfig,
};
pub use target::{Target, TargetInput, TargetKind};
pub use self::time::{now_utc, today_utc};

/// Display name used wherever a record has no resolvable target.
pub const NO_TARGET_LINKED: &str = "no target linked";
